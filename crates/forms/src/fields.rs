//! Input fields of a referral form.
//!
//! Every field is optional; absent or blank values are rendered with a placeholder.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Maximum number of procedure or diagnosis codes shown on the form.
pub const MAX_CODES_SHOWN: usize = 3;

pub(crate) const NOT_PROVIDED: &str = "Not Provided";

/// A CPT or ICD-10 code with its description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MedicalCode {
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl MedicalCode {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: Some(description.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct FormProvider {
    pub name: Option<String>,
    pub npi: Option<String>,
    pub clinic: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct FormInsurance {
    pub plan: Option<String>,
    pub status: Option<String>,
    pub copay: Option<String>,
}

/// Everything printed on a referral form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ReferralForm {
    pub patient_name: Option<String>,
    /// Date of birth as written by the referrer.
    pub dob: Option<String>,
    pub age: Option<String>,
    pub sex: Option<String>,
    pub complaint: Option<String>,
    pub clinical_context: Option<String>,
    pub procedure_codes: Vec<MedicalCode>,
    pub diagnosis_codes: Vec<MedicalCode>,
    pub specialty: Option<String>,
    pub provider: FormProvider,
    pub insurance: FormInsurance,
}

/// The trimmed value, or `placeholder` when the field is absent or blank.
pub(crate) fn or_placeholder(value: &Option<String>, placeholder: &str) -> String {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(placeholder)
        .to_string()
}

/// `CODE - description` for the first [`MAX_CODES_SHOWN`] codes, joined by `; `.
pub fn codes_text(codes: &[MedicalCode], when_empty: &str) -> String {
    if codes.is_empty() {
        return when_empty.to_string();
    }

    codes
        .iter()
        .take(MAX_CODES_SHOWN)
        .map(|c| format!("{} - {}", c.code, or_placeholder(&c.description, "N/A")))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ReferralForm {
    /// Chief complaint, falling back to the clinical context.
    pub fn major_complaint(&self) -> String {
        let complaint = or_placeholder(&self.complaint, "");
        if !complaint.is_empty() {
            return complaint;
        }
        or_placeholder(&self.clinical_context, "General consultation requested")
    }
}
