//! Notification payload assembly.

use crate::coverage::CoverageOutcome;
use crate::reference::Provider;
use referral_types::{NonEmptyText, Specialty};
use serde::Serialize;

/// Who the referral is for and which plan and contact address apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientContext {
    pub patient_name: NonEmptyText,
    pub insurance_plan: NonEmptyText,
    pub notify_email: Option<String>,
}

/// The document POSTed to the automation webhook.
///
/// Field names on the wire follow the webhook's expected keys (`doctor_name`, `hospital`,
/// `action`, `insurance_status`, `email`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferralPayload {
    pub patient_name: String,
    #[serde(rename = "doctor_name")]
    pub provider_name: String,
    #[serde(rename = "hospital")]
    pub facility: String,
    pub specialty: String,
    #[serde(rename = "action")]
    pub action_label: String,
    #[serde(rename = "insurance_status")]
    pub coverage_status: String,
    pub copay: String,
    #[serde(rename = "email", skip_serializing_if = "Option::is_none")]
    pub notify_email: Option<String>,
}

impl ReferralPayload {
    pub fn build(
        specialty: &Specialty,
        provider: &Provider,
        outcome: &CoverageOutcome,
        patient: &PatientContext,
    ) -> Self {
        let status = outcome.status.as_str();
        Self {
            patient_name: patient.patient_name.to_string(),
            provider_name: provider.name.clone(),
            facility: provider.facility.clone(),
            specialty: specialty.to_string(),
            action_label: format!("Referral ({status})"),
            coverage_status: status.to_string(),
            copay: outcome.copay_or_full_cost.clone(),
            notify_email: patient.notify_email.clone(),
        }
    }
}
