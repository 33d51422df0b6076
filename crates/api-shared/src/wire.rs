//! JSON documents exchanged over the referral endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// A dictated transcript plus optional per-request patient details.
///
/// Omitted fields fall back to the server's configured defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TranscriptReq {
    #[serde(default)]
    pub transcript: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_plan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Ignored,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TranscriptRes {
    pub status: ResponseStatus,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage_status: Option<String>,
    /// Whether the webhook accepted the referral.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notified: Option<bool>,
}

impl TranscriptRes {
    pub fn error(message: impl Into<String>) -> Self {
        Self::bare(ResponseStatus::Error, message)
    }

    pub fn ignored() -> Self {
        Self::bare(ResponseStatus::Ignored, "No actionable medical intent found.")
    }

    pub fn success(specialty: String, coverage_status: String, notified: bool) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: "Referral processed and forwarded.".into(),
            specialty: Some(specialty),
            coverage_status: Some(coverage_status),
            notified: Some(notified),
        }
    }

    fn bare(status: ResponseStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            specialty: None,
            coverage_status: None,
            notified: None,
        }
    }
}
