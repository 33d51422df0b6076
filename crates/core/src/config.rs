//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Request handling never reads environment variables; binaries
//! read them in `main` and hand the parsed values to [`ReferralConfig::new`].

use crate::constants::{DEFAULT_WEBHOOK_TIMEOUT_SECS, MAX_WEBHOOK_TIMEOUT_SECS};
use crate::notifier::{parse_webhook_url, DisabledNotifier, Notifier, WebhookNotifier};
use crate::payload::PatientContext;
use crate::reference::ReferenceData;
use crate::{ReferralError, ReferralResult};
use referral_types::NonEmptyText;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct ReferralConfig {
    webhook_url: Option<String>,
    webhook_timeout: Duration,
    default_plan: NonEmptyText,
    default_patient: NonEmptyText,
    notify_email: Option<String>,
}

impl ReferralConfig {
    /// Create a new `ReferralConfig`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the webhook URL is present but not a valid `http`/`https` URL,
    /// - the default plan or default patient name is blank.
    pub fn new(
        webhook_url: Option<String>,
        webhook_timeout: Duration,
        default_plan: String,
        default_patient: String,
        notify_email: Option<String>,
    ) -> ReferralResult<Self> {
        let webhook_url = webhook_url
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        if let Some(url) = &webhook_url {
            parse_webhook_url(url)?;
        }

        let default_plan = NonEmptyText::new(default_plan)
            .map_err(|_| ReferralError::InvalidInput("default plan cannot be empty".into()))?;
        let default_patient = NonEmptyText::new(default_patient).map_err(|_| {
            ReferralError::InvalidInput("default patient name cannot be empty".into())
        })?;

        Ok(Self {
            webhook_url,
            webhook_timeout,
            default_plan,
            default_patient,
            notify_email: NonEmptyText::optional(notify_email).map(NonEmptyText::into_inner),
        })
    }

    pub fn webhook_url(&self) -> Option<&str> {
        self.webhook_url.as_deref()
    }

    pub fn webhook_timeout(&self) -> Duration {
        self.webhook_timeout
    }

    pub fn default_plan(&self) -> &str {
        self.default_plan.as_str()
    }

    pub fn default_patient(&self) -> &str {
        self.default_patient.as_str()
    }

    pub fn notify_email(&self) -> Option<&str> {
        self.notify_email.as_deref()
    }

    /// Build the patient context for a request, falling back to configured defaults for any
    /// field the caller leaves out or sends blank.
    pub fn patient_context(
        &self,
        patient_name: Option<String>,
        insurance_plan: Option<String>,
        notify_email: Option<String>,
    ) -> PatientContext {
        PatientContext {
            patient_name: NonEmptyText::optional(patient_name)
                .unwrap_or_else(|| self.default_patient.clone()),
            insurance_plan: NonEmptyText::optional(insurance_plan)
                .unwrap_or_else(|| self.default_plan.clone()),
            notify_email: NonEmptyText::optional(notify_email)
                .map(NonEmptyText::into_inner)
                .or_else(|| self.notify_email.clone()),
        }
    }

    /// The notifier implied by this configuration.
    ///
    /// Without a webhook URL every referral is reported as undelivered.
    pub fn notifier(&self) -> ReferralResult<Arc<dyn Notifier>> {
        match &self.webhook_url {
            Some(url) => Ok(Arc::new(WebhookNotifier::new(url, self.webhook_timeout)?)),
            None => {
                tracing::warn!("REFERRAL_WEBHOOK_URL not set; notifications are disabled");
                Ok(Arc::new(DisabledNotifier))
            }
        }
    }
}

/// Parse the webhook timeout from an optional string value holding whole seconds.
///
/// If `value` is `None` or empty/whitespace, returns the default timeout.
///
/// # Errors
///
/// Returns `ReferralError::InvalidInput` if the value is not an integer in
/// `1..=MAX_WEBHOOK_TIMEOUT_SECS`.
pub fn webhook_timeout_from_env_value(value: Option<String>) -> ReferralResult<Duration> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let secs = match value {
        None => DEFAULT_WEBHOOK_TIMEOUT_SECS,
        Some(v) => v.parse::<u64>().map_err(|_| {
            ReferralError::InvalidInput(format!("webhook timeout '{v}' is not a whole number"))
        })?,
    };

    if secs == 0 || secs > MAX_WEBHOOK_TIMEOUT_SECS {
        return Err(ReferralError::InvalidInput(format!(
            "webhook timeout must be between 1 and {MAX_WEBHOOK_TIMEOUT_SECS} seconds"
        )));
    }

    Ok(Duration::from_secs(secs))
}

/// Resolve reference data without reading environment variables.
///
/// If `override_file` is provided it is loaded as YAML; otherwise the built-in tables are used.
pub fn resolve_reference_data(override_file: Option<PathBuf>) -> ReferralResult<ReferenceData> {
    match override_file {
        Some(path) => {
            tracing::info!("loading reference data from {}", path.display());
            ReferenceData::load_yaml_file(&path)
        }
        None => ReferenceData::builtin(),
    }
}
