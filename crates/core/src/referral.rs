//! The transcript-to-referral pipeline.
//!
//! A transcript is classified, the primary provider for the detected specialty is selected,
//! coverage is resolved for the patient's plan, and the resulting payload is forwarded once
//! through the configured [`Notifier`].

use crate::classifier::IntentClassifier;
use crate::coverage::{CoverageOutcome, CoverageResolver};
use crate::notifier::Notifier;
use crate::payload::{PatientContext, ReferralPayload};
use crate::reference::{Provider, ReferenceData};
use crate::{ReferralError, ReferralResult};
use referral_types::{NonEmptyText, Specialty};
use std::sync::Arc;

/// Classification and coverage for a transcript, before anything is sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub specialty: Specialty,
    pub provider: Provider,
    pub coverage: CoverageOutcome,
}

/// A referral that was built and handed to the notifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Referral {
    pub assessment: Assessment,
    pub payload: ReferralPayload,
    /// Whether the webhook accepted the payload. Informational only.
    pub notified: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReferralOutcome {
    /// No specialty was mentioned; nothing was built or sent.
    Ignored,
    Referred(Referral),
}

/// Pure referral operations - no API concerns
#[derive(Clone)]
pub struct ReferralService {
    reference: Arc<ReferenceData>,
    notifier: Arc<dyn Notifier>,
}

impl ReferralService {
    pub fn new(reference: Arc<ReferenceData>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            reference,
            notifier,
        }
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// Classify `transcript` and resolve coverage under `plan_id` without notifying anyone.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when no specialty is mentioned.
    ///
    /// # Errors
    ///
    /// Returns `ReferralError::EmptyTranscript` if the transcript is blank.
    pub fn assess(&self, transcript: &str, plan_id: &str) -> ReferralResult<Option<Assessment>> {
        let transcript =
            NonEmptyText::new(transcript).map_err(|_| ReferralError::EmptyTranscript)?;

        let Some(specialty) = IntentClassifier::new(&self.reference).classify(transcript.as_str())
        else {
            tracing::info!("no specialty found in transcript");
            return Ok(None);
        };
        tracing::info!("intent detected: referral to {}", specialty.title());

        // ReferenceData guarantees every classifiable specialty has a provider.
        let provider = self
            .reference
            .primary_provider(specialty)
            .cloned()
            .ok_or_else(|| {
                ReferralError::InvalidReferenceData(format!(
                    "specialty '{specialty}' has no providers"
                ))
            })?;
        tracing::info!("found specialist: {} at {}", provider.name, provider.facility);

        let coverage = CoverageResolver::new(&self.reference).resolve(specialty, plan_id);
        tracing::info!("insurance check ({}): {}", plan_id, coverage.status);

        Ok(Some(Assessment {
            specialty: specialty.clone(),
            provider,
            coverage,
        }))
    }

    /// Run the full pipeline for one transcript.
    ///
    /// The notifier's result is recorded in the outcome and never causes an error.
    ///
    /// # Errors
    ///
    /// Returns `ReferralError::EmptyTranscript` if the transcript is blank.
    pub async fn process(
        &self,
        transcript: &str,
        patient: &PatientContext,
    ) -> ReferralResult<ReferralOutcome> {
        let Some(assessment) = self.assess(transcript, patient.insurance_plan.as_str())? else {
            return Ok(ReferralOutcome::Ignored);
        };

        let payload = ReferralPayload::build(
            &assessment.specialty,
            &assessment.provider,
            &assessment.coverage,
            patient,
        );
        let notified = self.notifier.notify(&payload).await;
        if !notified {
            tracing::warn!("referral built but notification was not delivered");
        }

        Ok(ReferralOutcome::Referred(Referral {
            assessment,
            payload,
            notified,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::NetworkStatus;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records payloads and answers with a fixed result.
    struct RecordingNotifier {
        accept: bool,
        sent: Mutex<Vec<ReferralPayload>>,
    }

    impl RecordingNotifier {
        fn new(accept: bool) -> Arc<Self> {
            Arc::new(Self {
                accept,
                sent: Mutex::new(Vec::new()),
            })
        }

        fn sent(&self) -> Vec<ReferralPayload> {
            self.sent.lock().expect("lock").clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, payload: &ReferralPayload) -> bool {
            self.sent.lock().expect("lock").push(payload.clone());
            self.accept
        }
    }

    fn service(notifier: Arc<RecordingNotifier>) -> ReferralService {
        let reference = Arc::new(ReferenceData::builtin().expect("builtin tables"));
        ReferralService::new(reference, notifier)
    }

    fn patient(plan: &str) -> PatientContext {
        PatientContext {
            patient_name: NonEmptyText::new("Saketh Demo").expect("name"),
            insurance_plan: NonEmptyText::new(plan).expect("plan"),
            notify_email: Some("referrals@example.org".into()),
        }
    }

    #[tokio::test]
    async fn cardiology_referral_is_in_network_and_notified() {
        let notifier = RecordingNotifier::new(true);
        let svc = service(notifier.clone());

        let outcome = svc
            .process("refer to cardiology for a checkup", &patient("Blue Cross"))
            .await
            .expect("process");

        let ReferralOutcome::Referred(referral) = outcome else {
            panic!("expected a referral");
        };
        assert_eq!(referral.assessment.specialty.as_str(), "cardiology");
        assert_eq!(referral.assessment.coverage.status, NetworkStatus::InNetwork);
        assert_eq!(referral.assessment.coverage.copay_or_full_cost, "$25.00");
        assert!(referral.notified);

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].provider_name, "Dr. Emily Chen");
        assert_eq!(sent[0].patient_name, "Saketh Demo");
    }

    #[tokio::test]
    async fn no_intent_is_ignored_without_notification() {
        let notifier = RecordingNotifier::new(true);
        let svc = service(notifier.clone());

        let outcome = svc
            .process("the weather is nice", &patient("Blue Cross"))
            .await
            .expect("process");

        assert_eq!(outcome, ReferralOutcome::Ignored);
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn empty_transcript_is_rejected_before_classification() {
        let notifier = RecordingNotifier::new(true);
        let svc = service(notifier.clone());

        let err = svc
            .process("   ", &patient("Blue Cross"))
            .await
            .expect_err("empty transcript");
        assert!(matches!(err, ReferralError::EmptyTranscript));
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn failed_notification_does_not_fail_processing() {
        let notifier = RecordingNotifier::new(false);
        let svc = service(notifier.clone());

        let outcome = svc
            .process("Please refer Sarah Johnson to dermatology.", &patient("Kaiser"))
            .await
            .expect("process");

        let ReferralOutcome::Referred(referral) = outcome else {
            panic!("expected a referral");
        };
        assert!(!referral.notified);
        assert_eq!(referral.assessment.coverage.status, NetworkStatus::OutOfNetwork);
        assert_eq!(referral.payload.copay, "100%");
        assert_eq!(notifier.sent().len(), 1);
    }

    #[test]
    fn assessment_is_idempotent() {
        let svc = service(RecordingNotifier::new(true));
        let text = "Need to refer Michael Brown to orthopedics for knee pain.";

        let first = svc.assess(text, "Medi-Cal").expect("assess");
        let second = svc.assess(text, "Medi-Cal").expect("assess");

        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn assess_without_intent_is_none() {
        let svc = service(RecordingNotifier::new(true));
        assert_eq!(svc.assess("hello there", "Blue Cross").expect("assess"), None);
    }
}
