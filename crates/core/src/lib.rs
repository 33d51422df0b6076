//! # Referral Core
//!
//! Core business logic for routing dictated transcripts to specialist referrals.
//!
//! This crate contains the referral decision pipeline:
//! - Immutable reference data (specialists by specialty, insurance plans)
//! - Specialty intent detection over transcript text
//! - Insurance coverage resolution
//! - Notification payload assembly and webhook delivery
//!
//! **No API concerns**: HTTP servers, request documents and CLI parsing belong in `api-rest`,
//! `api-shared` and `referral-cli`.

pub mod classifier;
pub mod config;
pub mod constants;
pub mod coverage;
pub mod error;
pub mod notifier;
pub mod payload;
pub mod reference;
pub mod referral;

pub use classifier::IntentClassifier;
pub use config::ReferralConfig;
pub use constants::{DEFAULT_PATIENT_NAME, DEFAULT_PLAN};
pub use coverage::{CoverageOutcome, CoverageResolver, NetworkStatus};
pub use error::{ReferralError, ReferralResult};
pub use notifier::{DisabledNotifier, Notifier, WebhookNotifier};
pub use payload::{PatientContext, ReferralPayload};
pub use reference::{InsurancePlan, Provider, ReferenceData, SpecialtyEntry};
pub use referral::{Assessment, Referral, ReferralOutcome, ReferralService};
pub use referral_types::{NonEmptyText, Specialty};
