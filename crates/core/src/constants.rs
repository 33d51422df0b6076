//! Constants used throughout the referral core crate.
//!
//! Defaults for runtime configuration and the fixed strings that appear on the wire.

/// Insurance plan assumed when neither the caller nor the configuration names one.
pub const DEFAULT_PLAN: &str = "Blue Cross";

/// Patient name forwarded when the caller does not supply one.
pub const DEFAULT_PATIENT_NAME: &str = "Demo Patient";

/// Cost reported for out-of-network referrals in place of a dollar amount.
pub const FULL_COST_PLACEHOLDER: &str = "100%";

/// Default webhook timeout in seconds.
pub const DEFAULT_WEBHOOK_TIMEOUT_SECS: u64 = 5;

/// Upper bound accepted for the webhook timeout.
pub const MAX_WEBHOOK_TIMEOUT_SECS: u64 = 120;
