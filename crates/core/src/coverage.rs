//! Insurance coverage resolution.
//!
//! Unknown plans and uncovered specialties both resolve to out-of-network at full cost; this
//! never fails.

use crate::constants::FULL_COST_PLACEHOLDER;
use crate::reference::ReferenceData;
use referral_types::Specialty;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NetworkStatus {
    #[serde(rename = "IN-NETWORK")]
    InNetwork,
    #[serde(rename = "OUT-OF-NETWORK")]
    OutOfNetwork,
}

impl NetworkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkStatus::InNetwork => "IN-NETWORK",
            NetworkStatus::OutOfNetwork => "OUT-OF-NETWORK",
        }
    }
}

impl std::fmt::Display for NetworkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Network status and patient cost for one specialty under one plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageOutcome {
    pub plan: String,
    pub status: NetworkStatus,
    /// The plan copay when in network, otherwise [`FULL_COST_PLACEHOLDER`].
    pub copay_or_full_cost: String,
}

impl CoverageOutcome {
    pub fn is_covered(&self) -> bool {
        self.status == NetworkStatus::InNetwork
    }
}

#[derive(Clone, Copy)]
pub struct CoverageResolver<'a> {
    reference: &'a ReferenceData,
}

impl<'a> CoverageResolver<'a> {
    pub fn new(reference: &'a ReferenceData) -> Self {
        Self { reference }
    }

    pub fn resolve(&self, specialty: &Specialty, plan_id: &str) -> CoverageOutcome {
        match self.reference.plan(plan_id) {
            Some(plan) if plan.covers(specialty) => CoverageOutcome {
                plan: plan_id.to_string(),
                status: NetworkStatus::InNetwork,
                copay_or_full_cost: plan.copay.clone(),
            },
            Some(_) => out_of_network(plan_id),
            None => {
                tracing::warn!("unknown insurance plan '{}', treating as not covered", plan_id);
                out_of_network(plan_id)
            }
        }
    }
}

fn out_of_network(plan_id: &str) -> CoverageOutcome {
    CoverageOutcome {
        plan: plan_id.to_string(),
        status: NetworkStatus::OutOfNetwork,
        copay_or_full_cost: FULL_COST_PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(specialty: &str, plan: &str) -> CoverageOutcome {
        let reference = ReferenceData::builtin().expect("builtin tables");
        let specialty = Specialty::new(specialty).expect("valid specialty");
        CoverageResolver::new(&reference).resolve(&specialty, plan)
    }

    #[test]
    fn covered_specialty_is_in_network_with_copay() {
        let outcome = resolve("cardiology", "Blue Cross");
        assert_eq!(outcome.status, NetworkStatus::InNetwork);
        assert_eq!(outcome.copay_or_full_cost, "$25.00");
        assert!(outcome.is_covered());
    }

    #[test]
    fn zero_copay_plan_reports_its_copay() {
        let outcome = resolve("orthopedics", "Medi-Cal");
        assert_eq!(outcome.status, NetworkStatus::InNetwork);
        assert_eq!(outcome.copay_or_full_cost, "$0.00");
    }

    #[test]
    fn uncovered_specialty_is_full_cost() {
        let outcome = resolve("orthopedics", "Blue Cross");
        assert_eq!(outcome.status, NetworkStatus::OutOfNetwork);
        assert_eq!(outcome.copay_or_full_cost, FULL_COST_PLACEHOLDER);
    }

    #[test]
    fn unknown_plan_is_out_of_network() {
        let outcome = resolve("cardiology", "Nonexistent Mutual");
        assert_eq!(outcome.status, NetworkStatus::OutOfNetwork);
        assert_eq!(outcome.copay_or_full_cost, "100%");
        assert_eq!(outcome.plan, "Nonexistent Mutual");
    }

    #[test]
    fn unknown_specialty_is_out_of_network() {
        let outcome = resolve("neurology", "Kaiser");
        assert!(!outcome.is_covered());
    }

    #[test]
    fn status_serializes_with_wire_spelling() {
        let json = serde_json::to_string(&NetworkStatus::OutOfNetwork).expect("serialize");
        assert_eq!(json, "\"OUT-OF-NETWORK\"");
        assert_eq!(NetworkStatus::InNetwork.to_string(), "IN-NETWORK");
    }
}
