//! Reference data: specialists by specialty and insurance plans.
//!
//! The tables are built once at startup, either from the built-in demo data or from a YAML
//! document, and are read-only afterwards. Specialty order is significant: the intent
//! classifier scans specialties in the order they appear here.

use crate::{ReferralError, ReferralResult};
use referral_types::Specialty;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;

/// A specialist that referrals can be routed to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub name: String,
    /// National Provider Identifier.
    pub npi: String,
    /// Hospital or practice the provider is affiliated with.
    pub facility: String,
    pub rating: f32,
}

/// An insurance plan with a flat specialist copay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsurancePlan {
    pub id: String,
    pub covered_specialties: BTreeSet<Specialty>,
    /// Display string, e.g. `$25.00`.
    pub copay: String,
}

impl InsurancePlan {
    pub fn covers(&self, specialty: &Specialty) -> bool {
        self.covered_specialties.contains(specialty)
    }
}

/// Providers registered for a single specialty, in preference order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialtyEntry {
    pub specialty: Specialty,
    pub providers: Vec<Provider>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ReferenceDocument {
    specialties: Vec<SpecialtyEntry>,
    #[serde(default)]
    plans: Vec<InsurancePlan>,
}

/// Immutable lookup tables shared by the classifier and the coverage resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceData {
    specialties: Vec<SpecialtyEntry>,
    plans: Vec<InsurancePlan>,
}

impl ReferenceData {
    /// Build reference data from specialty and plan tables.
    ///
    /// # Errors
    ///
    /// Returns `ReferralError::InvalidReferenceData` if:
    /// - a specialty appears more than once,
    /// - a specialty has no providers,
    /// - a plan id is blank or appears more than once.
    pub fn new(
        specialties: Vec<SpecialtyEntry>,
        plans: Vec<InsurancePlan>,
    ) -> ReferralResult<Self> {
        let mut seen = HashSet::new();
        for entry in &specialties {
            if !seen.insert(entry.specialty.clone()) {
                return Err(ReferralError::InvalidReferenceData(format!(
                    "specialty '{}' is listed more than once",
                    entry.specialty
                )));
            }
            if entry.providers.is_empty() {
                return Err(ReferralError::InvalidReferenceData(format!(
                    "specialty '{}' has no providers",
                    entry.specialty
                )));
            }
        }

        let mut plan_ids = HashSet::new();
        for plan in &plans {
            if plan.id.trim().is_empty() {
                return Err(ReferralError::InvalidReferenceData(
                    "plan id cannot be empty".into(),
                ));
            }
            if !plan_ids.insert(plan.id.as_str()) {
                return Err(ReferralError::InvalidReferenceData(format!(
                    "plan '{}' is listed more than once",
                    plan.id
                )));
            }
        }

        Ok(Self { specialties, plans })
    }

    /// The demo tables: three specialties and three plans.
    pub fn builtin() -> ReferralResult<Self> {
        fn provider(name: &str, npi: &str, facility: &str, rating: f32) -> Provider {
            Provider {
                name: name.into(),
                npi: npi.into(),
                facility: facility.into(),
                rating,
            }
        }

        fn plan(id: &str, covered: &[&str], copay: &str) -> ReferralResult<InsurancePlan> {
            Ok(InsurancePlan {
                id: id.into(),
                covered_specialties: covered
                    .iter()
                    .map(Specialty::new)
                    .collect::<Result<_, _>>()?,
                copay: copay.into(),
            })
        }

        let specialties = vec![
            SpecialtyEntry {
                specialty: Specialty::new("cardiology")?,
                providers: vec![
                    provider("Dr. Emily Chen", "1457389201", "Mercy General", 4.9),
                    provider("Dr. Marcus Thorne", "1892039485", "Sutter Health", 4.2),
                ],
            },
            SpecialtyEntry {
                specialty: Specialty::new("dermatology")?,
                providers: vec![
                    provider("Dr. Sarah Lee", "1239048572", "Skin Health Inst", 4.8),
                    provider("Dr. Kevin Patel", "1928374650", "Valley Derm", 4.5),
                ],
            },
            SpecialtyEntry {
                specialty: Specialty::new("orthopedics")?,
                providers: vec![provider(
                    "Dr. Brock Stone",
                    "1122334455",
                    "Joint Center",
                    4.7,
                )],
            },
        ];

        let plans = vec![
            plan("Blue Cross", &["cardiology", "dermatology"], "$25.00")?,
            plan("Kaiser", &["general_practice"], "$15.00")?,
            plan("Medi-Cal", &["cardiology", "orthopedics"], "$0.00")?,
        ];

        Self::new(specialties, plans)
    }

    /// Parse reference data from a YAML document.
    ///
    /// # Errors
    ///
    /// Returns `ReferralError::ReferenceDataParse` for malformed YAML or unknown keys, and
    /// the validation errors of [`ReferenceData::new`].
    pub fn from_yaml_str(input: &str) -> ReferralResult<Self> {
        let doc: ReferenceDocument =
            serde_yaml::from_str(input).map_err(ReferralError::ReferenceDataParse)?;
        Self::new(doc.specialties, doc.plans)
    }

    /// Read and parse a YAML reference data file.
    pub fn load_yaml_file(path: &Path) -> ReferralResult<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|source| ReferralError::ReferenceDataRead {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_yaml_str(&contents)
    }

    /// Known specialties in scan order.
    pub fn specialties(&self) -> impl Iterator<Item = &Specialty> {
        self.specialties.iter().map(|e| &e.specialty)
    }

    pub fn providers(&self, specialty: &Specialty) -> &[Provider] {
        self.specialties
            .iter()
            .find(|e| &e.specialty == specialty)
            .map(|e| e.providers.as_slice())
            .unwrap_or(&[])
    }

    /// The provider a referral for `specialty` is routed to: the first one listed.
    pub fn primary_provider(&self, specialty: &Specialty) -> Option<&Provider> {
        self.providers(specialty).first()
    }

    pub fn plan(&self, plan_id: &str) -> Option<&InsurancePlan> {
        self.plans.iter().find(|p| p.id == plan_id)
    }

    pub fn plans(&self) -> &[InsurancePlan] {
        &self.plans
    }
}
