//! Specialty intent detection.
//!
//! Detection is a case-insensitive substring scan over the known specialty identifiers. It
//! does not respect word boundaries or negation: "not a cardiology case" still matches
//! `cardiology`.

use crate::reference::ReferenceData;
use referral_types::Specialty;

/// Scans transcripts for the specialties listed in the reference data.
#[derive(Clone, Copy)]
pub struct IntentClassifier<'a> {
    reference: &'a ReferenceData,
}

impl<'a> IntentClassifier<'a> {
    pub fn new(reference: &'a ReferenceData) -> Self {
        Self { reference }
    }

    /// Returns the first specialty, in reference-data order, that occurs in `text`.
    ///
    /// Returns `None` when no known specialty is mentioned.
    pub fn classify(&self, text: &str) -> Option<&'a Specialty> {
        let haystack = text.to_lowercase();
        self.reference
            .specialties()
            .find(|specialty| haystack.contains(specialty.as_str()))
    }
}
