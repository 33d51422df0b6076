//! # Referral Forms
//!
//! Renders a medical referral as a single A4 PDF page with a fixed layout.
//!
//! - Text is reduced to ASCII before it is drawn (see [`text::sanitize`]).
//! - Each layout section is drawn independently; failures are collected in the
//!   [`RenderReport`] instead of aborting the document.
//! - Output goes to memory or a directory depending on [`FormOutput`].

pub mod error;
pub mod fields;
pub mod layout;
pub mod output;
pub mod page;
pub mod render;
pub mod text;

pub use error::{FormError, FormResult};
pub use fields::{codes_text, FormInsurance, FormProvider, MedicalCode, ReferralForm};
pub use layout::{referral_sections, RenderStamp, Section};
pub use output::{FormArtifact, FormOutput};
pub use render::{render, render_sections, RenderReport, RenderedForm, SectionError};
