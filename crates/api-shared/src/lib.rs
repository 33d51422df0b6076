//! # API Shared
//!
//! Shared request/response documents and services for the referral APIs.
//!
//! Contains:
//! - Wire types for the transcript and health endpoints (`wire` module)
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` and the CLI so both surfaces speak the same documents.

pub mod health;
pub mod wire;

pub use health::HealthService;
pub use wire::*;
