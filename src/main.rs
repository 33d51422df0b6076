use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use referral_core::config::{resolve_reference_data, webhook_timeout_from_env_value};
use referral_core::{DEFAULT_PATIENT_NAME, DEFAULT_PLAN, ReferralConfig, ReferralService};

/// Main entry point for the referral router
///
/// Resolves configuration and reference data once, then serves the REST API.
///
/// # Environment Variables
/// - `REFERRAL_REST_ADDR`: REST server address (default: "0.0.0.0:5000")
/// - `REFERRAL_WEBHOOK_URL`: webhook receiving referral payloads (unset: notifications disabled)
/// - `REFERRAL_WEBHOOK_TIMEOUT_SECS`: webhook timeout in seconds (default: 5)
/// - `REFERRAL_DEFAULT_PLAN`: plan used when a request gives none (default: "Blue Cross")
/// - `REFERRAL_DEFAULT_PATIENT`: patient used when a request gives none (default: "Demo Patient")
/// - `REFERRAL_NOTIFY_EMAIL`: contact address forwarded with every referral
/// - `REFERRAL_REFERENCE_DATA`: YAML file replacing the built-in provider and plan tables
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - any configuration value or the reference data file is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("referral=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("REFERRAL_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".into());

    let webhook_timeout =
        webhook_timeout_from_env_value(std::env::var("REFERRAL_WEBHOOK_TIMEOUT_SECS").ok())?;
    let cfg = Arc::new(ReferralConfig::new(
        std::env::var("REFERRAL_WEBHOOK_URL").ok(),
        webhook_timeout,
        std::env::var("REFERRAL_DEFAULT_PLAN").unwrap_or_else(|_| DEFAULT_PLAN.into()),
        std::env::var("REFERRAL_DEFAULT_PATIENT").unwrap_or_else(|_| DEFAULT_PATIENT_NAME.into()),
        std::env::var("REFERRAL_NOTIFY_EMAIL").ok(),
    )?);

    let reference_override = std::env::var("REFERRAL_REFERENCE_DATA")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from);
    let reference = Arc::new(resolve_reference_data(reference_override)?);
    tracing::info!(
        "reference data: {} specialties, {} plans",
        reference.specialties().count(),
        reference.plans().len()
    );

    let service = ReferralService::new(reference, cfg.notifier()?);
    let app = router(AppState { cfg, service });

    tracing::info!("++ Starting referral REST API on {}", rest_addr);
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
