//! # API REST
//!
//! REST API implementation for the referral router.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, status codes)
//!
//! Uses `api-shared` for the wire documents and `referral-core`/`referral-forms` for the work.

#![warn(rust_2018_idioms)]

use api_shared::{HealthRes, HealthService, ResponseStatus, TranscriptReq, TranscriptRes};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use referral_core::{ReferralConfig, ReferralError, ReferralOutcome, ReferralService};
use referral_forms::{
    render, FormInsurance, FormOutput, FormProvider, MedicalCode, ReferralForm, RenderStamp,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state for the REST API server
///
/// Configuration supplies per-request defaults; the service owns the reference tables and the
/// notifier.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<ReferralConfig>,
    pub service: ReferralService,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, process_transcript, render_referral_form),
    components(schemas(
        HealthRes,
        TranscriptReq,
        TranscriptRes,
        ResponseStatus,
        ReferralForm,
        MedicalCode,
        FormProvider,
        FormInsurance,
    ))
)]
pub struct ApiDoc;

/// Build the application router with Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/process-transcript", post(process_transcript))
        .route("/referral-forms", post(render_referral_form))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for monitoring and load balancers.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/process-transcript",
    request_body = TranscriptReq,
    responses(
        (status = 200, description = "Referral forwarded, or no actionable intent", body = TranscriptRes),
        (status = 400, description = "No transcript text", body = TranscriptRes),
        (status = 500, description = "Internal server error", body = TranscriptRes)
    )
)]
/// Run a transcript through classification, coverage and notification.
///
/// Returns `ignored` when no specialty is mentioned. A referral whose webhook delivery failed
/// is still a `success`, with `notified: false`.
///
/// A transcript made only of whitespace counts as missing: it is rejected with `400` and
/// "No text sent" rather than reported as `ignored`.
///
/// # Errors
/// Returns `400 Bad Request` if the body is not valid JSON or the transcript is blank.
#[axum::debug_handler]
async fn process_transcript(
    State(state): State<AppState>,
    body: Result<Json<TranscriptReq>, JsonRejection>,
) -> (StatusCode, Json<TranscriptRes>) {
    let req = match body {
        Ok(Json(req)) => req,
        Err(e) => {
            tracing::warn!("rejected transcript request: {}", e.body_text());
            return (
                StatusCode::BAD_REQUEST,
                Json(TranscriptRes::error("No text sent")),
            );
        }
    };

    let patient = state
        .cfg
        .patient_context(req.patient_name, req.insurance_plan, req.notify_email);

    match state.service.process(&req.transcript, &patient).await {
        Ok(ReferralOutcome::Ignored) => (StatusCode::OK, Json(TranscriptRes::ignored())),
        Ok(ReferralOutcome::Referred(referral)) => (
            StatusCode::OK,
            Json(TranscriptRes::success(
                referral.assessment.specialty.to_string(),
                referral.assessment.coverage.status.to_string(),
                referral.notified,
            )),
        ),
        Err(ReferralError::EmptyTranscript) => (
            StatusCode::BAD_REQUEST,
            Json(TranscriptRes::error("No text sent")),
        ),
        Err(e) => {
            tracing::error!("Process transcript error: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(TranscriptRes::error("Internal error")),
            )
        }
    }
}

#[utoipa::path(
    post,
    path = "/referral-forms",
    request_body = ReferralForm,
    responses(
        (status = 200, description = "Rendered referral form", content_type = "application/pdf"),
        (status = 500, description = "The form could not be produced")
    )
)]
/// Render a referral form as a PDF attachment.
///
/// Sections that fail to draw are logged and left off the page; the response still succeeds
/// as long as a document was produced.
///
/// # Errors
/// Returns `500 Internal Server Error` if no document could be serialised.
#[axum::debug_handler]
async fn render_referral_form(
    State(_state): State<AppState>,
    Json(form): Json<ReferralForm>,
) -> Result<Response, (StatusCode, &'static str)> {
    let report = tokio::task::spawn_blocking(move || render(&form, &RenderStamp::now()))
        .await
        .map_err(|e| {
            tracing::error!("Render task failed: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        })?;

    for failure in &report.section_errors {
        tracing::warn!("section '{}' omitted: {}", failure.section, failure.reason);
    }

    let Some(document) = report.document else {
        tracing::error!("Referral form could not be produced");
        return Err((StatusCode::INTERNAL_SERVER_ERROR, "Form could not be produced"));
    };

    let artifact = FormOutput::Memory.deliver(document).map_err(|e| {
        tracing::error!("Referral form delivery failed: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", artifact.filename),
            ),
        ],
        artifact.bytes,
    )
        .into_response())
}
