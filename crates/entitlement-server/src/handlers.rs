//! HTTP Handlers

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::Instrument;

use entitlement_core::{EntitlementError, WebhookOutcome};

use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub google_play_configured: bool,
    pub profile_store_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub message: &'static str,

    /// Present (possibly `null`) only once an update was written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl From<WebhookOutcome> for WebhookResponse {
    fn from(outcome: WebhookOutcome) -> Self {
        let message = outcome.message();
        match outcome {
            WebhookOutcome::Skipped => Self { message, data: None },
            WebhookOutcome::Processed { data, .. } => Self {
                message,
                data: Some(data.unwrap_or(serde_json::Value::Null)),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl From<&EntitlementError> for ErrorResponse {
    fn from(err: &EntitlementError) -> Self {
        Self {
            error: err.to_string(),
            code: err.code().into(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        google_play_configured: state.google_play_configured,
        profile_store_configured: state.profile_store_configured,
    })
}

/// Google Play purchase notification webhook
///
/// Every failure is a `400`; `code` in the body tells them apart.
pub async fn google_play_webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<WebhookResponse>, (StatusCode, Json<ErrorResponse>)> {
    let delivery_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("google_play_webhook", %delivery_id);

    async {
        let result = reconcile(&state, &body).await;
        if let Err(e) = &result {
            if e.is_upstream() {
                tracing::warn!(error = %e, code = e.code(), "Webhook processing failed");
            } else {
                tracing::info!(error = %e, code = e.code(), "Webhook rejected");
            }
        }
        result
    }
    .instrument(span)
    .await
    .map(|outcome| Json(WebhookResponse::from(outcome)))
    .map_err(|e| (StatusCode::BAD_REQUEST, Json(ErrorResponse::from(&e))))
}

async fn reconcile(state: &AppState, body: &[u8]) -> Result<WebhookOutcome, EntitlementError> {
    let processor = state.processor()?;
    let body = std::str::from_utf8(body).map_err(|e| EntitlementError::InvalidPayload(e.to_string()))?;
    processor.handle_body(body).await
}
