//! Webhook ingestion: an axum router that authenticates pushed updates,
//! decodes them into the same [`Update`] type the polling path delivers, and
//! always acknowledges accepted requests so the platform does not redeliver.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use tracing::{debug, warn};

use botgram_core::{Update, UpdateHandler};

/// Header the platform echoes the configured secret token in.
pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Webhook ingestion options.
#[derive(Debug, Clone, Default)]
pub struct WebhookOptions {
    /// When set, requests must carry the matching secret header; everything
    /// else is rejected with 403 before the body is even decoded.
    pub secret_token: Option<String>,
}

struct WebhookState {
    handler: Arc<dyn UpdateHandler>,
    secret_token: Option<String>,
}

/// Builds a router serving the webhook endpoint at `/`. Nest it under any
/// path; non-POST requests to the endpoint get 405 from the method router.
/// The router holds no per-request state and serves concurrent requests.
pub fn webhook_router(handler: Arc<dyn UpdateHandler>, options: WebhookOptions) -> Router {
    let state = Arc::new(WebhookState {
        handler,
        secret_token: options.secret_token,
    });
    Router::new()
        .route("/", post(receive_update))
        .with_state(state)
}

async fn receive_update(
    State(state): State<Arc<WebhookState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(expected) = &state.secret_token {
        let presented = headers
            .get(SECRET_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok());
        if presented != Some(expected.as_str()) {
            warn!("webhook request rejected: secret token mismatch");
            return StatusCode::FORBIDDEN.into_response();
        }
    }

    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!(error = %e, "webhook request rejected: undecodable body");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let update_id = update.update_id;
    debug!(update_id, "webhook update accepted");

    // The delivery contract wants 200 regardless of what the application does
    // with the update; a non-200 here would trigger redelivery storms.
    if let Err(e) = state.handler.handle_update(update).await {
        warn!(update_id, error = %e, "webhook handler failed");
    }

    (StatusCode::OK, Json(json!({"ok": true}))).into_response()
}
