//! Method API HTTP routes.
//!
//! `POST /method` carries the request envelope as a JSON body. The body is
//! parsed here rather than by an extractor so that malformed JSON maps to
//! the 400 envelope instead of a transport-level rejection; the envelope
//! code is mirrored as the HTTP status.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::post,
    Router,
};
use uuid::Uuid;

use crate::api::{ApiError, Envelope, MethodHandler, RequestContext};
use crate::auth::AuthConfig;
use crate::observability::Logger;
use crate::store::Store;

/// Header carrying a caller-assigned request id.
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Shared state for the method routes.
pub struct MethodState {
    pub store: Arc<dyn Store>,
    pub auth: AuthConfig,
}

impl MethodState {
    pub fn new(store: Arc<dyn Store>, auth: AuthConfig) -> Self {
        Self { store, auth }
    }
}

/// Method routes with shared state.
pub fn method_routes(state: Arc<MethodState>) -> Router {
    Router::new()
        .route("/method", post(method_handler))
        .with_state(state)
}

async fn method_handler(
    State(state): State<Arc<MethodState>>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, Json<Envelope>) {
    let request_id = request_id(&headers);

    let parsed: serde_json::Value = match serde_json::from_str(&body) {
        Ok(value) => value,
        Err(e) => {
            let envelope =
                Envelope::from_error(&ApiError::BadRequest(format!("invalid JSON: {}", e)));
            Logger::warn(
                "REQUEST_REJECTED",
                &[("reason", "malformed body"), ("request_id", &request_id)],
            );
            return respond(envelope);
        }
    };

    let mut ctx = RequestContext::new(request_id);
    let handler = MethodHandler::new(state.store.as_ref(), &state.auth);
    let envelope = handler.handle(&parsed, &mut ctx);

    let code = envelope.code.to_string();
    let has = ctx.has.join(",");
    let nclients = ctx.nclients.map(|n| n.to_string()).unwrap_or_default();
    Logger::info(
        "REQUEST_HANDLED",
        &[
            ("code", code.as_str()),
            ("has", has.as_str()),
            ("nclients", nclients.as_str()),
            ("request_id", ctx.request_id.as_str()),
        ],
    );

    respond(envelope)
}

/// Caller-assigned request id, or a fresh one.
fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().simple().to_string())
}

fn respond(envelope: Envelope) -> (StatusCode, Json<Envelope>) {
    let status =
        StatusCode::from_u16(envelope.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(envelope))
}
