//! Method dispatch.
//!
//! The handler validates the outer envelope, authenticates it, routes the
//! arguments through the matching request shape, and invokes the scoring
//! functions. It owns no state beyond borrowed capabilities, so one
//! handler may serve arbitrarily many concurrent calls.

use serde_json::{json, Value};

use crate::auth::{self, AuthConfig};
use crate::observability::Logger;
use crate::scoring::{get_interests, get_score, ScoreQuery};
use crate::store::Store;

use super::errors::ApiError;
use super::request::{ClientsInterestsRequest, MethodRequest, OnlineScoreRequest};
use super::response::Envelope;

/// Routed method names.
pub const METHOD_ONLINE_SCORE: &str = "online_score";
pub const METHOD_CLIENTS_INTERESTS: &str = "clients_interests";

/// Fixed score returned to the authenticated admin login.
const ADMIN_SCORE: f64 = 42.0;

/// Per-call context carried alongside the response for logging.
#[derive(Debug, Default)]
pub struct RequestContext {
    pub request_id: String,
    /// Non-empty argument names of an online-score call.
    pub has: Vec<String>,
    /// Number of client ids served by a clients-interests call.
    pub nclients: Option<usize>,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            ..Default::default()
        }
    }
}

/// Dispatches validated method calls against the store capability.
pub struct MethodHandler<'a> {
    store: &'a dyn Store,
    auth: &'a AuthConfig,
}

impl<'a> MethodHandler<'a> {
    pub fn new(store: &'a dyn Store, auth: &'a AuthConfig) -> Self {
        Self { store, auth }
    }

    /// Handles one raw request body and reports the response envelope.
    pub fn handle(&self, body: &Value, ctx: &mut RequestContext) -> Envelope {
        let Some(raw) = body.as_object() else {
            return Envelope::from_error(&ApiError::BadRequest(
                "request body must be a key/value object".into(),
            ));
        };

        let request = match MethodRequest::parse(raw) {
            Ok(request) => request,
            Err(errors) => return Envelope::from_error(&ApiError::Invalid(errors)),
        };

        if !auth::is_authenticated(&request, self.auth) {
            Logger::warn(
                "AUTH_REJECTED",
                &[
                    ("login", request.login.as_str()),
                    ("method", request.method.as_str()),
                    ("request_id", ctx.request_id.as_str()),
                ],
            );
            return Envelope::from_error(&ApiError::Forbidden);
        }

        match request.method.as_str() {
            METHOD_ONLINE_SCORE => self.online_score(&request, ctx),
            METHOD_CLIENTS_INTERESTS => self.clients_interests(&request, ctx),
            other => Envelope::from_error(&ApiError::UnknownMethod(other.to_string())),
        }
    }

    fn online_score(&self, envelope: &MethodRequest, ctx: &mut RequestContext) -> Envelope {
        let request = match OnlineScoreRequest::parse(&envelope.arguments) {
            Ok(request) => request,
            Err(errors) => return Envelope::from_error(&ApiError::Invalid(errors)),
        };

        ctx.has = request.supplied_fields().to_vec();

        let score = if envelope.is_admin(&self.auth.admin_login) {
            ADMIN_SCORE
        } else {
            get_score(
                self.store,
                &ScoreQuery {
                    phone: request.phone.as_deref(),
                    email: request.email.as_deref(),
                    birthday: request.birthday,
                    gender: request.gender,
                    first_name: request.first_name.as_deref(),
                    last_name: request.last_name.as_deref(),
                },
            )
        };

        Envelope::success(json!({ "score": score }))
    }

    fn clients_interests(&self, envelope: &MethodRequest, ctx: &mut RequestContext) -> Envelope {
        let request = match ClientsInterestsRequest::parse(&envelope.arguments) {
            Ok(request) => request,
            Err(errors) => return Envelope::from_error(&ApiError::Invalid(errors)),
        };

        ctx.nclients = Some(request.client_ids.len());

        let mut interests = serde_json::Map::new();
        for client_id in &request.client_ids {
            interests.insert(
                client_id.to_string(),
                json!(get_interests(self.store, *client_id)),
            );
        }

        Envelope::success(Value::Object(interests))
    }
}
