//! Response envelope.
//!
//! Every method call answers with `{"code": ..., "response": ...}` on
//! success or `{"code": ..., "error": ...}` on failure; the transport
//! mirrors `code` as the HTTP status.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::ApiError;

/// Response code for a successful call.
pub const OK: u16 = 200;

/// Unified response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub code: u16,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    /// A successful response carrying the method payload.
    pub fn success(payload: Value) -> Self {
        Self {
            code: OK,
            response: Some(payload),
            error: None,
        }
    }

    /// A failed response carrying the error message for the given code.
    pub fn failure(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            response: None,
            error: Some(message.into()),
        }
    }

    /// Envelope for an [`ApiError`].
    pub fn from_error(err: &ApiError) -> Self {
        Self::failure(err.code(), err.to_string())
    }

    pub fn is_success(&self) -> bool {
        self.code == OK
    }

    /// Serialize to the wire string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("envelope serialization cannot fail")
    }
}
