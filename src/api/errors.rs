//! API error types and their response-code mapping.

use thiserror::Error;

use crate::schema::ValidationErrors;

/// Failures a method call can produce, each mapped to a response code.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request payload is not valid JSON or not an object.
    #[error("{0}")]
    BadRequest(String),

    /// Authentication failed; no detail about which component was wrong.
    #[error("Forbidden")]
    Forbidden,

    /// Field or cross-field validation failed.
    #[error("{0}")]
    Invalid(ValidationErrors),

    /// The requested method name is not routed.
    #[error("unknown method '{0}'")]
    UnknownMethod(String),

    /// The request path is not served.
    #[error("Not Found")]
    NotFound,

    /// Unexpected internal failure.
    #[error("Internal Server Error")]
    Internal,
}

impl ApiError {
    /// The response code carried in the envelope (and mirrored as the
    /// HTTP status).
    pub fn code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::Forbidden => 403,
            ApiError::NotFound => 404,
            ApiError::Invalid(_) | ApiError::UnknownMethod(_) => 422,
            ApiError::Internal => 500,
        }
    }
}
