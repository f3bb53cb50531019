//! Validation error types.
//!
//! Per-field failures and cross-field rule failures are collected into a
//! single [`ValidationErrors`] list; validation never stops at the first
//! failing field, so one bad payload reports all of its problems at once.

use std::fmt;

use thiserror::Error;

/// A single field's validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The field is required but absent from the input.
    #[error("field is required")]
    MissingRequired,

    /// The field is present but empty, and empty values are not allowed.
    #[error("field must not be empty")]
    EmptyNotAllowed,

    /// The field value does not match the declared kind.
    #[error("{0}")]
    InvalidFormat(String),
}

impl FieldError {
    /// Shorthand for a [`FieldError::InvalidFormat`] with a formatted message.
    pub fn invalid(msg: impl Into<String>) -> Self {
        FieldError::InvalidFormat(msg.into())
    }
}

/// One recorded validation failure: either a per-field error or a
/// cross-field rule violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A per-field failure, attributed to the declared field name.
    Field {
        field: &'static str,
        error: FieldError,
    },
    /// A cross-field requirement that the non-empty field set failed to meet.
    Rule { message: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Field { field, error } => {
                write!(f, "field '{}': {}", field, error)
            }
            ValidationError::Rule { message } => write!(f, "{}", message),
        }
    }
}

/// The aggregated outcome of a failed validation pass.
///
/// Displays as all messages joined with `"; "`, the shape the 422
/// response body carries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Record a per-field failure.
    pub fn push_field(&mut self, field: &'static str, error: FieldError) {
        self.0.push(ValidationError::Field { field, error });
    }

    /// Build a single cross-field rule violation.
    pub fn rule(message: impl Into<String>) -> Self {
        Self(vec![ValidationError::Rule {
            message: message.into(),
        }])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Whether any recorded failure names the given field.
    pub fn mentions(&self, field: &str) -> bool {
        self.0.iter().any(|e| match e {
            ValidationError::Field { field: f, .. } => *f == field,
            ValidationError::Rule { .. } => false,
        })
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
