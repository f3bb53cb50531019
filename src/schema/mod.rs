//! Declarative field schemas and the validation engine.
//!
//! A request shape declares its fields once, in order, as a `const`
//! [`Schema`]; the engine walks that registry, cleans every raw value,
//! and aggregates all violations before reporting.

pub mod errors;
pub mod types;
pub mod validator;

pub use errors::{FieldError, ValidationError, ValidationErrors};
pub use types::{FieldDef, FieldKind, FieldSpec, FieldValue, Gender, Schema};
pub use validator::CleanedFields;
