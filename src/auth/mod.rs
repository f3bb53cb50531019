//! Token-based request authentication.

pub mod token;

pub use token::{admin_digest, is_authenticated, user_digest, AuthConfig};
