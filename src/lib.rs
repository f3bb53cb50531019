//! tally - a strict, declarative request-validation and scoring service
//!
//! Request shapes are declared as ordered field schemas; the validation
//! engine enforces presence, emptiness, and format constraints, aggregates
//! every violation, and hands validated requests to the scoring functions.

pub mod api;
pub mod auth;
pub mod cli;
pub mod http_server;
pub mod observability;
pub mod schema;
pub mod scoring;
pub mod store;
