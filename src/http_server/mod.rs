//! HTTP transport for the method API.

pub mod config;
pub mod method_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use method_routes::{method_routes, MethodState};
pub use server::HttpServer;
