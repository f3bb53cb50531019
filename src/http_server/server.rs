//! HTTP server combining the method routes.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Json, Router};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::observability::Logger;

use super::config::HttpServerConfig;
use super::method_routes::{method_routes, MethodState};

/// HTTP server for the method API.
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server from configuration and the shared method state.
    pub fn new(config: HttpServerConfig, state: Arc<MethodState>) -> Self {
        let router = Self::build_router(&config, state);
        Self { config, router }
    }

    /// Build the router with all endpoints.
    fn build_router(config: &HttpServerConfig, state: Arc<MethodState>) -> Router {
        let cors = if config.cors_origins.is_empty() {
            // Permissive for development
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            use tower_http::cors::AllowOrigin;
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .route("/health", get(health_handler))
            .merge(method_routes(state))
            .layer(cors)
    }

    /// Get the socket address.
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing).
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server.
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid socket address '{}': {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        let bound = listener.local_addr()?;
        let addr_str = bound.to_string();
        Logger::info("SERVER_STARTED", &[("addr", addr_str.as_str())]);

        axum::serve(listener, self.router).await?;

        Ok(())
    }
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}
