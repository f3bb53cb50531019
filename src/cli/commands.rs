//! CLI command implementations.
//!
//! `start` loads the service configuration, builds the store and the HTTP
//! server, and blocks on the async runtime. `check-config` validates the
//! configuration file and prints the effective settings.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::auth::AuthConfig;
use crate::http_server::{HttpServer, HttpServerConfig, MethodState};
use crate::observability::Logger;
use crate::store::InMemoryStore;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Service configuration file structure.
///
/// Every section has defaults, and a missing file is equivalent to an
/// empty one, so `tally start` works out of the box.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub http: HttpServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,
}

impl ServiceConfig {
    /// Load configuration from a file; absent files yield the defaults.
    pub fn load(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            let path_str = path.to_string_lossy();
            Logger::warn("CONFIG_DEFAULTED", &[("path", path_str.as_ref())]);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("failed to read config: {}", e)))?;

        let config: ServiceConfig = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    fn validate(&self) -> CliResult<()> {
        if self.http.port == 0 {
            return Err(CliError::config_error("http.port must be > 0"));
        }
        if self.auth.admin_login.is_empty() {
            return Err(CliError::config_error("auth.admin_login must not be empty"));
        }
        Ok(())
    }
}

/// Main CLI entry point.
///
/// Parses arguments and dispatches to the appropriate command. This is
/// the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args.
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Start { config, port } => start(&config, port),
        Command::CheckConfig { config } => check_config(&config),
    }
}

/// Start the scoring API server.
pub fn start(config_path: &Path, port_override: Option<u16>) -> CliResult<()> {
    let mut config = ServiceConfig::load(config_path)?;
    if let Some(port) = port_override {
        config.http.port = port;
    }

    let store = Arc::new(InMemoryStore::new());
    let state = Arc::new(MethodState::new(store, config.auth.clone()));
    let server = HttpServer::new(config.http.clone(), state);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })?;

    Ok(())
}

/// Validate the configuration and print the effective settings.
pub fn check_config(config_path: &Path) -> CliResult<()> {
    let config = ServiceConfig::load(config_path)?;
    let rendered = serde_json::to_string_pretty(&config)?;
    println!("{}", rendered);
    Ok(())
}
