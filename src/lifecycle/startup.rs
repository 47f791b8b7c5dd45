//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Build the downstream client and orchestrator
//! - Start metrics, bind the listener, serve
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{load_config, resolve_base_url, ConfigError, GatewayConfig, ValidationError};
use crate::downstream::HttpDownstream;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::{logging, metrics};
use crate::orchestration::Orchestrator;

/// Fatal errors raised before the gateway accepts traffic.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("failed to build downstream client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Load the config file if given, otherwise use defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<GatewayConfig, StartupError> {
    match path {
        Some(path) => Ok(load_config(path)?),
        None => {
            let config = GatewayConfig::default();
            crate::config::validate_config(&config)
                .map_err(|errors| StartupError::Config(ConfigError::Validation(errors)))?;
            Ok(config)
        }
    }
}

/// Build the orchestrator wired to an HTTP downstream client.
pub fn build_orchestrator(config: &GatewayConfig) -> Result<Orchestrator, StartupError> {
    let base_url = resolve_base_url(config)?;
    let downstream = HttpDownstream::new(base_url.clone(), &config.timeouts)?;
    tracing::info!(
        base_url = %base_url,
        deadline_ms = config.orchestration.deadline_ms,
        "Downstream client ready"
    );
    Ok(Orchestrator::new(
        Arc::new(downstream),
        config.orchestration.deadline(),
    ))
}

/// Run the gateway until a shutdown signal arrives.
pub async fn run(config: GatewayConfig) -> Result<(), StartupError> {
    logging::init(&config.observability);
    tracing::info!("fanout-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let server = HttpServer::new(config.clone())?;
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(&shutdown);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
