//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, limits, timeout, request ID)
//! - Bind server to listener
//! - Serve until the shutdown signal fires

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{GatewayConfig, SimulationConfig};
use crate::http::handlers;
use crate::http::request::{make_request_span, propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::startup::{build_orchestrator, StartupError};
use crate::orchestration::Orchestrator;

/// Application state injected into handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub orchestrator: Orchestrator,
    pub simulation: SimulationConfig,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server calling downstreams over HTTP.
    pub fn new(config: GatewayConfig) -> Result<Self, StartupError> {
        let orchestrator = build_orchestrator(&config)?;
        Ok(Self::with_orchestrator(config, orchestrator))
    }

    /// Create a server around an existing orchestrator.
    pub fn with_orchestrator(config: GatewayConfig, orchestrator: Orchestrator) -> Self {
        let state = AppState {
            orchestrator,
            simulation: config.simulation.clone(),
        };
        let router = Self::build_router(&config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers added last run first: the request ID is set before the trace
    /// span is created. The request timeout only wraps `/api/1` and
    /// `/health`; `/api/2` and `/api/3` run for as long as the requested
    /// delay. An elapsed timeout answers with an empty 500.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let timed = Router::new()
            .route("/api/1", get(handlers::get_1).post(handlers::post_1))
            .route("/health", get(handlers::health))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::INTERNAL_SERVER_ERROR,
                Duration::from_secs(config.timeouts.request_secs),
            ));

        Router::new()
            .route("/api/2", get(handlers::get_2).post(handlers::post_2))
            .route("/api/3", get(handlers::get_3).post(handlers::post_3))
            .merge(timed)
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.limits.max_body_bytes))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(set_request_id_layer())
    }

    /// The configured router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
