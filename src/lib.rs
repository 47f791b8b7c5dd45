//! Fan-out gateway library.
//!
//! Fans one inbound request out to several downstream HTTP endpoints under a
//! shared deadline and returns a single all-or-nothing result.

pub mod config;
pub mod downstream;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod orchestration;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use orchestration::Orchestrator;
