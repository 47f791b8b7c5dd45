//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, base address resolution)
//!     → GatewayConfig (validated, immutable)
//!     → cloned into the subsystems that need it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::GatewayConfig;
pub use schema::{
    DownstreamConfig, LimitsConfig, ListenerConfig, LogFormat, ObservabilityConfig,
    OrchestrationConfig, SimulationConfig, TimeoutConfig,
};
pub use validation::{resolve_base_url, validate_config, ValidationError};
