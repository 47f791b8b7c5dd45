//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (deadline > 0, delay bounds ordered)
//! - Resolve the downstream base address
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("downstream.base_url '{0}' is not a valid http(s) URL")]
    BaseUrl(String),

    #[error("orchestration.deadline_ms must be greater than zero")]
    ZeroDeadline,

    #[error("simulation delay range [{min}, {max}) is empty or negative")]
    DelayRange { min: i64, max: i64 },

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),
}

/// Check every semantic rule and collect all violations.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    } else if let Err(e) = resolve_base_url(config) {
        errors.push(e);
    }

    if config.orchestration.deadline_ms == 0 {
        errors.push(ValidationError::ZeroDeadline);
    }

    let (min, max) = (
        config.simulation.random_delay_min_ms,
        config.simulation.random_delay_max_ms,
    );
    if min < 0 || min >= max {
        errors.push(ValidationError::DelayRange { min, max });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Resolve the base address downstream calls are joined onto.
///
/// An explicit `downstream.base_url` wins. Otherwise the gateway targets its
/// own listener, with an unspecified bind IP mapped to loopback. The result
/// always ends in `/` so that resources join as path segments.
pub fn resolve_base_url(config: &GatewayConfig) -> Result<Url, ValidationError> {
    let raw = match &config.downstream.base_url {
        Some(url) => url.clone(),
        None => {
            let mut addr: SocketAddr = config
                .listener
                .bind_address
                .parse()
                .map_err(|_| ValidationError::BindAddress(config.listener.bind_address.clone()))?;
            if addr.ip().is_unspecified() {
                addr.set_ip(std::net::Ipv4Addr::LOCALHOST.into());
            }
            format!("http://{}/", addr)
        }
    };

    let mut url = Url::parse(&raw).map_err(|_| ValidationError::BaseUrl(raw.clone()))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ValidationError::BaseUrl(raw));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
