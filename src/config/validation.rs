//! Configuration validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before the listener binds

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::RelayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid listen address '{0}'")]
    ListenAddress(String),

    #[error("invalid API base URL '{0}'")]
    ApiUrl(String),

    #[error("queue capacity must be greater than zero")]
    ZeroQueueCapacity,

    #[error("max body size must be greater than zero")]
    ZeroBodyLimit,

    #[error("request timeout must be greater than zero")]
    ZeroRequestTimeout,

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),
}

/// Check the configuration, collecting every error.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !is_host_port(&config.listener.bind_address) {
        errors.push(ValidationError::ListenAddress(config.listener.bind_address.clone()));
    }

    let api_ok = Url::parse(&config.telegram.api_base_url)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false);
    if !api_ok {
        errors.push(ValidationError::ApiUrl(config.telegram.api_base_url.clone()));
    }

    if config.delivery.queue_capacity == 0 {
        errors.push(ValidationError::ZeroQueueCapacity);
    }
    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if let Some(addr) = &config.observability.metrics_address {
        if addr.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::MetricsAddress(addr.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// `host:port` with a non-empty host and a numeric port. Hostnames are allowed.
fn is_host_port(addr: &str) -> bool {
    match addr.rsplit_once(':') {
        Some((host, port)) => !host.is_empty() && port.parse::<u16>().is_ok(),
        None => false,
    }
}
