//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges and address formats
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LedgerConfig → Result<(), Vec<ValidationError>>
//! - An empty API key is not an error here; it is only required by callers
//!   that actually talk to the ledger

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::LedgerConfig;

/// One semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("client.base_url '{value}' is not an absolute http(s) URL")]
    InvalidBaseUrl { value: String },

    #[error("client.timeout_ms must be greater than zero")]
    ZeroTimeout,

    #[error("{field} '{value}' is not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("receiver.path '{value}' must start with '/'")]
    InvalidPath { value: String },

    #[error("receiver.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &LedgerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let base_url = &config.client.base_url;
    match Url::parse(base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
        _ => errors.push(ValidationError::InvalidBaseUrl {
            value: base_url.clone(),
        }),
    }

    if config.client.timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.receiver.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "receiver.bind_address",
            value: config.receiver.bind_address.clone(),
        });
    }

    if !config.receiver.path.starts_with('/') {
        errors.push(ValidationError::InvalidPath {
            value: config.receiver.path.clone(),
        });
    }

    if config.receiver.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
