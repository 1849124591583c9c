//! Settings validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check listener addresses are usable bind addresses
//! - Check TLS material is named when the TLS listener is enabled
//! - Validate value ranges (grace period > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before any listener is started

use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::net::listener::parse_bind_address;
use crate::observability::logging::LogFormat;

/// A single settings problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid {field} address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("TLS listener enabled but {0} is empty")]
    MissingTlsMaterial(&'static str),

    #[error("grace period must be greater than zero")]
    ZeroGracePeriod,

    #[error("unknown log format {0:?}")]
    UnknownLogFormat(String),
}

/// Validate the process settings.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let listener = &config.listener;
    for (field, value) in [
        ("http", &listener.http_address),
        ("tls", &listener.tls_address),
    ] {
        if !value.is_empty() && parse_bind_address(value).is_err() {
            errors.push(ValidationError::InvalidAddress {
                field,
                value: value.clone(),
            });
        }
    }

    if !listener.tls_address.is_empty() {
        if listener.tls.cert_path.as_os_str().is_empty() {
            errors.push(ValidationError::MissingTlsMaterial("cert_path"));
        }
        if listener.tls.key_path.as_os_str().is_empty() {
            errors.push(ValidationError::MissingTlsMaterial("key_path"));
        }
    }

    if config.lifecycle.grace_period_ms == 0 {
        errors.push(ValidationError::ZeroGracePeriod);
    }

    let metrics_address = &config.observability.metrics_address;
    if !metrics_address.is_empty() && parse_bind_address(metrics_address).is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "metrics",
            value: metrics_address.clone(),
        });
    }

    if config.observability.log_format.parse::<LogFormat>().is_err() {
        errors.push(ValidationError::UnknownLogFormat(
            config.observability.log_format.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
