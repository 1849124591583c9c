//! Process settings schema.
//!
//! These settings describe how the proxy runs (where it listens, which
//! routing file it reads, how long shutdown may take). The routing file
//! itself has its own line format, see [`crate::config::routes`].
//!
//! All types derive Serde traits so the settings can come from an optional
//! TOML file; command line flags are applied on top afterwards.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root settings for the proxy process.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener settings (plain and encrypted).
    pub listener: ListenerConfig,

    /// Routing file location and reload behaviour.
    pub routes: RoutesConfig,

    /// Startup/shutdown timing.
    pub lifecycle: LifecycleConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
///
/// An empty address disables that listener.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Plain HTTP bind address (e.g. ":80" or "127.0.0.1:8080").
    pub http_address: String,

    /// TLS bind address. Empty means "do not serve TLS".
    pub tls_address: String,

    /// Certificate material for the TLS listener.
    pub tls: TlsConfig,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            http_address: ":80".to_string(),
            tls_address: String::new(),
            tls: TlsConfig::default(),
        }
    }
}

/// TLS certificate and key locations (PEM).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: PathBuf,

    /// Path to private key file (PEM).
    pub key_path: PathBuf,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            cert_path: PathBuf::from("server.crt"),
            key_path: PathBuf::from("server.key"),
        }
    }
}

/// Routing file configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RoutesConfig {
    /// Path to the routing file.
    pub path: PathBuf,

    /// Also reload when the routing file changes on disk.
    pub watch: bool,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("proxy.conf"),
            watch: false,
        }
    }
}

/// Lifecycle timing.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Time each listener gets to drain in-flight requests on shutdown.
    pub grace_period_ms: u64,
}

impl LifecycleConfig {
    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            grace_period_ms: 1000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format ("pretty" or "compact").
    pub log_format: String,

    /// Prometheus exporter bind address. Empty disables the exporter.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_address: String::new(),
        }
    }
}
