//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! settings file (TOML, optional) + CLI flags
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (immutable)
//!
//! routing file (host[, host...]: destination)
//!     → routes.rs (parse, fail fast)
//!     → RoutingTable → published in routing::RouteTable
//!
//! On reload trigger (SIGHUP / file change / ReloadHandle):
//!     watcher.rs → routes.rs → atomic publish, or keep current table on error
//! ```
//!
//! # Design Decisions
//! - Routing tables are immutable once parsed; changes require a full reload
//! - All settings fields have defaults to allow minimal settings files
//! - A bad routing file is fatal at startup, never on reload

pub mod loader;
pub mod routes;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use routes::{load_routes, parse_routes, RouteConfigError, EXAMPLE_ROUTES};
pub use schema::{
    LifecycleConfig, ListenerConfig, ObservabilityConfig, ProxyConfig, RoutesConfig, TlsConfig,
};
pub use watcher::{ReloadHandle, ReloadTrigger, ReloadWatcher};
