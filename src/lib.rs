//! Host-based HTTP/TLS reverse proxy.
//!
//! Requests are routed on their hostname to either a port on 127.0.0.1 or a
//! static directory, as listed in a plain-text routing file that can be
//! reloaded without restarting the listeners.

pub mod backend;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::schema::ProxyConfig;
pub use lifecycle::{Shutdown, ShutdownReason, Supervisor};
pub use routing::{RouteTable, RoutingTable};
