//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Configured address (":80", "127.0.0.1:8443", empty = disabled)
//!     → listener.rs (parse, bind, accept, graceful stop)
//!     → tls.rs (PEM certificate + key, TLS listener only)
//!     → Hand off to HTTP layer (http::server::app)
//! ```
//!
//! # Design Decisions
//! - At most one plain and one TLS listener
//! - Listeners share only the routing table; no other mutable state
//! - Shutdown is bounded by a grace period per listener

pub mod listener;
pub mod tls;

pub use listener::{Listener, ListenerError, ListenerKind};
