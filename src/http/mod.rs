//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection (net::listener)
//!     → server.rs (Axum router, trace + HSTS layers)
//!     → dispatch.rs (current table snapshot, host lookup)
//!     → backend (proxy to 127.0.0.1:<port> or serve directory)
//!     → Send to client
//! ```

pub mod dispatch;
pub mod server;

pub use dispatch::{DispatchOutcome, Dispatcher};
pub use server::app;
