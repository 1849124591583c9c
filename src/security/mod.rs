//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Plain listener response:
//!     → headers.rs (add Strict-Transport-Security)
//!
//! Proxied request / response:
//!     → headers.rs (strip hop-by-hop, add X-Forwarded-For)
//! ```

pub mod headers;
