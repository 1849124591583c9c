//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load routing file → Publish table → Build listeners + watchers
//!
//! Supervision (supervisor.rs):
//!     Spawn listeners, reload watcher, termination watcher
//!     → first to finish (or explicit stop) decides the reason
//!     → cancel watchers, drain listeners concurrently → Stopped
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//!     SIGHUP → Trigger routing reload
//! ```
//!
//! # Design Decisions
//! - Ordered startup: routing table first, listeners last
//! - Shutdown has timeout: forced abort after the grace period
//! - Cancellation is one-shot

pub mod shutdown;
pub mod signals;
pub mod startup;
pub mod supervisor;

pub use shutdown::{Shutdown, ShutdownListener};
pub use startup::{prepare, StartupError};
pub use supervisor::{ShutdownReason, Supervisor, SupervisorState};
