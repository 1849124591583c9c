//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Routing file text
//!     → config::routes (parse, fail fast)
//!     → table.rs (RoutingTable, immutable)
//!     → router.rs (RouteTable: ArcSwap publish)
//!
//! Per request:
//!     Host → RouteTable::lookup → Arc<Backend> or miss
//! ```
//!
//! # Design Decisions
//! - Tables are built fresh and published whole, never edited in place
//! - Deterministic: same text always yields the same mapping
//! - Last line wins for duplicated hostnames

pub mod router;
pub mod table;

pub use router::{RouteTable, SharedRouteTable};
pub use table::RoutingTable;
