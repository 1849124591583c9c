//! The published routing table.
//!
//! # Responsibilities
//! - Hold the single "current" routing table
//! - Lock-free reads for request dispatch
//! - Whole-table replacement on reload
//!
//! # Design Decisions
//! - `ArcSwap` cell: readers never see a partially built table
//! - Readers clone the matched `Arc<Backend>` and drop the snapshot guard
//!   before awaiting, so a reload never waits on in-flight requests
//! - No per-key mutation: the only write is `publish`

use arc_swap::ArcSwap;
use std::sync::Arc;

use crate::backend::Backend;
use crate::observability::metrics;
use crate::routing::table::RoutingTable;

/// Atomically swappable holder of the current [`RoutingTable`].
#[derive(Debug)]
pub struct RouteTable {
    current: ArcSwap<RoutingTable>,
}

/// Shared handle given to every listener and the reload watcher.
pub type SharedRouteTable = Arc<RouteTable>;

impl RouteTable {
    pub fn new(table: RoutingTable) -> Self {
        metrics::set_route_count(table.len());
        Self {
            current: ArcSwap::from_pointee(table),
        }
    }

    /// Convenience constructor for the shared form.
    pub fn shared(table: RoutingTable) -> SharedRouteTable {
        Arc::new(Self::new(table))
    }

    /// Look up `host` in the current snapshot.
    pub fn lookup(&self, host: &str) -> Option<Arc<Backend>> {
        self.current.load().get(host).cloned()
    }

    /// Full snapshot of the current table.
    pub fn snapshot(&self) -> Arc<RoutingTable> {
        self.current.load_full()
    }

    /// Replace the current table, returning the one it replaced.
    pub fn publish(&self, table: RoutingTable) -> Arc<RoutingTable> {
        metrics::set_route_count(table.len());
        self.current.swap(Arc::new(table))
    }
}
