//! Hostname → backend mapping.
//!
//! # Design Decisions
//! - Exact, case-sensitive hostname keys (no wildcards, no subdomain inference)
//! - Built once by the routing-file parser, never mutated after publication
//! - Hostnames sharing a destination share one `Arc<Backend>`

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::backend::Backend;

/// An immutable routing table snapshot.
#[derive(Debug, Clone, Default)]
pub struct RoutingTable {
    entries: HashMap<String, Arc<Backend>>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the route for `host`, returning the previous backend.
    pub(crate) fn insert(
        &mut self,
        host: impl Into<String>,
        backend: Arc<Backend>,
    ) -> Option<Arc<Backend>> {
        self.entries.insert(host.into(), backend)
    }

    /// Exact lookup.
    pub fn get(&self, host: &str) -> Option<&Arc<Backend>> {
        self.entries.get(host)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Host → destination label, ordered by host.
    pub fn destinations(&self) -> BTreeMap<&str, &str> {
        self.entries
            .iter()
            .map(|(host, backend)| (host.as_str(), backend.destination()))
            .collect()
    }
}
