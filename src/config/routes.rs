//! Routing file parser.
//!
//! One directive per line:
//!
//! ```text
//! example.com, www.example.com: 8081
//! www.website.online: /var/www/website.online
//! ```
//!
//! The part after the first colon is either a port on 127.0.0.1 or an
//! existing directory. Any integer counts as a port; one outside the valid
//! range loads fine and answers 502 at request time. Hostnames are split on
//! commas and trimmed, and empty names (`a.com,,b.com`) are dropped, so a
//! request without a host never matches. Any bad line fails the whole parse;
//! no partial table is ever returned.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::backend::Backend;
use crate::routing::RoutingTable;

/// Printed by `--example`.
pub const EXAMPLE_ROUTES: &str = "\
example.com, www.example.com: 8081
subdomain.example.com: 10001
www.website.online: /var/www/website.online
";

/// Why a routing file was rejected.
#[derive(Debug, Error)]
pub enum RouteConfigError {
    /// The file could not be read.
    #[error("routing file {} unavailable: {source}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Line has no `hosts: destination` split.
    #[error("bad line: {0}")]
    MalformedDirective(String),

    /// Destination is neither a port nor an existing directory.
    #[error("invalid proxy target: {0}")]
    InvalidTarget(String),
}

/// Read and parse the routing file at `path`.
pub fn load_routes(path: &Path) -> Result<RoutingTable, RouteConfigError> {
    let text = fs::read_to_string(path).map_err(|source| RouteConfigError::Unavailable {
        path: path.to_path_buf(),
        source,
    })?;
    parse_routes(&text)
}

/// Parse routing file text into a table.
pub fn parse_routes(text: &str) -> Result<RoutingTable, RouteConfigError> {
    let mut table = RoutingTable::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let (hosts, destination) = line
            .split_once(':')
            .ok_or_else(|| RouteConfigError::MalformedDirective(line.to_string()))?;
        let destination = destination.trim();
        let backend = Arc::new(build_backend(destination).ok_or_else(|| {
            RouteConfigError::InvalidTarget(line.to_string())
        })?);

        for host in hosts.split(',').map(str::trim).filter(|h| !h.is_empty()) {
            tracing::debug!(host, destination, "Route loaded");
            if let Some(previous) = table.insert(host, Arc::clone(&backend)) {
                tracing::warn!(
                    host,
                    previous = previous.destination(),
                    destination,
                    "Host configured more than once, last line wins"
                );
            }
        }
    }

    Ok(table)
}

fn build_backend(destination: &str) -> Option<Backend> {
    if let Ok(port) = destination.parse::<i64>() {
        return Some(Backend::proxy(destination, port));
    }
    if Path::new(destination).is_dir() {
        return Some(Backend::directory(destination));
    }
    None
}
