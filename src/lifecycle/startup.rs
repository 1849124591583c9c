//! Startup orchestration.
//!
//! # Responsibilities
//! - Load the routing file and publish the first table
//! - Build the reload watcher and the server set
//!
//! # Design Decisions
//! - Fail fast: a bad routing file aborts before any listener opens
//! - Listeners start last, inside the supervisor

use thiserror::Error;

use crate::config::routes::{load_routes, RouteConfigError};
use crate::config::schema::ProxyConfig;
use crate::config::watcher::ReloadWatcher;
use crate::lifecycle::supervisor::Supervisor;
use crate::net::listener::ListenerError;
use crate::routing::RouteTable;

/// Fatal startup problems.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Routes(#[from] RouteConfigError),

    #[error(transparent)]
    Listener(#[from] ListenerError),
}

/// Load routes and assemble a supervisor ready to run.
pub fn prepare(config: &ProxyConfig) -> Result<Supervisor, StartupError> {
    let table = load_routes(&config.routes.path)?;
    tracing::info!(
        path = %config.routes.path.display(),
        routes = table.len(),
        "Routing table loaded"
    );
    if table.is_empty() {
        tracing::warn!("Routing table is empty, every request will get a 404");
    }

    let routes = RouteTable::shared(table);
    let reload =
        ReloadWatcher::new(&config.routes.path, routes.clone()).watch_file(config.routes.watch);

    Ok(Supervisor::new(
        &config.listener,
        config.lifecycle.grace_period(),
        routes,
        reload,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_routing_file_aborts_startup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proxy.conf");
        std::fs::write(&path, "badline\n").unwrap();

        let mut config = ProxyConfig::default();
        config.routes.path = path;

        match prepare(&config) {
            Err(StartupError::Routes(RouteConfigError::MalformedDirective(line))) => {
                assert_eq!(line, "badline")
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("startup should fail"),
        }
    }

    #[test]
    fn missing_routing_file_aborts_startup() {
        let mut config = ProxyConfig::default();
        config.routes.path = "/nonexistent/proxy.conf".into();
        assert!(matches!(
            prepare(&config),
            Err(StartupError::Routes(RouteConfigError::Unavailable { .. }))
        ));
    }

    #[test]
    fn valid_routing_file_builds_server_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proxy.conf");
        std::fs::write(&path, "a.com: 9000\n").unwrap();

        let mut config = ProxyConfig::default();
        config.routes.path = path;
        config.listener.http_address = "127.0.0.1:0".into();

        let supervisor = prepare(&config).unwrap();
        assert_eq!(supervisor.listener_kinds().len(), 1);
    }
}
