//! Listener supervision.
//!
//! # Responsibilities
//! - Start every listener and both watchers (reload, termination) as
//!   independent tasks
//! - Wait for the first task to finish, a termination signal, or an
//!   explicit stop
//! - Stop everything: listeners drain concurrently within the grace period,
//!   watchers are cancelled through the shared [`Shutdown`]
//!
//! # State Machine
//! ```text
//! Idle → Starting → Running → Stopping → Stopped
//! ```
//!
//! # Design Decisions
//! - The first task to finish decides the shutdown reason
//! - A failed listener takes the whole process down; listeners have no
//!   redundancy, so running with one dead is not a safe degraded state
//! - Tasks still alive after the grace period (plus a small margin) are aborted

use axum_server::Handle;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinSet;

use crate::config::schema::ListenerConfig;
use crate::config::watcher::{ReloadHandle, ReloadWatcher};
use crate::http::server::app;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals;
use crate::net::listener::{begin_shutdown, Listener, ListenerError, ListenerKind};
use crate::routing::SharedRouteTable;

/// Slack on top of the grace period before stragglers are aborted.
const STOP_MARGIN: Duration = Duration::from_millis(250);

/// Supervisor lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Idle,
    Starting,
    Running,
    Stopping,
    Stopped,
}

/// Why the supervisor stopped.
#[derive(Debug, Error)]
pub enum ShutdownReason {
    /// Termination signal received.
    #[error("received signal {0}")]
    Signal(&'static str),

    /// A listener could not bind, accept or load its TLS material.
    #[error("{listener} listener failed: {source}")]
    ListenerFailed {
        listener: ListenerKind,
        #[source]
        source: ListenerError,
    },

    /// [`Supervisor::stop_handle`] was triggered.
    #[error("stop requested")]
    Stopped,

    /// A task returned although nothing asked it to.
    #[error("{0} exited unexpectedly")]
    TaskExited(String),

    /// A task panicked or was cancelled by the runtime.
    #[error("task failed: {0}")]
    TaskFailed(String),

    /// The termination signal handler could not be installed.
    #[error("signal handler unavailable: {0}")]
    SignalSetup(#[source] std::io::Error),
}

impl ShutdownReason {
    /// Whether the process should exit with a failure status.
    pub fn is_failure(&self) -> bool {
        !matches!(self, ShutdownReason::Signal(_) | ShutdownReason::Stopped)
    }
}

/// Owns the listeners and watchers of one process run.
pub struct Supervisor {
    listeners: Vec<Listener>,
    routes: SharedRouteTable,
    reload: ReloadWatcher,
    grace: Duration,
    stop: Shutdown,
    state: watch::Sender<SupervisorState>,
}

impl Supervisor {
    /// Build the server set. Empty addresses disable that listener.
    pub fn new(
        config: &ListenerConfig,
        grace: Duration,
        routes: SharedRouteTable,
        reload: ReloadWatcher,
    ) -> Result<Self, ListenerError> {
        let mut listeners = Vec::new();

        if config.tls_address.is_empty() {
            tracing::info!("not serving TLS");
        } else {
            listeners.push(Listener::tls(
                &config.tls_address,
                &config.tls.cert_path,
                &config.tls.key_path,
            )?);
        }

        if config.http_address.is_empty() {
            tracing::info!("not serving HTTP");
        } else {
            listeners.push(Listener::http(&config.http_address)?);
        }

        let (state, _) = watch::channel(SupervisorState::Idle);

        Ok(Self {
            listeners,
            routes,
            reload,
            grace,
            stop: Shutdown::new(),
            state,
        })
    }

    /// Kinds of the listeners that will run.
    pub fn listener_kinds(&self) -> Vec<ListenerKind> {
        self.listeners.iter().map(Listener::kind).collect()
    }

    /// Handles for each listener, e.g. to await the bound address.
    pub fn listener_handles(&self) -> Vec<(ListenerKind, Handle)> {
        self.listeners
            .iter()
            .map(|listener| (listener.kind(), listener.handle()))
            .collect()
    }

    /// Trigger to stop the supervisor from outside.
    pub fn stop_handle(&self) -> Shutdown {
        self.stop.clone()
    }

    pub fn reload_handle(&self) -> ReloadHandle {
        self.reload.handle()
    }

    pub fn state(&self) -> watch::Receiver<SupervisorState> {
        self.state.subscribe()
    }

    /// Run until the first task finishes or a stop is requested, then tear
    /// everything down. Returns the reason that started the shutdown.
    pub async fn run(self) -> ShutdownReason {
        let Self {
            listeners,
            routes,
            reload,
            grace,
            stop,
            state,
        } = self;

        state.send_replace(SupervisorState::Starting);

        let cancel = Shutdown::new();
        let mut tasks: JoinSet<ShutdownReason> = JoinSet::new();
        let mut handles = Vec::with_capacity(listeners.len());

        for listener in listeners {
            let kind = listener.kind();
            let app = app(routes.clone());
            handles.push(listener.handle());
            tasks.spawn(async move {
                match listener.serve(app).await {
                    Ok(()) => ShutdownReason::TaskExited(format!("{} listener", kind)),
                    Err(source) => ShutdownReason::ListenerFailed {
                        listener: kind,
                        source,
                    },
                }
            });
        }

        // Signal handlers go in before Running is reported so no trigger is missed.
        let reload = reload.listen_for_hangup();
        let termination = signals::Termination::new();

        let reload_cancel = cancel.subscribe();
        tasks.spawn(async move {
            reload.run(reload_cancel).await;
            ShutdownReason::TaskExited("reload watcher".to_string())
        });

        let mut termination_cancel = cancel.subscribe();
        tasks.spawn(async move {
            let mut termination = match termination {
                Ok(termination) => termination,
                Err(e) => return ShutdownReason::SignalSetup(e),
            };
            tokio::select! {
                signal = termination.recv() => match signal {
                    Ok(name) => ShutdownReason::Signal(name),
                    Err(e) => ShutdownReason::SignalSetup(e),
                },
                _ = termination_cancel.wait() => {
                    ShutdownReason::TaskExited("termination watcher".to_string())
                }
            }
        });

        state.send_replace(SupervisorState::Running);
        tracing::debug!(tasks = tasks.len(), "Supervisor running");

        let mut stop_requested = stop.subscribe();
        let reason = tokio::select! {
            Some(joined) = tasks.join_next() => match joined {
                Ok(reason) => reason,
                Err(e) => ShutdownReason::TaskFailed(e.to_string()),
            },
            _ = stop_requested.wait() => ShutdownReason::Stopped,
        };

        state.send_replace(SupervisorState::Stopping);
        tracing::info!(reason = %reason, grace_ms = grace.as_millis() as u64, "Shutting down");

        cancel.trigger();
        for handle in &handles {
            begin_shutdown(handle, grace);
        }

        let drained = tokio::time::timeout(grace + STOP_MARGIN, async {
            while let Some(joined) = tasks.join_next().await {
                if let Err(e) = joined {
                    tracing::warn!(error = %e, "Task failed during shutdown");
                }
            }
        })
        .await;

        if drained.is_err() {
            tracing::warn!(
                remaining = tasks.len(),
                "Tasks did not stop within grace period, aborting"
            );
            tasks.abort_all();
        }

        state.send_replace(SupervisorState::Stopped);
        reason
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{RouteTable, RoutingTable};
    use std::path::Path;

    fn routes() -> SharedRouteTable {
        RouteTable::shared(RoutingTable::new())
    }

    fn listener_config(http: &str, tls: &str) -> ListenerConfig {
        ListenerConfig {
            http_address: http.to_string(),
            tls_address: tls.to_string(),
            ..ListenerConfig::default()
        }
    }

    fn supervisor(config: &ListenerConfig) -> Supervisor {
        let routes = routes();
        let reload = ReloadWatcher::new(Path::new("/nonexistent/proxy.conf"), routes.clone());
        Supervisor::new(config, Duration::from_millis(200), routes, reload).unwrap()
    }

    #[test]
    fn empty_addresses_are_excluded() {
        assert!(supervisor(&listener_config("", "")).listener_kinds().is_empty());
        assert_eq!(
            supervisor(&listener_config("127.0.0.1:0", "")).listener_kinds(),
            vec![ListenerKind::Http]
        );
        assert_eq!(
            supervisor(&listener_config("127.0.0.1:0", "127.0.0.1:0")).listener_kinds(),
            vec![ListenerKind::Tls, ListenerKind::Http]
        );
    }

    #[test]
    fn bad_address_is_rejected_up_front() {
        let routes = routes();
        let reload = ReloadWatcher::new(Path::new("proxy.conf"), routes.clone());
        let result = Supervisor::new(
            &listener_config("nonsense", ""),
            Duration::from_secs(1),
            routes,
            reload,
        );
        assert!(matches!(result, Err(ListenerError::Address(_))));
    }

    #[tokio::test]
    async fn explicit_stop_walks_the_state_machine() {
        let supervisor = supervisor(&listener_config("127.0.0.1:0", ""));
        let stop = supervisor.stop_handle();
        let mut state = supervisor.state();
        assert_eq!(*state.borrow(), SupervisorState::Idle);

        let handle = supervisor.listener_handles().remove(0).1;
        let run = tokio::spawn(supervisor.run());

        assert!(handle.listening().await.is_some());
        state
            .wait_for(|s| *s == SupervisorState::Running)
            .await
            .unwrap();

        stop.trigger();
        let reason = tokio::time::timeout(Duration::from_secs(2), run)
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(reason, ShutdownReason::Stopped));
        assert!(!reason.is_failure());
        assert_eq!(*state.borrow(), SupervisorState::Stopped);
    }

    #[tokio::test]
    async fn listener_failure_stops_everything() {
        let config = ListenerConfig {
            http_address: "127.0.0.1:0".to_string(),
            tls_address: "127.0.0.1:0".to_string(),
            tls: crate::config::schema::TlsConfig {
                cert_path: "/nonexistent/server.crt".into(),
                key_path: "/nonexistent/server.key".into(),
            },
        };
        let supervisor = supervisor(&config);

        let reason = tokio::time::timeout(Duration::from_secs(2), supervisor.run())
            .await
            .expect("supervisor should stop on its own");
        match reason {
            ShutdownReason::ListenerFailed { listener, source } => {
                assert_eq!(listener, ListenerKind::Tls);
                assert!(matches!(source, ListenerError::TlsFile { .. }));
            }
            other => panic!("unexpected reason: {other}"),
        }
    }

    #[test]
    fn failure_classification() {
        assert!(!ShutdownReason::Signal("SIGTERM").is_failure());
        assert!(ShutdownReason::TaskExited("HTTP listener".into()).is_failure());
        assert_eq!(
            ShutdownReason::Signal("SIGINT").to_string(),
            "received signal SIGINT"
        );
    }
}
