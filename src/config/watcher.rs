//! Routing-file reload.
//!
//! Each trigger (SIGHUP, a file change when watching is enabled, or an
//! explicit request through a [`ReloadHandle`]) is one reload attempt. A
//! successful parse is published whole; a failed one is logged and the
//! current table stays in place.

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::config::routes::{load_routes, RouteConfigError};
use crate::lifecycle::shutdown::ShutdownListener;
use crate::lifecycle::signals::Hangup;
use crate::observability::metrics;
use crate::routing::SharedRouteTable;

/// What asked for a reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadTrigger {
    /// SIGHUP.
    Hangup,
    /// The routing file changed on disk.
    FileChanged,
    /// Programmatic request.
    Requested,
}

/// Cloneable handle for requesting reloads.
#[derive(Debug, Clone)]
pub struct ReloadHandle {
    tx: mpsc::UnboundedSender<ReloadTrigger>,
}

impl ReloadHandle {
    /// Queue a reload. Returns false once the watcher has stopped.
    pub fn request(&self) -> bool {
        self.tx.send(ReloadTrigger::Requested).is_ok()
    }
}

/// Re-reads the routing file and republishes the table on each trigger.
pub struct ReloadWatcher {
    path: PathBuf,
    routes: SharedRouteTable,
    watch_file: bool,
    hangup: Option<Hangup>,
    tx: mpsc::UnboundedSender<ReloadTrigger>,
    rx: mpsc::UnboundedReceiver<ReloadTrigger>,
}

impl ReloadWatcher {
    pub fn new(path: &Path, routes: SharedRouteTable) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            path: path.to_path_buf(),
            routes,
            watch_file: false,
            hangup: None,
            tx,
            rx,
        }
    }

    /// Also reload when the routing file changes on disk.
    pub fn watch_file(mut self, enabled: bool) -> Self {
        self.watch_file = enabled;
        self
    }

    /// Install the SIGHUP handler now rather than when [`run`](Self::run)
    /// is first polled. Must be called inside a Tokio runtime.
    pub fn listen_for_hangup(mut self) -> Self {
        if self.hangup.is_none() {
            self.hangup = install_hangup();
        }
        self
    }

    pub fn handle(&self) -> ReloadHandle {
        ReloadHandle {
            tx: self.tx.clone(),
        }
    }

    /// Run one reload attempt. Returns the number of routes published.
    pub fn reload(&self, trigger: ReloadTrigger) -> Result<usize, RouteConfigError> {
        tracing::info!(path = %self.path.display(), ?trigger, "Reloading routing file");

        match load_routes(&self.path) {
            Ok(table) => {
                let count = table.len();
                self.routes.publish(table);
                metrics::record_reload(true);
                tracing::info!(routes = count, "Routing table reloaded");
                Ok(count)
            }
            Err(e) => {
                metrics::record_reload(false);
                tracing::error!(error = %e, "Bad routing file, keeping current table");
                Err(e)
            }
        }
    }

    /// Process triggers until `shutdown` fires.
    pub async fn run(mut self, mut shutdown: ShutdownListener) {
        let _file_watcher = if self.watch_file {
            match self.start_file_watcher() {
                Ok(watcher) => Some(watcher),
                Err(e) => {
                    tracing::warn!(error = %e, "Routing file watch unavailable, SIGHUP only");
                    None
                }
            }
        } else {
            None
        };

        let mut hangup = self.hangup.take().or_else(install_hangup);

        loop {
            tokio::select! {
                _ = shutdown.wait() => {
                    tracing::debug!("Reload watcher stopped");
                    return;
                }
                Some(trigger) = self.rx.recv() => {
                    let _ = self.reload(trigger);
                }
                _ = recv_hangup(&mut hangup) => {
                    let _ = self.reload(ReloadTrigger::Hangup);
                }
            }
        }
    }

    fn start_file_watcher(&self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.tx.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::debug!("Routing file change detected");
                        let _ = tx.send(ReloadTrigger::FileChanged);
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;
        tracing::info!(path = %self.path.display(), "Routing file watcher started");
        Ok(watcher)
    }
}

fn install_hangup() -> Option<Hangup> {
    match Hangup::new() {
        Ok(hangup) => Some(hangup),
        Err(e) => {
            tracing::warn!(error = %e, "SIGHUP handler unavailable");
            None
        }
    }
}

async fn recv_hangup(hangup: &mut Option<Hangup>) {
    match hangup {
        Some(hangup) => hangup.recv().await,
        None => std::future::pending().await,
    }
}
