//! Plain and TLS listeners.
//!
//! # Responsibilities
//! - Parse configured bind addresses (":80" means all interfaces)
//! - Bind, accept and serve the proxy app until told to stop
//! - Graceful shutdown with a deadline through an [`axum_server::Handle`]
//!
//! # Design Decisions
//! - Binding happens inside `serve`, so a bind failure is a listener failure
//!   that the supervisor escalates, same as an accept failure
//! - TLS material is read when the listener starts, never generated here

use axum::Router;
use axum_server::Handle;
use std::fmt;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::net::tls::TlsMaterial;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Address could not be parsed or resolved.
    #[error("invalid bind address {0:?}")]
    Address(String),
    /// Certificate or key file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    TlsFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Certificate or key is not usable PEM.
    #[error("invalid TLS material: {0}")]
    Tls(#[source] std::io::Error),
    /// Bind or accept failed.
    #[error("failed to serve: {0}")]
    Serve(#[source] std::io::Error),
}

/// Which listener this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    Http,
    Tls,
}

impl fmt::Display for ListenerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenerKind::Http => write!(f, "HTTP"),
            ListenerKind::Tls => write!(f, "TLS"),
        }
    }
}

/// Parse a bind address. A bare ":port" binds every interface.
pub fn parse_bind_address(address: &str) -> Result<SocketAddr, ListenerError> {
    let address = address.trim();
    let normalized = match address.strip_prefix(':') {
        Some(port) => format!("0.0.0.0:{}", port),
        None => address.to_string(),
    };

    if let Ok(addr) = normalized.parse::<SocketAddr>() {
        return Ok(addr);
    }

    normalized
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .ok_or_else(|| ListenerError::Address(address.to_string()))
}

/// A configured, not yet running listener.
pub struct Listener {
    kind: ListenerKind,
    address: SocketAddr,
    tls: Option<TlsMaterial>,
    handle: Handle,
}

impl Listener {
    /// Plain HTTP listener.
    pub fn http(address: &str) -> Result<Self, ListenerError> {
        Ok(Self {
            kind: ListenerKind::Http,
            address: parse_bind_address(address)?,
            tls: None,
            handle: Handle::new(),
        })
    }

    /// TLS listener using PEM certificate and key files.
    pub fn tls(address: &str, cert_path: &Path, key_path: &Path) -> Result<Self, ListenerError> {
        Ok(Self {
            kind: ListenerKind::Tls,
            address: parse_bind_address(address)?,
            tls: Some(TlsMaterial::new(cert_path, key_path)),
            handle: Handle::new(),
        })
    }

    pub fn kind(&self) -> ListenerKind {
        self.kind
    }

    /// Handle used to stop the listener or learn its bound address.
    pub fn handle(&self) -> Handle {
        self.handle.clone()
    }

    /// Bind and serve `app` until a graceful shutdown completes or an error occurs.
    pub async fn serve(self, app: Router) -> Result<(), ListenerError> {
        let service = app.into_make_service_with_connect_info::<SocketAddr>();

        match self.tls {
            None => {
                tracing::info!(address = %self.address, "serving HTTP on {}", self.address);
                axum_server::bind(self.address)
                    .handle(self.handle)
                    .serve(service)
                    .await
                    .map_err(ListenerError::Serve)
            }
            Some(material) => {
                let config = material.load().await?;
                tracing::info!(address = %self.address, "serving TLS on {}", self.address);
                axum_server::bind_rustls(self.address, config)
                    .handle(self.handle)
                    .serve(service)
                    .await
                    .map_err(ListenerError::Serve)
            }
        }
    }
}

/// Stop accepting on `handle` and give in-flight connections `grace` to finish.
pub fn begin_shutdown(handle: &Handle, grace: Duration) {
    handle.graceful_shutdown(Some(grace));
}
