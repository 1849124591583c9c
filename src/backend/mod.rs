//! Backend targets.
//!
//! # Responsibilities
//! - Represent a resolved destination from the routing file
//! - Carry the destination label used in access logs
//! - Handle a request: forward to a local port or serve from a directory
//!
//! # Design Decisions
//! - Closed set of variants, so an enum rather than a trait object
//! - Built once per routing-file line and shared (via `Arc`) by every
//!   hostname on that line

pub mod proxy;
pub mod static_files;

use axum::{body::Body, http::Request, response::Response};
use std::net::SocketAddr;
use std::path::PathBuf;

pub use proxy::ProxyTarget;
pub use static_files::DirectoryTarget;

/// How a backend handles requests.
#[derive(Debug, Clone)]
pub enum BackendKind {
    /// Reverse proxy to `127.0.0.1:<port>`.
    Proxy(ProxyTarget),
    /// Static files from a directory.
    Directory(DirectoryTarget),
}

/// A destination plus the label it was configured with.
#[derive(Debug, Clone)]
pub struct Backend {
    destination: String,
    kind: BackendKind,
}

impl Backend {
    /// Proxy backend; the label is the port as written in the routing file.
    pub fn proxy(destination: impl Into<String>, port: i64) -> Self {
        Self {
            destination: destination.into(),
            kind: BackendKind::Proxy(ProxyTarget::new(port)),
        }
    }

    /// Directory backend; the label is the path as written in the routing file.
    pub fn directory(destination: impl Into<String>) -> Self {
        let destination = destination.into();
        Self {
            kind: BackendKind::Directory(DirectoryTarget::new(PathBuf::from(&destination))),
            destination,
        }
    }

    /// Label shown in access logs.
    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn kind(&self) -> &BackendKind {
        &self.kind
    }

    /// Handle one request.
    pub async fn handle(&self, peer: SocketAddr, request: Request<Body>) -> Response {
        match &self.kind {
            BackendKind::Proxy(target) => target.forward(peer, request).await,
            BackendKind::Directory(target) => target.serve(request).await,
        }
    }
}
