//! Per-request dispatch.
//!
//! # Responsibilities
//! - Read the current routing table (one atomic load)
//! - Exact hostname lookup
//! - Log `<peer> <host> -> <destination>` and hand off to the backend
//! - Answer unknown hosts with 404 without touching any backend
//!
//! # Design Decisions
//! - No retries, no fallback or wildcard matching
//! - The request is handed to the backend unmodified

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::backend::Backend;
use crate::observability::metrics;
use crate::routing::SharedRouteTable;

/// Result of looking up a request's host.
#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    Routed(Arc<Backend>),
    NotConfigured,
}

/// Host-based request dispatcher shared by every listener.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    routes: SharedRouteTable,
}

impl Dispatcher {
    pub fn new(routes: SharedRouteTable) -> Self {
        Self { routes }
    }

    /// Look up `host` in the current routing table.
    pub fn resolve(&self, host: &str) -> DispatchOutcome {
        match self.routes.lookup(host) {
            Some(backend) => DispatchOutcome::Routed(backend),
            None => DispatchOutcome::NotConfigured,
        }
    }

    /// Route one request from `peer`.
    pub async fn dispatch(&self, peer: SocketAddr, request: Request<Body>) -> Response {
        let host = request_host(&request).unwrap_or_default().to_string();

        let outcome = if host.is_empty() {
            DispatchOutcome::NotConfigured
        } else {
            self.resolve(&host)
        };

        match outcome {
            DispatchOutcome::Routed(backend) => {
                tracing::info!("{} {} -> {}", peer, host, backend.destination());
                metrics::record_dispatch(true);
                backend.handle(peer, request).await
            }
            DispatchOutcome::NotConfigured => {
                tracing::info!("{} {} -> not configured", peer, host);
                metrics::record_dispatch(false);
                (StatusCode::NOT_FOUND, "404 page not found\n").into_response()
            }
        }
    }
}

/// The host a request targets: URI authority first (HTTP/2, absolute-form),
/// then the Host header. Compared verbatim, port included.
pub fn request_host(request: &Request<Body>) -> Option<&str> {
    request
        .uri()
        .authority()
        .map(|authority| authority.as_str())
        .or_else(|| {
            request
                .headers()
                .get(header::HOST)
                .and_then(|value| value.to_str().ok())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::routes::parse_routes;
    use crate::routing::{RouteTable, RoutingTable};

    fn peer() -> SocketAddr {
        "192.0.2.10:40000".parse().unwrap()
    }

    fn request(host: &str, path: &str) -> Request<Body> {
        Request::builder()
            .uri(path)
            .header(header::HOST, host)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn host_header_is_used_verbatim() {
        assert_eq!(request_host(&request("a.com:8080", "/")), Some("a.com:8080"));
    }

    #[test]
    fn authority_wins_over_host_header() {
        let req = Request::builder()
            .uri("http://b.com/x")
            .header(header::HOST, "a.com")
            .body(Body::empty())
            .unwrap();
        assert_eq!(request_host(&req), Some("b.com"));
    }

    #[test]
    fn resolve_hit_and_miss() {
        let dispatcher = Dispatcher::new(RouteTable::shared(parse_routes("a.com: 9000").unwrap()));

        match dispatcher.resolve("a.com") {
            DispatchOutcome::Routed(backend) => assert_eq!(backend.destination(), "9000"),
            DispatchOutcome::NotConfigured => panic!("a.com should be routed"),
        }
        assert!(matches!(dispatcher.resolve("www.a.com"), DispatchOutcome::NotConfigured));
        assert!(matches!(dispatcher.resolve("A.COM"), DispatchOutcome::NotConfigured));
    }

    #[tokio::test]
    async fn unknown_host_is_not_found() {
        let dispatcher = Dispatcher::new(RouteTable::shared(parse_routes("a.com: 9000").unwrap()));
        let response = dispatcher.dispatch(peer(), request("unknown.example", "/")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn missing_host_is_not_found() {
        let dispatcher = Dispatcher::new(RouteTable::shared(RoutingTable::new()));
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = dispatcher.dispatch(peer(), req).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn directory_route_serves_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "site b").unwrap();
        let config = format!("a.com, b.com: {}", dir.path().display());
        let dispatcher = Dispatcher::new(RouteTable::shared(parse_routes(&config).unwrap()));

        let found = dispatcher.dispatch(peer(), request("b.com", "/index.html")).await;
        assert_eq!(found.status(), StatusCode::OK);
        let body = axum::body::to_bytes(found.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"site b");

        let missing = dispatcher.dispatch(peer(), request("b.com", "/nope.html")).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
