//! HTTP app assembly.
//!
//! # Responsibilities
//! - Create the Axum Router every listener serves
//! - Wire up middleware (trace, Strict-Transport-Security)
//! - Route every path and method to the dispatcher

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, Request},
    response::Response,
    Router,
};
use std::net::SocketAddr;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::http::dispatch::Dispatcher;
use crate::routing::SharedRouteTable;
use crate::security::headers::hsts_value;

/// Build the app served by the listeners.
///
/// Every response carries the HSTS advisory, whatever the route outcome.
pub fn app(routes: SharedRouteTable) -> Router {
    Router::new()
        .fallback(dispatch_handler)
        .with_state(Dispatcher::new(routes))
        .layer(SetResponseHeaderLayer::overriding(
            header::STRICT_TRANSPORT_SECURITY,
            hsts_value(),
        ))
        .layer(TraceLayer::new_for_http())
}

async fn dispatch_handler(
    State(dispatcher): State<Dispatcher>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    dispatcher.dispatch(peer, request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::routes::parse_routes;
    use crate::routing::RouteTable;
    use crate::security::headers::STRICT_TRANSPORT_SECURITY;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    fn request(host: &str) -> Request<Body> {
        let mut request = Request::builder()
            .method("POST")
            .uri("/deep/path?q=1")
            .header(header::HOST, host)
            .body(Body::empty())
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo("127.0.0.1:40000".parse::<SocketAddr>().unwrap()));
        request
    }

    #[tokio::test]
    async fn miss_carries_hsts() {
        let app = app(RouteTable::shared(parse_routes("a.com: 9000").unwrap()));
        let response = app.oneshot(request("unknown.example")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()[header::STRICT_TRANSPORT_SECURITY],
            STRICT_TRANSPORT_SECURITY
        );
    }

    #[tokio::test]
    async fn hit_carries_hsts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "ok").unwrap();
        let config = format!("a.com: {}", dir.path().display());
        let app = app(RouteTable::shared(parse_routes(&config).unwrap()));

        let mut req = request("a.com");
        *req.method_mut() = axum::http::Method::GET;
        *req.uri_mut() = "/index.html".parse().unwrap();
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(header::STRICT_TRANSPORT_SECURITY));
    }
}
