//! Reverse-proxy transport to a local port.
//!
//! # Responsibilities
//! - Rewrite the request URI to `http://127.0.0.1:<port>` keeping path and query
//! - Strip hop-by-hop headers, add X-Forwarded-For
//! - Relay the upstream response unmodified apart from hop-by-hop headers
//!
//! # Design Decisions
//! - Original Host header is preserved (the client only fills it when absent)
//! - No retries: a failed upstream call is a 502 Bad Gateway
//! - A port outside `0..=65535` is accepted at load time and fails each
//!   request with a 502, like any other unreachable upstream

use axum::{
    body::Body,
    http::{header, uri::PathAndQuery, HeaderValue, Request, StatusCode, Uri, Version},
    response::{IntoResponse, Response},
};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use crate::observability::metrics;
use crate::security::headers;

/// Forwards requests to one port on the loopback interface.
#[derive(Debug, Clone)]
pub struct ProxyTarget {
    port: i64,
    upstream: Option<SocketAddr>,
    client: Client<HttpConnector, Body>,
}

impl ProxyTarget {
    pub fn new(port: i64) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        let upstream = u16::try_from(port)
            .ok()
            .map(|port| SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, port)));
        Self {
            port,
            upstream,
            client,
        }
    }

    /// The loopback address requests are forwarded to, if the port is valid.
    pub fn upstream(&self) -> Option<SocketAddr> {
        self.upstream
    }

    /// Forward the request and relay the response.
    pub async fn forward(&self, peer: SocketAddr, request: Request<Body>) -> Response {
        let Some(upstream) = self.upstream else {
            tracing::warn!(port = self.port, "Port out of range, cannot forward");
            metrics::record_upstream_error();
            return bad_gateway();
        };
        let (mut parts, body) = request.into_parts();

        // HTTP/2 clients send :authority instead of Host
        if !parts.headers.contains_key(header::HOST) {
            if let Some(value) = parts
                .uri
                .authority()
                .and_then(|a| HeaderValue::from_str(a.as_str()).ok())
            {
                parts.headers.insert(header::HOST, value);
            }
        }

        parts.uri = match upstream_uri(upstream, &parts.uri) {
            Ok(uri) => uri,
            Err(e) => {
                tracing::error!(%upstream, error = %e, "Failed to build upstream URI");
                return bad_gateway();
            }
        };
        parts.version = Version::HTTP_11;
        headers::strip_hop_by_hop(&mut parts.headers);
        headers::append_forwarded_for(&mut parts.headers, peer.ip());

        match self.client.request(Request::from_parts(parts, body)).await {
            Ok(response) => relay(response),
            Err(e) => {
                tracing::warn!(%upstream, error = %e, "Upstream error");
                metrics::record_upstream_error();
                bad_gateway()
            }
        }
    }
}

/// Build the upstream URI for an inbound request URI.
pub fn upstream_uri(upstream: SocketAddr, original: &Uri) -> Result<Uri, axum::http::Error> {
    let path_and_query = original
        .path_and_query()
        .cloned()
        .unwrap_or_else(|| PathAndQuery::from_static("/"));

    Uri::builder()
        .scheme("http")
        .authority(upstream.to_string())
        .path_and_query(path_and_query)
        .build()
}

fn bad_gateway() -> Response {
    (StatusCode::BAD_GATEWAY, "Bad Gateway").into_response()
}

fn relay(response: hyper::Response<Incoming>) -> Response {
    let (mut parts, body) = response.into_parts();
    headers::strip_hop_by_hop(&mut parts.headers);
    Response::from_parts(parts, Body::new(body))
}
