//! Static file transport rooted at a directory.

use axum::{
    body::Body,
    http::Request,
    response::Response,
};
use std::path::{Path, PathBuf};
use tower::ServiceExt;
use tower_http::services::ServeDir;

/// Serves files below `root`; `index.html` answers directory requests.
#[derive(Debug, Clone)]
pub struct DirectoryTarget {
    root: PathBuf,
    service: ServeDir,
}

impl DirectoryTarget {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            service: ServeDir::new(&root),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn serve(&self, request: Request<Body>) -> Response {
        match self.service.clone().oneshot(request).await {
            Ok(response) => response.map(Body::new),
            Err(never) => match never {},
        }
    }
}
