//! Certificate and key for the TLS listener.

use axum_server::tls_rustls::RustlsConfig;
use std::path::{Path, PathBuf};

use crate::net::listener::ListenerError;

/// PEM certificate chain and private key, by path.
#[derive(Debug, Clone)]
pub struct TlsMaterial {
    cert_path: PathBuf,
    key_path: PathBuf,
}

impl TlsMaterial {
    pub fn new(cert_path: &Path, key_path: &Path) -> Self {
        Self {
            cert_path: cert_path.to_path_buf(),
            key_path: key_path.to_path_buf(),
        }
    }

    /// Read both files and build the rustls server config.
    pub async fn load(&self) -> Result<RustlsConfig, ListenerError> {
        let cert = read_pem(&self.cert_path).await?;
        let key = read_pem(&self.key_path).await?;
        RustlsConfig::from_pem(cert, key)
            .await
            .map_err(ListenerError::Tls)
    }
}

async fn read_pem(path: &Path) -> Result<Vec<u8>, ListenerError> {
    tokio::fs::read(path)
        .await
        .map_err(|source| ListenerError::TlsFile {
            path: path.to_path_buf(),
            source,
        })
}
