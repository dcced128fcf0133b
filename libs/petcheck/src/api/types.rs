use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::classifier::SkinClassifier;
use crate::verifier::DocumentVerifier;

/// Uploads are capped at 10MB unless configured otherwise.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    pub fn new(host: Option<String>, port: u16, max_upload_bytes: Option<usize>) -> Self {
        Self {
            host: host.unwrap_or_else(Self::get_default_host),
            port,
            max_upload_bytes: max_upload_bytes.unwrap_or(Self::get_default_max_upload_bytes()),
        }
    }

    pub fn get_default_host() -> String {
        "0.0.0.0".to_string()
    }

    pub fn get_default_max_upload_bytes() -> usize {
        DEFAULT_MAX_UPLOAD_BYTES
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid bind address {}:{}: {}", self.host, self.port, e))
    }
}

#[derive(Clone)]
pub struct VerifierState {
    pub verifier: Arc<DocumentVerifier>,
}

impl VerifierState {
    pub fn new(verifier: DocumentVerifier) -> Self {
        Self {
            verifier: Arc::new(verifier),
        }
    }
}

#[derive(Clone)]
pub struct ClassifierState {
    pub classifier: SkinClassifier,
}

impl ClassifierState {
    pub fn new(classifier: SkinClassifier) -> Self {
        Self { classifier }
    }
}
