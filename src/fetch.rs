//! Network fetch collaborator for embedded asset resolution
//!
//! The resolver depends on the [`Fetcher`] trait rather than a concrete
//! HTTP client so tests can serve assets from memory. [`HttpFetcher`] is
//! the production implementation.

use std::future::Future;

use crate::error::PipelineError;

/// Retrieves raw bytes for a URL.
///
/// A non-success response is an error: the pipeline never retries and
/// never caches across calls.
pub trait Fetcher: Send + Sync {
    /// Fetch the bytes at `url`, failing with [`PipelineError::Fetch`] if
    /// the transfer does not complete or returns a non-success status.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, PipelineError>> + Send;
}

/// HTTP(S) fetcher backed by a shared reqwest client.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, PipelineError> {
        let fetch_err = |reason: String| PipelineError::Fetch { url: url.to_string(), reason };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_err(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_err(format!("HTTP status {}", status)));
        }

        let bytes = response.bytes().await.map_err(|e| fetch_err(e.to_string()))?;
        log::debug!("fetched {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}
