//! One-shot presence fetch over the REST endpoint

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use super::protocol::ApiEnvelope;
use super::types::PresenceSnapshot;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Http(String),

    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

/// Source of the initial snapshot. `Ok(None)` means the API answered without data.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch(&self, user_id: &str) -> Result<Option<PresenceSnapshot>, FetchError>;
}

/// `GET <base_url>/<user_id>` → `{ success, data }`
#[derive(Debug, Clone)]
pub struct HttpSnapshotSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSnapshotSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { client: reqwest::Client::new(), base_url: base_url.into() }
    }

    pub fn url_for(&self, user_id: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), user_id)
    }
}

#[async_trait]
impl SnapshotSource for HttpSnapshotSource {
    async fn fetch(&self, user_id: &str) -> Result<Option<PresenceSnapshot>, FetchError> {
        let url = self.url_for(user_id);
        tracing::debug!("Fetching presence: {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| FetchError::Http(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let envelope: ApiEnvelope = response.json().await.map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(envelope.into_snapshot())
    }
}

/// Fetch bounded by `timeout`; the in-flight request is dropped when it elapses.
pub async fn fetch_with_timeout(
    source: &dyn SnapshotSource,
    user_id: &str,
    timeout: Duration,
) -> Result<Option<PresenceSnapshot>, FetchError> {
    match tokio::time::timeout(timeout, source.fetch(user_id)).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout(timeout)),
    }
}
