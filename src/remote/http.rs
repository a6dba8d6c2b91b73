//! Blob retrieval over HTTP
//!
//! Blob servers address content by hash: `GET <origin>/<sha256>` returns the
//! bytes or a non-success status.

use super::BlobClient;
use crate::error::DriveError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// reqwest-backed [`BlobClient`]
#[derive(Debug, Clone)]
pub struct HttpBlobClient {
    client: reqwest::Client,
}

impl Default for HttpBlobClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpBlobClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self { client }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// URL of a blob on one server
    pub fn blob_url(server: &str, sha256: &str) -> Result<Url, DriveError> {
        let base = Url::parse(server)?;
        Ok(base.join(&format!("/{}", sha256))?)
    }
}

#[async_trait]
impl BlobClient for HttpBlobClient {
    async fn get_blob(&self, server: &str, sha256: &str) -> Result<Vec<u8>, DriveError> {
        let url = Self::blob_url(server, sha256)?;
        debug!(url = %url, "Fetching blob");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| DriveError::Blob(e.to_string()))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| DriveError::Blob(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_url_uses_origin() {
        let url = HttpBlobClient::blob_url("https://cdn.example.com/ignored/", "abc").unwrap();
        assert_eq!(url.as_str(), "https://cdn.example.com/abc");
    }

    #[test]
    fn test_blob_url_rejects_garbage() {
        assert!(matches!(
            HttpBlobClient::blob_url("nope", "abc"),
            Err(DriveError::InvalidUrl(_))
        ));
    }
}
