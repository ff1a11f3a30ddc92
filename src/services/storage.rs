use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to blob storage
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),
}

/// Blob storage client.
///
/// Used only for profile pictures; listing photo upload is disabled in the
/// current build. Two operations: push bytes to a path, and derive the
/// public URL for a path.
pub struct StorageClient {
    endpoint: String,
    api_key: String,
    bucket: String,
    client: Client,
}

impl StorageClient {
    pub fn new(endpoint: String, api_key: String, bucket: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { endpoint, api_key, bucket, client }
    }

    /// Upload raw bytes to a path inside the bucket.
    pub async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let url = format!(
            "{}/buckets/{}/objects/{}",
            self.endpoint.trim_end_matches('/'),
            self.bucket,
            urlencoding::encode(path)
        );

        let response = self
            .client
            .put(&url)
            .header("X-Store-Key", &self.api_key)
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StorageError::ApiError(format!(
                "Failed to upload {}: {}",
                path,
                response.status()
            )));
        }

        tracing::debug!("Uploaded blob to {}", path);

        Ok(())
    }

    /// Public URL for a stored path. Derived locally; no network call.
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/buckets/{}/objects/{}/view",
            self.endpoint.trim_end_matches('/'),
            self.bucket,
            urlencoding::encode(path)
        )
    }
}
