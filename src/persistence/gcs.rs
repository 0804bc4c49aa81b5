//! Google Cloud Storage backend using the JSON API.
//!
//! The dataset lives in a single object. Reads download it with
//! `alt=media`, writes replace it with a simple media upload. Requests
//! are authenticated with a bearer token that is either configured
//! statically or requested from the instance metadata server on every
//! call.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;

use super::{StorageBackend, StoreError};
use crate::config::GcsConfig;
use crate::domain::Dataset;

/// Token payload returned by the metadata server.
#[derive(Debug, Deserialize)]
struct MetadataToken {
    access_token: String,
}

/// Object-store backend for one bucket/object pair.
#[derive(Debug, Clone)]
pub struct GcsBackend {
    client: Client,
    config: GcsConfig,
}

impl GcsBackend {
    /// Creates a backend with a default HTTP client.
    #[must_use]
    pub fn new(config: GcsConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Creates a backend using the given HTTP client.
    #[must_use]
    pub fn with_client(client: Client, config: GcsConfig) -> Self {
        Self { client, config }
    }

    /// Builds `{endpoint}/{prefix...}/b/{bucket}/o[/{object}]`, percent-encoding
    /// each segment.
    fn url(&self, prefix: &[&str], object: Option<&str>) -> Result<Url, StoreError> {
        let endpoint = &self.config.endpoint;
        let mut url =
            Url::parse(endpoint).map_err(|e| StoreError::InvalidEndpoint(format!("{endpoint}: {e}")))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| StoreError::InvalidEndpoint(endpoint.clone()))?;
            segments
                .pop_if_empty()
                .extend(prefix)
                .extend(["b", self.config.bucket.as_str(), "o"]);
            if let Some(object) = object {
                segments.push(object);
            }
        }
        Ok(url)
    }

    async fn access_token(&self) -> Result<String, StoreError> {
        if let Some(token) = &self.config.access_token {
            return Ok(token.clone());
        }
        let token: MetadataToken = self
            .client
            .get(&self.config.metadata_url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl StorageBackend for GcsBackend {
    fn name(&self) -> &'static str {
        "gcs"
    }

    async fn read(&self) -> Result<Option<Dataset>, StoreError> {
        let url = self.url(&["storage", "v1"], Some(self.config.object.as_str()))?;
        let token = self.access_token().await?;
        let response = self
            .client
            .get(url)
            .query(&[("alt", "media")])
            .bearer_auth(token)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let bytes = response.bytes().await?;
                Ok(Some(serde_json::from_slice(&bytes)?))
            }
            _ => Err(unexpected_status(response).await),
        }
    }

    async fn write(&self, dataset: &Dataset) -> Result<(), StoreError> {
        let url = self.url(&["upload", "storage", "v1"], None)?;
        let token = self.access_token().await?;
        let body = serde_json::to_vec_pretty(dataset)?;
        let response = self
            .client
            .post(url)
            .query(&[("uploadType", "media"), ("name", self.config.object.as_str())])
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(unexpected_status(response).await);
        }
        tracing::debug!(
            bucket = %self.config.bucket,
            object = %self.config.object,
            "dataset uploaded"
        );
        Ok(())
    }
}

async fn unexpected_status(response: Response) -> StoreError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    StoreError::Status { status, body }
}
