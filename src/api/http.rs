//! REST transport for the board backend.
//!
//! ```text
//! GET  {base}/posts                      → ApiResponse<Vec<Post>>
//! POST {base}/posts                      → ApiResponse<Post>
//! POST {base}/posts/{parent_id}/replies  → ApiResponse<Post>
//! ```

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Url;
use serde::de::DeserializeOwned;

use super::transport::{PostTransport, TransportError};
use super::types::ApiResponse;
use crate::core::post::{Post, PostCreate, PostId};

pub struct HttpTransport {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self, TransportError> {
        let base_url = Url::parse(base_url.as_ref())
            .map_err(|e| TransportError::Network(format!("invalid base URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(TransportError::Network(format!(
                "invalid base URL: {base_url}"
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        info!("HTTP transport targeting {}", base_url);
        Ok(Self { base_url, client })
    }

    /// Appends path segments to the base URL. Each segment is percent-encoded,
    /// so ids containing `/`, `?` or `#` stay inside their segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| TransportError::Network(format!("invalid base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Reads the envelope from a response. Non-2xx answers are rejections,
    /// using the envelope's `error` when the body has one.
    async fn read_envelope<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, TransportError> {
        let status = response.status();
        debug!("Board API response status: {}", status);

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiResponse<serde_json::Value>>(&body)
                .ok()
                .and_then(|envelope| envelope.error);
            warn!("Board API error: {} - {:?}", status.as_u16(), message);
            return Err(TransportError::Rejected(message));
        }

        serde_json::from_str::<ApiResponse<T>>(&body)
            .map_err(|e| TransportError::Parse(e.to_string()))?
            .into_result()
    }
}

#[async_trait]
impl PostTransport for HttpTransport {
    async fn get_posts(&self) -> Result<Vec<Post>, TransportError> {
        let response = self
            .client
            .get(self.endpoint(&["posts"])?)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let posts: Vec<Post> = Self::read_envelope(response).await?;
        info!("Fetched {} posts", posts.len());
        Ok(posts)
    }

    async fn create_post(&self, payload: &PostCreate) -> Result<Post, TransportError> {
        debug!("Creating post ({} bytes)", payload.content.len());
        let response = self
            .client
            .post(self.endpoint(&["posts"])?)
            .json(payload)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Self::read_envelope(response).await
    }

    async fn create_reply(
        &self,
        parent_id: &PostId,
        payload: &PostCreate,
    ) -> Result<Post, TransportError> {
        debug!(
            "Creating reply under {} ({} bytes)",
            parent_id,
            payload.content.len()
        );
        let response = self
            .client
            .post(self.endpoint(&["posts", parent_id.as_str(), "replies"])?)
            .json(payload)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Self::read_envelope(response).await
    }
}
