//! HTTP client for the dashboard backend REST API.
//!
//! This module provides [`DashboardClient`], the reqwest implementation of
//! [`DashboardApi`]. It lists and registers devices, reads the latest
//! temperature, statistics and bucketed history, and relays questions to
//! the analysis endpoint.
//!
//! # Example
//!
//! ```no_run
//! use tempdash_core::{DashboardApi, DashboardClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = DashboardClient::new("http://localhost:5001")?;
//!
//! for device in client.list_devices().await? {
//!     println!("{} ({})", device.name, device.id);
//! }
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use tempdash_types::{
    AskReply, AskResponse, Device, HistoryQuery, NewDevice, StatsSnapshot, TelemetrySeries,
};

use crate::api::DashboardApi;
use crate::error::{ClientError, Result};

/// Default timeout for ordinary requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for `/ask`, which waits on a language model.
pub const ASK_TIMEOUT: Duration = Duration::from_secs(120);

/// HTTP client for the dashboard backend.
#[derive(Debug, Clone)]
pub struct DashboardClient {
    client: Client,
    base_url: String,
}

// ==========================================================================
// DashboardClient Implementation
// ==========================================================================

impl DashboardClient {
    /// Create a new client with the default timeout.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the backend (e.g., "http://localhost:5001")
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Request)?;

        Self::with_client(base_url, client)
    }

    /// Create a client with a custom reqwest Client.
    pub fn with_client(base_url: &str, client: Client) -> Result<Self> {
        // Normalize URL (remove trailing slash)
        let base_url = base_url.trim_end_matches('/').to_string();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(format!(
                "URL must start with http:// or https://, got: {}",
                base_url
            )));
        }
        Url::parse(&base_url).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;

        Ok(Self { client, base_url })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an endpoint URL, percent-encoding each path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ======================================================================
    // Internal HTTP helpers
    // ======================================================================

    async fn send(&self, request: reqwest::RequestBuilder, url: &Url) -> Result<Response> {
        debug!(%url, "Backend request");
        request.send().await.map_err(|e| ClientError::NotReachable {
            url: url.to_string(),
            source: e,
        })
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.send(self.client.get(url.clone()), &url).await?;
        Self::handle_response(response).await
    }

    async fn post_json<B: Serialize>(&self, url: Url, body: &B) -> Result<Response> {
        let response = self
            .send(self.client.post(url.clone()).json(body), &url)
            .await?;
        Self::check_status(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T> {
        let response = Self::check_status(response).await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Turn a non-2xx response into [`ClientError::ApiError`], taking the
    /// message from an `{error}` body when there is one.
    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or_else(|| status.to_string());

        Err(ClientError::ApiError {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl DashboardApi for DashboardClient {
    async fn list_devices(&self) -> Result<Vec<Device>> {
        let url = self.endpoint(&["api", "devices"])?;
        self.get(url).await
    }

    async fn add_device(&self, name: &str) -> Result<()> {
        let url = self.endpoint(&["api", "device"])?;
        let body = NewDevice {
            name: name.to_string(),
        };
        self.post_json(url, &body).await?;
        Ok(())
    }

    async fn stats(&self, device_id: &str) -> Result<StatsSnapshot> {
        let url = self.endpoint(&["api", "device", device_id, "stats"])?;
        self.get(url).await
    }

    async fn latest(&self, device_id: &str) -> Result<TelemetrySeries> {
        let url = self.endpoint(&["api", "device", device_id, "latest"])?;
        self.get(url).await
    }

    async fn history(&self, device_id: &str, query: &HistoryQuery) -> Result<TelemetrySeries> {
        let mut url = self.endpoint(&["api", "device", device_id, "history"])?;
        url.query_pairs_mut()
            .extend_pairs(query.to_query_pairs().iter().map(|(k, v)| (*k, v.as_str())));
        self.get(url).await
    }

    async fn ask(&self, device_id: &str, question: &str) -> Result<AskReply> {
        let mut url = self.endpoint(&["ask"])?;
        url.query_pairs_mut()
            .append_pair("deviceId", device_id)
            .append_pair("q", question);

        let request = self.client.get(url.clone()).timeout(ASK_TIMEOUT);
        let response = self.send(request, &url).await?;
        let body: AskResponse = response.json().await.map_err(ClientError::Request)?;
        Ok(body.into())
    }
}
