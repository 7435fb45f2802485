//! reqwest-backed implementation of [`DashboardApi`]

use super::DashboardApi;
use crate::config::DashConfig;
use crate::error::{DashError, Result};
use crate::stream::{self, EventStream, ReconnectSettings};
use crate::types::{MemoryPage, MemoryQuery, MemoryUpdate};
use async_trait::async_trait;
use reqwest::{header, Client, Response, Url};
use tracing::{debug, warn};

/// HTTP client for the bot's dashboard API
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: Url,
    reconnect: ReconnectSettings,
}

impl HttpApi {
    /// Create a client rooted at `base_url` (e.g. `http://localhost:8080`)
    pub fn new(base_url: &str, client: Client, reconnect: ReconnectSettings) -> Result<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| DashError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(DashError::InvalidUrl(base_url.to_string()));
        }

        Ok(Self {
            client,
            base_url,
            reconnect,
        })
    }

    /// Build a client from dashboard configuration
    pub fn from_config(config: &DashConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        let reconnect = ReconnectSettings {
            delay: config.reconnect_delay(),
            max_delay: config.reconnect_max_delay(),
        };
        Self::new(&config.api_url, client, reconnect)
    }

    /// Base URL plus the given path segments, each percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DashError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn memory_url(&self, id: &str, server_id: &str) -> Result<Url> {
        let mut url = self.endpoint(&["api", "memories", id])?;
        url.query_pairs_mut().append_pair("server_id", server_id);
        Ok(url)
    }

    /// Pass through 2xx responses; turn anything else into `DashError::Server`
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Could not read error body for {}: {}", status, e);
                String::new()
            }
        };
        warn!("Request failed with {}: {}", status, body.trim());
        Err(DashError::Server {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl DashboardApi for HttpApi {
    async fn get_config(&self) -> Result<String> {
        let url = self.endpoint(&["api", "config"])?;
        debug!("GET {}", url);

        let response = Self::check(self.client.get(url).send().await?).await?;
        Ok(response.text().await?)
    }

    async fn save_config(&self, body: String) -> Result<()> {
        let url = self.endpoint(&["api", "config"])?;
        debug!("POST {} ({} bytes)", url, body.len());

        let response = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, "text/plain")
            .body(body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn list_memories(&self, query: &MemoryQuery) -> Result<MemoryPage> {
        let url = self.endpoint(&["api", "memories"])?;
        debug!("GET {} server_id={}", url, query.server_id);

        let response = Self::check(self.client.get(url).query(query).send().await?).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn delete_memory(&self, id: &str, server_id: &str) -> Result<()> {
        let url = self.memory_url(id, server_id)?;
        debug!("DELETE {}", url);

        Self::check(self.client.delete(url).send().await?).await?;
        Ok(())
    }

    async fn update_memory(&self, id: &str, server_id: &str, content: String) -> Result<()> {
        let url = self.memory_url(id, server_id)?;
        debug!("PATCH {}", url);

        let response = self
            .client
            .patch(url)
            .json(&MemoryUpdate { content })
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    fn open_events(&self) -> Result<EventStream> {
        let url = self.endpoint(&["api", "events"])?;
        stream::subscribe(url.as_str(), self.reconnect)
    }
}
