//! Reading retrieval from the station endpoint.
//!
//! `fetch` never fails: transport errors, non-success statuses and malformed
//! bodies are logged and come back as an empty batch. `try_fetch` keeps the
//! failure kind for callers that report it.

use ambiente_shared::{FetchError, HealthSummary, Reading};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Local;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;
use crate::surface::SharedSurface;

#[async_trait]
pub trait DataFetcher: Send + Sync {
    async fn try_fetch(&self) -> Result<Vec<Reading>, FetchError>;

    /// Fail-soft fetch: any failure is an empty batch
    async fn fetch(&self) -> Vec<Reading> {
        match self.try_fetch().await {
            Ok(readings) => readings,
            Err(e) => {
                warn!(kind = e.kind(), "Fetch failed, treating as no data: {}", e);
                Vec::new()
            }
        }
    }
}

/// Fetches readings over HTTP with a single GET
pub struct HttpFetcher {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpFetcher {
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.endpoint(), config.request_timeout())
    }
}

#[async_trait]
impl DataFetcher for HttpFetcher {
    async fn try_fetch(&self) -> Result<Vec<Reading>, FetchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let readings: Vec<Reading> = serde_json::from_slice(&body)?;

        debug!(endpoint = %self.endpoint, count = readings.len(), "Fetched readings");
        Ok(readings)
    }
}

/// Records the time and health summary of every successful fetch on a surface
pub struct RecordingFetcher {
    inner: Arc<dyn DataFetcher>,
    surface: SharedSurface,
}

impl RecordingFetcher {
    pub fn new(inner: Arc<dyn DataFetcher>, surface: SharedSurface) -> Self {
        Self { inner, surface }
    }
}

#[async_trait]
impl DataFetcher for RecordingFetcher {
    async fn try_fetch(&self) -> Result<Vec<Reading>, FetchError> {
        let readings = self.inner.try_fetch().await?;
        let health = HealthSummary::from_readings(&readings);
        self.surface.lock().record_fetch(Local::now(), health);
        Ok(readings)
    }
}
