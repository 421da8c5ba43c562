//! HTTP client for the PanelApp API

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use std::time::Duration;

use super::pagination::JsonFetcher;
use crate::config::ApiConfig;

/// Thin reqwest wrapper that fetches JSON documents
#[derive(Debug, Clone)]
pub struct PanelAppClient {
    http: reqwest::Client,
    api: ApiConfig,
}

impl PanelAppClient {
    /// Client using the configured request timeout
    pub fn new(api: ApiConfig) -> Result<Self> {
        let timeout = api.timeout();
        Self::with_timeout(api, timeout)
    }

    /// Client with an explicit timeout (the connectivity probe uses a shorter one)
    pub fn with_timeout(api: ApiConfig, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("panelapp-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http, api })
    }

    pub fn api(&self) -> &ApiConfig {
        &self.api
    }
}

#[async_trait]
impl JsonFetcher for PanelAppClient {
    async fn fetch_json(&self, url: &str) -> Result<Value> {
        let start = std::time::Instant::now();

        let response = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .with_context(|| format!("Request failed: {}", url))?
            .error_for_status()
            .with_context(|| format!("HTTP error from {}", url))?;

        let body = response
            .json::<Value>()
            .await
            .with_context(|| format!("Invalid JSON received from {}", url))?;

        debug!(
            "Fetched {} in {:.2}ms",
            url,
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(body)
    }
}
