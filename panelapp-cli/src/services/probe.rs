//! Connectivity probe: OpenAPI document plus the first panel list page

use anyhow::{Context, Result};
use serde_json::Value;

use crate::api::{JsonFetcher, PageInfo, json_value_to_string, version};
use crate::config::ApiConfig;

/// What the probe learned about the API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub api_version: String,
    pub total_panels: u64,
    pub first_page_count: usize,
    pub has_next: bool,
    /// Id and name of the first panel, if any
    pub first_panel: Option<(String, String)>,
}

/// Fetch the OpenAPI document and first panel page
pub async fn probe<F>(fetcher: &F, api: &ApiConfig) -> Result<ProbeReport>
where
    F: JsonFetcher + ?Sized,
{
    let openapi = fetcher
        .fetch_json(&api.openapi_url)
        .await
        .context("OpenAPI endpoint test failed")?;
    let api_version = version::api_version_from_openapi(&openapi)
        .unwrap_or_else(|| "unknown".to_string());

    let page = fetcher
        .fetch_json(&api.panels_url())
        .await
        .context("Panels endpoint test failed")?;

    Ok(summarize(api_version, &page))
}

fn summarize(api_version: String, page: &Value) -> ProbeReport {
    let info = PageInfo::from_json(page);
    let first_panel = page
        .get("results")
        .and_then(Value::as_array)
        .and_then(|results| results.first())
        .map(|panel| {
            (
                panel.get("id").map(json_value_to_string).unwrap_or_default(),
                panel.get("name").map(json_value_to_string).unwrap_or_default(),
            )
        });

    ProbeReport {
        api_version,
        total_panels: info.count,
        first_page_count: info.result_count,
        has_next: info.next.is_some(),
        first_panel,
    }
}
