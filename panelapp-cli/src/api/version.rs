//! API version check against the published OpenAPI document

use anyhow::{Context, Result};
use serde_json::Value;

use super::pagination::JsonFetcher;
use crate::config::ApiConfig;

/// Outcome of comparing the live API version with the expected one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiVersionCheck {
    Matches { version: String },
    Mismatch { expected: String, found: String },
}

impl ApiVersionCheck {
    /// Version reported by the API
    pub fn found(&self) -> &str {
        match self {
            ApiVersionCheck::Matches { version } => version,
            ApiVersionCheck::Mismatch { found, .. } => found,
        }
    }
}

/// Read `info.version` from an OpenAPI document
pub fn api_version_from_openapi(openapi: &Value) -> Option<String> {
    openapi
        .get("info")
        .and_then(|info| info.get("version"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Compare the document's version with `expected`
///
/// A document without a version is an error; a different version is not.
pub fn compare_api_version(openapi: &Value, expected: &str) -> Result<ApiVersionCheck> {
    let found = api_version_from_openapi(openapi)
        .context("Could not determine API version from OpenAPI document")?;

    if found == expected {
        Ok(ApiVersionCheck::Matches { version: found })
    } else {
        Ok(ApiVersionCheck::Mismatch {
            expected: expected.to_string(),
            found,
        })
    }
}

/// Fetch the OpenAPI document and compare versions
pub async fn check_api_version<F>(fetcher: &F, api: &ApiConfig) -> Result<ApiVersionCheck>
where
    F: JsonFetcher + ?Sized,
{
    let openapi = fetcher
        .fetch_json(&api.openapi_url)
        .await
        .context("Failed to fetch OpenAPI documentation")?;
    compare_api_version(&openapi, &api.expected_api_version)
}
