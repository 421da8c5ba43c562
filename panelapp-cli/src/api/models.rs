//! PanelApp API response models

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Pagination fields of a list response
///
/// Pages are persisted as raw JSON, so only the fields needed to walk the
/// list are extracted here.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageInfo {
    /// Total number of results across all pages
    pub count: u64,
    /// URL of the next page, if any
    pub next: Option<String>,
    /// Number of results on this page
    pub result_count: usize,
}

impl PageInfo {
    /// Read pagination fields from a response body
    ///
    /// `next` may be missing, JSON null, empty, or the string "null" on the
    /// last page; all of these mean there is no next page.
    pub fn from_json(page: &Value) -> Self {
        Self {
            count: page.get("count").and_then(Value::as_u64).unwrap_or(0),
            next: page
                .get("next")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|url| !url.is_empty() && *url != "null")
                .map(str::to_string),
            result_count: page
                .get("results")
                .and_then(Value::as_array)
                .map_or(0, Vec::len),
        }
    }
}

/// Panel as returned in the panel list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub id: Value,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<Value>,
    #[serde(default)]
    pub version_created: Option<String>,
    #[serde(default)]
    pub stats: PanelStats,
}

/// Entity counts for a panel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelStats {
    #[serde(default)]
    pub number_of_genes: u64,
    #[serde(default)]
    pub number_of_strs: u64,
    #[serde(default)]
    pub number_of_regions: u64,
}

impl Panel {
    /// Panel id as text (the API returns integers)
    pub fn id_string(&self) -> String {
        json_value_to_string(&self.id)
    }

    /// Panel version as text, empty if missing
    pub fn version_string(&self) -> String {
        self.version
            .as_ref()
            .map(json_value_to_string)
            .unwrap_or_default()
    }
}

/// Results array of a page, parsed as panels
///
/// Entries that do not look like panels are skipped.
pub fn panels_from_page(page: &Value) -> Vec<Panel> {
    page.get("results")
        .and_then(Value::as_array)
        .map(|results| {
            results
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// Convert a scalar JSON value to plain text
pub fn json_value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
