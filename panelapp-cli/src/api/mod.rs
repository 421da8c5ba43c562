//! PanelApp Australia Web API module
//!
//! HTTP access, paginated downloads that persist every page as JSON, and the
//! API version check.

pub mod client;
pub mod models;
pub mod pagination;
pub mod version;

pub use client::PanelAppClient;
pub use models::{PageInfo, Panel, PanelStats, json_value_to_string, panels_from_page};
pub use pagination::{
    JsonFetcher, PageRequest, PaginationSummary, download_pages, list_page_files, page_file_name,
};
pub use version::{ApiVersionCheck, check_api_version, compare_api_version};
