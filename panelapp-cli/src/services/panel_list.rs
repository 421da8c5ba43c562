//! Panel list extraction: version check, paginated download, TSV summary

use anyhow::{Context, Result};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::{
    ApiVersionCheck, JsonFetcher, PageRequest, PaginationSummary, check_api_version,
    download_pages,
};
use crate::catalog::{
    PANEL_LIST_FILE, PANEL_PAGE_PREFIX, PanelListRow, collect_rows, write_panel_list,
};
use crate::config::Config;

/// Number of summary rows echoed to the log
const PREVIEW_ROWS: usize = 5;

/// Where the raw panel list pages go
pub fn panel_list_json_dir(data_path: &Path) -> PathBuf {
    data_path.join("panel_list").join("json")
}

/// Result of a panel list extraction
#[derive(Debug, Clone)]
pub struct PanelListOutcome {
    pub pages: PaginationSummary,
    pub rows: Vec<PanelListRow>,
    pub tsv_path: PathBuf,
    pub version: ApiVersionCheck,
}

/// Download the full panel list and write `panel_list.tsv`
///
/// Version markers are not touched here; they are only written once a
/// panel's genes have been fetched.
pub async fn extract_panel_list<F>(fetcher: &F, config: &Config) -> Result<PanelListOutcome>
where
    F: JsonFetcher + ?Sized,
{
    let data_path = &config.extract.data_path;
    let json_dir = panel_list_json_dir(data_path);

    info!("Setting up output folder: {}", data_path.display());
    fs::create_dir_all(&json_dir)
        .with_context(|| format!("Failed to create folder structure: {}", json_dir.display()))?;
    info!("Created folder structure: {}", json_dir.display());

    info!("Checking API version...");
    let version = check_api_version(fetcher, &config.api).await?;
    info!("Current API version: {}", version.found());
    match &version {
        ApiVersionCheck::Matches { version } => {
            info!("API version matches expected version: {}", version);
        }
        ApiVersionCheck::Mismatch { expected, found } => {
            warn!(
                "API version mismatch! Expected: {}, Found: {}",
                expected, found
            );
            warn!("Continuing with execution, but results may vary...");
        }
    }

    info!("Starting panel data extraction...");
    let pages = download_pages(
        fetcher,
        &PageRequest {
            start_url: config.api.panels_url(),
            output_dir: json_dir.clone(),
            file_prefix: PANEL_PAGE_PREFIX.to_string(),
            max_pages: config.extract.max_panel_pages,
            label: "panel list".to_string(),
        },
    )
    .await
    .context("Panel list download failed")?;
    info!(
        "Panel data extraction completed. Downloaded {} pages.",
        pages.pages
    );

    info!("Extracting panel information from JSON files...");
    let rows = collect_rows(&json_dir)?;
    let tsv_path = data_path.join(PANEL_LIST_FILE);
    write_panel_list(&tsv_path, &rows)?;

    info!(
        "Extracted information from {} pages containing {} panels",
        pages.pages,
        rows.len()
    );
    info!("Summary saved to: {}", tsv_path.display());

    if !rows.is_empty() {
        info!("First {} entries in summary:", PREVIEW_ROWS.min(rows.len()));
        for row in rows.iter().take(PREVIEW_ROWS) {
            info!("  {}: {}", row.id, row.name);
        }
    }

    Ok(PanelListOutcome {
        pages,
        rows,
        tsv_path,
        version,
    })
}
