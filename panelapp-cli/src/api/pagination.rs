//! Paginated download loop
//!
//! Follows `next` links from a start URL and writes every response body to
//! `<output_dir>/<prefix>_page_<n>.json`, numbering pages from 1.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info, warn};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use super::models::PageInfo;

/// Source of JSON documents addressed by URL
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    async fn fetch_json(&self, url: &str) -> Result<Value>;
}

/// What to download and where to put it
#[derive(Debug, Clone)]
pub struct PageRequest {
    /// First page URL
    pub start_url: String,
    /// Directory receiving the page files
    pub output_dir: PathBuf,
    /// File name prefix, e.g. "panels" or "genes"
    pub file_prefix: String,
    /// Stop after this many pages even if more exist
    pub max_pages: u32,
    /// Human-readable name of what is being downloaded, for logs
    pub label: String,
}

/// Result of a pagination run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaginationSummary {
    /// Pages written
    pub pages: u32,
    /// `count` reported by the last page
    pub total_count: u64,
    /// Results seen across all pages
    pub results: usize,
    /// True if the page limit stopped the run early
    pub truncated: bool,
}

/// File name for a page number
pub fn page_file_name(prefix: &str, page: u32) -> String {
    format!("{}_page_{}.json", prefix, page)
}

/// Page files in a directory, ordered by page number
pub fn list_page_files(dir: &Path, prefix: &str) -> Result<Vec<(u32, PathBuf)>> {
    let mut files = Vec::new();
    if !dir.exists() {
        return Ok(files);
    }

    let marker = format!("{}_page_", prefix);
    for entry in fs::read_dir(dir)
        .with_context(|| format!("Failed to list page directory: {}", dir.display()))?
    {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let page = name
            .strip_prefix(&marker)
            .and_then(|rest| rest.strip_suffix(".json"))
            .and_then(|n| n.parse::<u32>().ok());
        if let Some(page) = page {
            files.push((page, path));
        }
    }

    files.sort_by_key(|(page, _)| *page);
    Ok(files)
}

/// Download every page reachable from `request.start_url`
///
/// Existing page files with the same prefix are removed first so a shorter
/// list does not leave stale pages behind. Any fetch or write failure
/// aborts the run.
pub async fn download_pages<F>(fetcher: &F, request: &PageRequest) -> Result<PaginationSummary>
where
    F: JsonFetcher + ?Sized,
{
    fs::create_dir_all(&request.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            request.output_dir.display()
        )
    })?;
    clear_page_files(&request.output_dir, &request.file_prefix)?;

    let mut summary = PaginationSummary::default();
    let mut next_url = Some(request.start_url.clone());
    let mut page = 1u32;

    while let Some(url) = next_url.take() {
        if page > request.max_pages {
            warn!(
                "Safety limit reached ({} pages) for {}",
                request.max_pages, request.label
            );
            summary.truncated = true;
            break;
        }

        info!("  Downloading {} page {}...", request.label, page);
        debug!("GET {}", url);

        let body = fetcher
            .fetch_json(&url)
            .await
            .with_context(|| format!("Failed to download {} page {}", request.label, page))?;

        let path = request
            .output_dir
            .join(page_file_name(&request.file_prefix, page));
        write_json_pretty(&path, &body)?;

        let info = PageInfo::from_json(&body);
        info!(
            "    Page {} downloaded: {} results (Total: {})",
            page, info.result_count, info.count
        );

        summary.pages = page;
        summary.total_count = info.count;
        summary.results += info.result_count;

        next_url = info.next;
        page += 1;
    }

    Ok(summary)
}

fn clear_page_files(dir: &Path, prefix: &str) -> Result<()> {
    for (_, path) in list_page_files(dir, prefix)? {
        fs::remove_file(&path)
            .with_context(|| format!("Failed to remove old page file: {}", path.display()))?;
    }
    Ok(())
}

fn write_json_pretty(path: &Path, body: &Value) -> Result<()> {
    let content = serde_json::to_vec_pretty(body).context("Failed to serialize page")?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
