//! Incremental gene extraction
//!
//! Plans which panels changed since their genes were last fetched, downloads
//! gene pages for those panels one at a time, and records the new version
//! marker only after a panel's download succeeded.

use anyhow::Result;
use log::{error, info};
use std::path::{Path, PathBuf};

use crate::api::{JsonFetcher, PageRequest, PaginationSummary, download_pages};
use crate::config::ApiConfig;
use crate::success;
use crate::sync::{Entity, RefreshReason, SyncPlanner, VersionStore};

/// Prefix of the downloaded gene pages
pub const GENE_PAGE_PREFIX: &str = "genes";

/// Directory receiving a panel's gene pages
pub fn gene_json_dir(panels_dir: &Path, panel_id: &str) -> PathBuf {
    panels_dir.join(panel_id).join("genes").join("json")
}

/// Knobs for a gene sync run
#[derive(Debug, Clone)]
pub struct GeneSyncOptions {
    /// Refresh every panel regardless of stored markers
    pub force: bool,
    /// Page limit per panel
    pub max_pages: u32,
    /// Plan and report only, no downloads or marker writes
    pub dry_run: bool,
}

/// Per-run counts and failures
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneSyncReport {
    /// Panels in the catalog
    pub total: usize,
    /// Panel ids selected for refresh, in catalog order
    pub planned: Vec<String>,
    /// Panels downloaded and committed
    pub successful: Vec<String>,
    /// Panels whose download failed, with the error
    pub failed: Vec<(String, String)>,
    /// Panels downloaded but whose marker could not be written
    pub commit_failures: Vec<(String, String)>,
    /// Panels whose stored marker could not be read
    pub plan_failures: Vec<(String, String)>,
}

impl GeneSyncReport {
    pub fn is_up_to_date(&self) -> bool {
        self.planned.is_empty() && self.plan_failures.is_empty()
    }

    /// Panels whose version tracking could not be read or written
    pub fn tracking_failures(&self) -> impl Iterator<Item = &str> {
        self.plan_failures
            .iter()
            .chain(&self.commit_failures)
            .map(|(id, _)| id.as_str())
    }
}

/// Download every gene page for one panel
pub async fn download_panel_genes<F>(
    fetcher: &F,
    api: &ApiConfig,
    panels_dir: &Path,
    panel: &Entity,
    max_pages: u32,
) -> Result<PaginationSummary>
where
    F: JsonFetcher + ?Sized,
{
    download_pages(
        fetcher,
        &PageRequest {
            start_url: api.genes_url(&panel.id),
            output_dir: gene_json_dir(panels_dir, &panel.id),
            file_prefix: GENE_PAGE_PREFIX.to_string(),
            max_pages,
            label: format!("genes for panel {}", panel.id),
        },
    )
    .await
}

/// Refresh gene data for every stale panel in `panels`
///
/// A failed download is logged and counted, and processing moves on to the
/// next panel with the old marker left in place. A panel whose stored
/// marker cannot be read is skipped and reported in `plan_failures`.
pub async fn sync_genes<F, S>(
    fetcher: &F,
    api: &ApiConfig,
    planner: &SyncPlanner<S>,
    panels_dir: &Path,
    panels: &[Entity],
    options: &GeneSyncOptions,
) -> Result<GeneSyncReport>
where
    F: JsonFetcher + ?Sized,
    S: VersionStore,
{
    let plan = planner.plan_with_decisions(panels, options.force);
    let planned = plan.refresh;

    for item in &planned {
        let id = &item.entity.id;
        match &item.decision.reason {
            RefreshReason::NoRecord => {
                info!("Panel {} has no version tracking file, will download", id)
            }
            RefreshReason::Stale { stored, incoming } => {
                info!("Panel {} has been updated ({} -> {})", id, stored, incoming)
            }
            RefreshReason::Forced => info!("Panel {} will be re-downloaded (forced)", id),
            RefreshReason::UpToDate { .. } => {}
        }
    }

    let mut report = GeneSyncReport {
        total: panels.len(),
        planned: planned.iter().map(|p| p.entity.id.clone()).collect(),
        plan_failures: plan
            .failed
            .iter()
            .map(|(panel, e)| (panel.id.clone(), e.to_string()))
            .collect(),
        ..Default::default()
    };

    for (id, e) in &report.plan_failures {
        error!("Skipping panel {}: {}", id, e);
    }

    if planned.is_empty() && report.plan_failures.is_empty() {
        success!("All panels are up to date. No downloads needed.");
        return Ok(report);
    }

    info!(
        "Will download genes for {} panels (out of {} total)",
        planned.len(),
        panels.len()
    );

    if options.dry_run {
        for item in &planned {
            info!(
                "  {} ({}): {}",
                item.entity.id,
                item.entity.display_name,
                item.decision.label()
            );
        }
        return Ok(report);
    }

    for item in planned {
        let panel = &item.entity;
        info!(
            "Extracting genes for panel {} ({})...",
            panel.id, panel.display_name
        );

        match download_panel_genes(fetcher, api, panels_dir, panel, options.max_pages).await {
            Ok(summary) => {
                success!(
                    "Completed gene extraction for panel {} ({} pages)",
                    panel.id,
                    summary.pages
                );
                match planner.commit(panel) {
                    Ok(()) => {
                        info!(
                            "Updated version tracking for panel {} to {}",
                            panel.id, panel.version_marker
                        );
                        report.successful.push(panel.id.clone());
                    }
                    Err(e) => {
                        error!("{}", e);
                        report.commit_failures.push((panel.id.clone(), e.to_string()));
                    }
                }
            }
            Err(e) => {
                error!("Error downloading genes for panel {}: {:#}", panel.id, e);
                report.failed.push((panel.id.clone(), format!("{:#}", e)));
            }
        }
    }

    Ok(report)
}
