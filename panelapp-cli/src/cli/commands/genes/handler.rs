//! Incremental gene command handler

use anyhow::{Context, Result};
use log::{info, warn};
use std::path::PathBuf;

use super::GenesCommands;
use crate::api::PanelAppClient;
use crate::catalog::{PANEL_LIST_FILE, read_panel_list};
use crate::config::Config;
use crate::services::data_folder::latest_dated_folder;
use crate::services::genes::{GeneSyncOptions, GeneSyncReport, sync_genes};
use crate::success;
use crate::sync::{FileVersionStore, SyncPlanner};

/// Flags for one gene extraction run
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneRun {
    pub force: bool,
    pub latest_dated: bool,
    pub dry_run: bool,
}

impl From<&GenesCommands> for GeneRun {
    fn from(args: &GenesCommands) -> Self {
        Self {
            force: args.force,
            latest_dated: args.latest_dated,
            dry_run: args.dry_run,
        }
    }
}

pub async fn handle_genes_command(args: GenesCommands, config: Config) -> Result<()> {
    run_genes(&config, GeneRun::from(&args)).await.map(|_| ())
}

/// Refresh genes for every panel in the catalog whose version changed
///
/// Download failures are reported but do not fail the run. Failing to
/// record a version after a successful download does.
pub async fn run_genes(config: &Config, run: GeneRun) -> Result<GeneSyncReport> {
    info!("Starting PanelApp Australia incremental gene extraction...");

    let data_folder: PathBuf = if run.latest_dated {
        latest_dated_folder(&config.extract.data_path)?
    } else {
        config.extract.data_path.clone()
    };
    if !data_folder.exists() {
        anyhow::bail!("Data path does not exist: {}", data_folder.display());
    }
    info!("Using data folder: {}", data_folder.display());

    let panel_list = data_folder.join(PANEL_LIST_FILE);
    let panels = read_panel_list(&panel_list)
        .with_context(|| format!("Failed to read panel list: {}", panel_list.display()))?;
    info!("Found {} panels in panel list", panels.len());
    if panels.is_empty() {
        anyhow::bail!("No panels found to process");
    }

    let panels_dir = data_folder.join("panels");
    let planner = SyncPlanner::with_store(FileVersionStore::new(&panels_dir));
    let client = PanelAppClient::new(config.api.clone())?;
    let options = GeneSyncOptions {
        force: run.force,
        max_pages: config.extract.max_gene_pages,
        dry_run: run.dry_run,
    };

    let report = sync_genes(&client, &config.api, &planner, &panels_dir, &panels, &options).await?;

    if !report.is_up_to_date() && !run.dry_run {
        success!(
            "Incremental gene extraction completed: {} successful, {} failed",
            report.successful.len(),
            report.failed.len() + report.commit_failures.len() + report.plan_failures.len()
        );
        if !report.failed.is_empty() {
            warn!("Some panels failed. Check logs for details.");
        }
        info!("Output directory: {}", panels_dir.display());
        info!("Version tracking files updated in individual panel directories");
    }

    let tracking_failures: Vec<String> =
        report.tracking_failures().map(str::to_string).collect();
    if !tracking_failures.is_empty() {
        anyhow::bail!(
            "Version tracking failed for {} panels: {}",
            tracking_failures.len(),
            tracking_failures.join(", ")
        );
    }

    Ok(report)
}
