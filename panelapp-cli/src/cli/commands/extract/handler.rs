//! Full extraction: panel list first, then the per-panel steps

use anyhow::{Context, Result};
use log::{error, info, warn};
use std::fmt;

use super::ExtractCommands;
use crate::cli::commands::genes::{GeneRun, run_genes};
use crate::cli::commands::panels::run_panel_list;
use crate::config::Config;
use crate::success;

/// Outcome of one extraction step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Completed,
    CompletedWithFailures,
    Failed,
    Skipped,
    NotImplemented,
}

impl StepStatus {
    fn is_clean(self) -> bool {
        matches!(self, StepStatus::Completed | StepStatus::Skipped)
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StepStatus::Completed => "Completed",
            StepStatus::CompletedWithFailures => "Completed with failures",
            StepStatus::Failed => "Failed",
            StepStatus::Skipped => "Skipped",
            StepStatus::NotImplemented => "Not implemented",
        };
        f.write_str(label)
    }
}

/// Gene, STR and region step results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ExtractSummary {
    genes: StepStatus,
    strs: StepStatus,
    regions: StepStatus,
}

impl ExtractSummary {
    fn is_clean(&self) -> bool {
        self.genes.is_clean() && self.strs.is_clean() && self.regions.is_clean()
    }
}

pub async fn handle_extract_command(args: ExtractCommands, config: Config) -> Result<()> {
    info!("Starting PanelApp Australia complete data extraction...");
    info!("Step 1: Extracting panel list data...");

    run_panel_list(&config)
        .await
        .context("Panel list extraction failed. Cannot continue.")?;
    success!("Panel list extraction completed successfully");
    info!("Using data folder: {}", config.extract.data_path.display());

    let genes = if args.skip_genes {
        info!("Skipping gene extraction (--skip-genes specified)");
        StepStatus::Skipped
    } else {
        info!("Step 2: Extracting gene data for all panels...");
        match run_genes(&config, GeneRun::default()).await {
            Ok(report) if report.failed.is_empty() => StepStatus::Completed,
            Ok(_) => StepStatus::CompletedWithFailures,
            Err(e) => {
                error!("Gene data extraction failed: {:#}", e);
                warn!("Gene extraction failed, but continuing with other extractions");
                StepStatus::Failed
            }
        }
    };

    let strs = unimplemented_step("STR", args.skip_strs, "--skip-strs");
    let regions = unimplemented_step("region", args.skip_regions, "--skip-regions");

    report_summary(&config, ExtractSummary { genes, strs, regions });
    Ok(())
}

fn unimplemented_step(name: &str, skip: bool, flag: &str) -> StepStatus {
    if skip {
        info!("Skipping {} extraction ({} specified)", name, flag);
        StepStatus::Skipped
    } else {
        warn!("{} data extraction is not implemented yet, skipping", name);
        StepStatus::NotImplemented
    }
}

fn report_summary(config: &Config, summary: ExtractSummary) {
    if summary.is_clean() {
        success!("Complete data extraction finished successfully!");
    } else {
        warn!("Complete data extraction finished with some warnings or errors");
    }

    info!("Output directory: {}", config.extract.data_path.display());
    info!("Data extraction summary:");
    info!("  Panel list: {}", StepStatus::Completed);
    info!("  Gene data: {}", summary.genes);
    info!("  STR data: {}", summary.strs);
    info!("  Region data: {}", summary.regions);
}
