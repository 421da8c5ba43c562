//! Panel list command handler

use anyhow::{Context, Result};
use log::info;

use super::PanelsCommands;
use crate::api::PanelAppClient;
use crate::config::Config;
use crate::services::panel_list::{PanelListOutcome, extract_panel_list};
use crate::success;

pub async fn handle_panels_command(_args: PanelsCommands, config: Config) -> Result<()> {
    run_panel_list(&config).await.map(|_| ())
}

/// Fetch the panel list from the live API
pub async fn run_panel_list(config: &Config) -> Result<PanelListOutcome> {
    info!("Starting PanelApp Australia data extraction...");

    let client = PanelAppClient::new(config.api.clone())?;
    let outcome = extract_panel_list(&client, config)
        .await
        .context("Data extraction failed")?;

    success!("Data extraction completed successfully!");
    info!("Output directory: {}", config.extract.data_path.display());
    info!("Panel list: {}", outcome.tsv_path.display());
    Ok(outcome)
}
