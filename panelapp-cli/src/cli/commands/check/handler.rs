//! API connectivity check

use anyhow::Result;
use log::info;

use crate::api::PanelAppClient;
use crate::config::Config;
use crate::services::probe::probe;
use crate::success;

pub async fn handle_check_command(config: Config) -> Result<()> {
    info!("Testing PanelApp Australia API endpoints...");

    let client = PanelAppClient::with_timeout(config.api.clone(), config.api.probe_timeout())?;
    let report = probe(&client, &config.api).await?;

    info!("API version: {}", report.api_version);
    info!("Total panels available: {}", report.total_panels);
    info!("Panels in first page: {}", report.first_page_count);
    info!("Has next page: {}", report.has_next);
    if let Some((id, name)) = &report.first_panel {
        info!("First panel: {} - {}", id, name);
    }

    success!("All checks passed! The extractor should work correctly.");
    Ok(())
}
