//! Command-line interface

pub mod commands;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::config::{Config, ConfigBuilder};
pub use commands::Commands;

#[derive(Debug, Parser)]
#[command(
    name = "panelapp-cli",
    version,
    about = "Incremental extractor for the PanelApp Australia API"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// PanelApp API root (without version segment)
    #[arg(long, global = true, env = "PANELAPP_BASE_URL")]
    pub base_url: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

impl Cli {
    /// Effective config: file or defaults, then flag and environment overrides
    pub fn load_config(&self) -> Result<Config> {
        let base = Config::load(self.config.as_deref())?;
        Ok(ConfigBuilder::from_config(base)
            .overrides(self.base_url.clone(), self.command.data_path())
            .build())
    }
}
