//! Subcommands

pub mod check;
pub mod extract;
pub mod genes;
pub mod panels;

use clap::Subcommand;
use std::path::PathBuf;

pub use extract::ExtractCommands;
pub use genes::GenesCommands;
pub use panels::PanelsCommands;

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Download the panel list and write panel_list.tsv
    Panels(PanelsCommands),
    /// Download gene data for panels whose version changed
    Genes(GenesCommands),
    /// Run the panel list and gene extraction in sequence
    Extract(ExtractCommands),
    /// Probe the API and report what it returns
    Check,
}

impl Commands {
    /// Data directory given on the command line or via environment
    pub fn data_path(&self) -> Option<PathBuf> {
        match self {
            Commands::Panels(args) => args.output_path.clone(),
            Commands::Genes(args) => args.data_path.clone(),
            Commands::Extract(args) => args.output_path.clone(),
            Commands::Check => None,
        }
    }
}
