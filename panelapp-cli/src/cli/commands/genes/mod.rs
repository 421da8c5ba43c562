mod handler;

use clap::Args;
use std::path::PathBuf;

pub use handler::{GeneRun, handle_genes_command, run_genes};

#[derive(Debug, Clone, Args)]
pub struct GenesCommands {
    /// Data directory holding panel_list.tsv
    #[arg(long, env = "PANELAPP_DATA_PATH")]
    pub data_path: Option<PathBuf>,

    /// Re-download every panel, ignoring stored versions
    #[arg(long)]
    pub force: bool,

    /// Use the newest YYYYMMDD folder under the data directory
    #[arg(long)]
    pub latest_dated: bool,

    /// Only report which panels would be refreshed
    #[arg(long)]
    pub dry_run: bool,
}
