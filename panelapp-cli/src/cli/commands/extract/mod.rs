mod handler;

use clap::Args;
use std::path::PathBuf;

pub use handler::handle_extract_command;

#[derive(Debug, Clone, Args)]
pub struct ExtractCommands {
    /// Data directory for all extraction output
    #[arg(long, env = "PANELAPP_DATA_PATH")]
    pub output_path: Option<PathBuf>,

    /// Skip gene extraction
    #[arg(long)]
    pub skip_genes: bool,

    /// Skip STR extraction
    #[arg(long)]
    pub skip_strs: bool,

    /// Skip region extraction
    #[arg(long)]
    pub skip_regions: bool,
}
