mod handler;

use clap::Args;
use std::path::PathBuf;

pub use handler::{handle_panels_command, run_panel_list};

#[derive(Debug, Clone, Args)]
pub struct PanelsCommands {
    /// Data directory receiving panel_list.tsv and the raw pages
    #[arg(long, env = "PANELAPP_DATA_PATH")]
    pub output_path: Option<PathBuf>,
}
