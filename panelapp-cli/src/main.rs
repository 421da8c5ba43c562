use anyhow::Result;
use clap::Parser;

use panelapp_cli::cli::Cli;
use panelapp_cli::cli::commands::{
    Commands, check::handle_check_command, extract::handle_extract_command,
    genes::handle_genes_command, panels::handle_panels_command,
};
use panelapp_cli::logging;

#[tokio::main]
async fn main() {
    // .env must be loaded before clap reads env-backed flags
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose, cli.no_color) {
        eprintln!("Failed to initialize logging: {:#}", e);
    }

    if let Err(e) = run(cli).await {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.load_config()?;
    log::debug!("Using API root {}", config.api.versioned_root());

    match cli.command {
        Commands::Panels(args) => handle_panels_command(args, config).await,
        Commands::Genes(args) => handle_genes_command(args, config).await,
        Commands::Extract(args) => handle_extract_command(args, config).await,
        Commands::Check => handle_check_command(config).await,
    }
}
