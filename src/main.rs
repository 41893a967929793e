// Main entry point for mdreport

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use mdreport::cli::{Cli, Commands};
use mdreport::commands;
use mdreport::config::Config;
use mdreport::logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.debug);
    info!("Starting mdreport v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration from file (if exists)
    let config = Config::load();

    if let Some(config_file) = &cli.init_config {
        return commands::handle_init_config(config_file);
    }

    if let Some(shell_type) = &cli.completion {
        return commands::handle_completion(shell_type);
    }

    let exit_code = match &cli.command {
        Some(Commands::Run(args)) => commands::handle_run(args, config.as_ref()).await?,
        Some(Commands::Render(args)) => commands::handle_render(args, config.as_ref())?,
        None => {
            warn!("No command given. Use 'mdreport --help' for usage.");
            return Ok(());
        }
    };

    // The host's exit status passes through unchanged
    if exit_code != 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}
