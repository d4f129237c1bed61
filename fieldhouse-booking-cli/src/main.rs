mod cli;
mod logging;
mod orchestrator;
mod results;

use anyhow::Result;
use clap::Parser as _;
use fieldhouse_booking_config::BookingConfig;
use tracing::info;

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init(cli.quiet)?;

    let config = BookingConfig::load(&cli.config)?;
    let success = match cli.command {
        Commands::Book(args) => {
            let options = args.into();
            orchestrator::run_single(&config, &options).await?
        }
        Commands::Batch(args) => {
            let options = args.into();
            orchestrator::run_batch(&config, &options).await?
        }
    };

    if success {
        info!("run finished, all bookings succeeded");
        Ok(())
    } else {
        // scripted callers key off the exit status
        std::process::exit(1);
    }
}
