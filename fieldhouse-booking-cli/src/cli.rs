use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::orchestrator::RunOptions;

#[derive(Parser)]
#[command(name = "fieldhouse-booking")]
#[command(version, about = "Automated court booking for the field house")]
pub struct Cli {
    /// Path to the booking configuration file
    #[arg(long, global = true, default_value = "fieldhouse.toml")]
    pub config: PathBuf,

    /// Only print errors to the console (the log file still gets everything)
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Book a slot for the single configured account
    Book(BookArgs),

    /// Book slots for every account in the roster
    Batch(BatchArgs),
}

#[derive(Args)]
pub struct BookArgs {
    /// Run the browser headless
    #[arg(long)]
    pub headless: bool,

    /// Capture step-by-step screenshots
    #[arg(long)]
    pub screenshots: bool,

    /// Use the date from the config file instead of the booking-window end
    #[arg(long)]
    pub use_config_date: bool,

    /// WebDriver endpoint the browser is driven through
    #[arg(long, default_value = "http://localhost:9515", env = "FIELDHOUSE_WEBDRIVER_URL")]
    pub webdriver_url: String,
}

#[derive(Args)]
pub struct BatchArgs {
    /// Show browser windows (batch runs are headless by default)
    #[arg(long)]
    pub visible: bool,

    /// Capture step-by-step screenshots per user
    #[arg(long)]
    pub screenshots: bool,

    /// Use dates from the config file instead of the booking-window end
    #[arg(long)]
    pub use_config_date: bool,

    /// Run users one after another with a fixed delay instead of in parallel
    #[arg(long)]
    pub sequential: bool,

    /// Cap on parallel booking sessions (defaults to the machine's parallelism)
    #[arg(long)]
    pub workers: Option<usize>,

    /// WebDriver endpoint the browsers are driven through
    #[arg(long, default_value = "http://localhost:9515", env = "FIELDHOUSE_WEBDRIVER_URL")]
    pub webdriver_url: String,
}

impl From<BookArgs> for RunOptions {
    fn from(args: BookArgs) -> Self {
        Self {
            headless: args.headless,
            screenshots: args.screenshots,
            use_config_date: args.use_config_date,
            webdriver_url: args.webdriver_url,
            sequential: false,
            workers: None,
        }
    }
}

impl From<BatchArgs> for RunOptions {
    fn from(args: BatchArgs) -> Self {
        Self {
            headless: !args.visible,
            screenshots: args.screenshots,
            use_config_date: args.use_config_date,
            webdriver_url: args.webdriver_url,
            sequential: args.sequential,
            workers: args.workers,
        }
    }
}
