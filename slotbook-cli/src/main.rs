mod commands;
mod render;
mod source;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "slotbook")]
#[command(about = "View and check an agent's availability schedule")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a month as a calendar grid
    Month {
        /// Month number (1-12), defaults to the current month
        #[arg(short, long)]
        month: Option<u32>,

        /// Year, defaults to the current year
        #[arg(short, long)]
        year: Option<i32>,

        /// Read schedule data from a JSON file instead of the API
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// List the weekly schedule and this month's extra slots
    Week {
        /// Read schedule data from a JSON file instead of the API
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Validate the schedule; exits non-zero if anything would block a save
    Check {
        /// Read schedule data from a JSON file instead of the API
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Month { month, year, file } => commands::month::run(month, year, file).await,
        Commands::Week { file } => commands::week::run(file).await,
        Commands::Check { file } => commands::check::run(file).await,
    }
}
