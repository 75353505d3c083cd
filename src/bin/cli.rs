//! Stockwatch CLI
//!
//! Local execution entry point. For AWS Lambda, use the
//! `stockwatch-*` binaries.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use stockwatch::{
    config::{HttpConfig, PollerConfig, SeederConfig},
    error::Result,
    models::SeedData,
    services::{AvailabilityPoller, HttpFetcher, PageFetcher, apply_seed, parse_availability},
    store::DynamoStore,
};

/// Stockwatch - Component Stock Tracker
#[derive(Parser, Debug)]
#[command(
    name = "stockwatch",
    version,
    about = "Tracks vendor stock for components"
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one polling pass over the inventory table
    Poll,

    /// Apply a seed dataset to the inventory tables
    Seed {
        /// Path to the seed dataset (default: data/seed.toml)
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Fetch one vendor page and print the derived availability
    Check {
        /// Product page URL
        url: String,
    },
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Poll => {
            let config = PollerConfig::from_env()?;
            log::info!("Polling inventory table {}", config.table_name);

            let store = DynamoStore::connect(&config.table_name).await;
            let poller = AvailabilityPoller::from_config(&config.http)?;
            let outcome = poller.poll_all(&store).await?;

            log::info!(
                "Polled {} components: {} updated, {} failed",
                outcome.polled,
                outcome.updated,
                outcome.failed
            );
        }

        Command::Seed { file } => {
            let path = file.unwrap_or_else(|| SeederConfig::from_env().seed_path);
            let seed = SeedData::load(&path)?;
            log::info!(
                "Loaded {} records from {}",
                seed.record_count(),
                path.display()
            );

            let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
            let client = aws_sdk_dynamodb::Client::new(&sdk_config);
            let outcome = apply_seed(&seed, |table| DynamoStore::new(client.clone(), table)).await?;

            log::info!(
                "Seeded {} records into {} tables",
                outcome.records,
                outcome.tables
            );
        }

        Command::Check { url } => {
            let fetcher = HttpFetcher::new(&HttpConfig::default())?;
            let body = fetcher.fetch(&url).await?;
            let available = parse_availability(&body)?;

            println!(
                "{} -> {}",
                url,
                if available { "in stock" } else { "out of stock" }
            );
        }
    }

    log::info!("Done!");

    Ok(())
}
