mod config;
mod main_lib;
mod scheduler;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use config::Config;
use kurs_core::pipeline::{parse_date, PublishReport, RatesServiceTrait};
use main_lib::{build_service, init_tracing};
use tracing::info;

#[derive(Parser)]
#[command(name = "kurs")]
#[command(about = "Daily consensus exchange-rate table", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch providers and store their snapshots
    Fetch {
        /// Only fetch these providers (repeatable)
        #[arg(long = "provider", value_name = "ID")]
        providers: Vec<String>,
    },
    /// Publish the consensus table from a day's snapshots
    Publish {
        /// Day to publish, YYYY-MM-DD (defaults to today, UTC)
        #[arg(long, value_parser = parse_day)]
        date: Option<NaiveDate>,

        /// Exit with an error when any diagnostic was raised
        #[arg(long)]
        strict: bool,
    },
    /// Fetch all providers, then publish
    Run {
        /// Exit with an error when any diagnostic was raised
        #[arg(long)]
        strict: bool,
    },
    /// Repeat `run` on a fixed interval
    Schedule {
        #[arg(
            long,
            env = "KURS_INTERVAL_HOURS",
            default_value_t = 24,
            value_parser = clap::value_parser!(u64).range(1..=8760)
        )]
        interval_hours: u64,
    },
}

fn parse_day(value: &str) -> std::result::Result<NaiveDate, String> {
    parse_date(value).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_env().context("Invalid configuration")?;
    init_tracing(config.log_format);

    let service = build_service(&config)?;

    match cli.command {
        Commands::Fetch { providers } => {
            let report = service.fetch(&providers).await?;
            info!(
                "Fetched {} providers: {}",
                report.outputs.len(),
                report.diagnostics.summary()
            );
            Ok(())
        }
        Commands::Publish { date, strict } => {
            let date = date.unwrap_or_else(|| Utc::now().date_naive());
            let report = service.publish(date)?;
            finish(report, strict)
        }
        Commands::Run { strict } => {
            let report = service.run().await?;
            finish(report, strict)
        }
        Commands::Schedule { interval_hours } => {
            scheduler::run_schedule(service, interval_hours).await;
            Ok(())
        }
    }
}

fn finish(report: PublishReport, strict: bool) -> Result<()> {
    info!(
        "Published {} rates for {} from {} providers to {}",
        report.rates,
        report.date,
        report.providers,
        report.paths.latest_rates.display()
    );
    if strict && report.has_diagnostics() {
        bail!(
            "{} diagnostics raised for {}",
            report.diagnostics.len(),
            report.date
        );
    }
    Ok(())
}
