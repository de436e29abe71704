//! `trainco2` -- ML training emissions calculator.
//!
//! Reads GPU specifications, regional carbon intensity and a batch of
//! training runs, appends per-run energy and CO2 estimates to a CSV log,
//! and maintains the reference tables.
//!
//! See [`trainco2_cli::config::AppConfig::from_env`] for environment
//! variables. Log verbosity follows `RUST_LOG` (default `trainco2=info`).

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trainco2_cli::cli::Cli;
use trainco2_cli::commands;
use trainco2_cli::config::AppConfig;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trainco2=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();
    tracing::debug!(?config, "Loaded configuration");

    match commands::dispatch(cli.command, &config).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
