//! Subcommand handlers. Each returns whether the command succeeded; errors
//! that abort the command are returned as `anyhow` errors.

pub mod calculate;
pub mod update;

use crate::cli::{CalculateArgs, Commands};
use crate::config::AppConfig;

/// Run the selected subcommand, `calculate` when none was given.
pub async fn dispatch(command: Option<Commands>, config: &AppConfig) -> anyhow::Result<bool> {
    match command {
        Some(Commands::Calculate(args)) => calculate::execute(&args, config),
        None => calculate::execute(&CalculateArgs::default(), config),
        Some(Commands::Update(args)) => update::execute(&args, config).await,
    }
}
