//! Command-line surface of the `trainco2` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use trainco2_core::reference::InputPaths;

use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(
    name = "trainco2",
    version,
    about = "Energy and CO2 emissions estimates for ML training runs"
)]
pub struct Cli {
    /// Defaults to `calculate` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Calculate emissions for every run in the batch and append them to the log.
    Calculate(CalculateArgs),
    /// Refresh reference data from external sources.
    Update(UpdateArgs),
}

#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct CalculateArgs {
    /// CSV file results are appended to.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// GPU specification table.
    #[arg(long)]
    pub gpu_specs: Option<PathBuf>,
    /// Regional carbon intensity table.
    #[arg(long)]
    pub carbon_intensity: Option<PathBuf>,
    /// Training run batch (`{"runs": [...]}`).
    #[arg(long)]
    pub parameters: Option<PathBuf>,
}

impl CalculateArgs {
    /// Input paths with flags taking precedence over `config`.
    pub fn inputs(&self, config: &AppConfig) -> InputPaths {
        InputPaths {
            gpu_specs: self
                .gpu_specs
                .clone()
                .unwrap_or_else(|| config.inputs.gpu_specs.clone()),
            carbon_intensity: self
                .carbon_intensity
                .clone()
                .unwrap_or_else(|| config.inputs.carbon_intensity.clone()),
            parameters: self
                .parameters
                .clone()
                .unwrap_or_else(|| config.inputs.parameters.clone()),
        }
    }

    pub fn output(&self, config: &AppConfig) -> PathBuf {
        self.output.clone().unwrap_or_else(|| config.output.clone())
    }
}

#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct UpdateArgs {
    /// Update GPU specifications from voidful/gpu-info-api.
    #[arg(long)]
    pub gpu: bool,
    /// Show carbon intensity update guidance.
    #[arg(long)]
    pub carbon: bool,
    /// Update all data sources.
    #[arg(long)]
    pub all: bool,
    /// Show what would be updated without making changes.
    #[arg(long)]
    pub dry_run: bool,
    /// GPU specification table to update.
    #[arg(long)]
    pub gpu_specs: Option<PathBuf>,
}

impl UpdateArgs {
    pub fn update_gpu(&self) -> bool {
        self.gpu || self.all
    }

    pub fn show_carbon_guidance(&self) -> bool {
        self.carbon || self.all
    }

    /// Whether any update target was selected.
    pub fn has_target(&self) -> bool {
        self.update_gpu() || self.show_carbon_guidance()
    }

    pub fn gpu_specs(&self, config: &AppConfig) -> PathBuf {
        self.gpu_specs
            .clone()
            .unwrap_or_else(|| config.inputs.gpu_specs.clone())
    }
}
