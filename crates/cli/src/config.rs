//! Runtime configuration loaded from environment variables.

use std::path::PathBuf;

use trainco2_core::persistence::DEFAULT_OUTPUT_FILE;
use trainco2_core::reference::{InputPaths, CARBON_INTENSITY_FILE, GPU_SPECS_FILE};
use trainco2_core::run::PARAMETERS_FILE;
use trainco2_refdata::GPU_DATA_URL;

/// Default directory holding the reference tables and run batch.
pub const DEFAULT_DATA_DIR: &str = "data";

/// File locations and remote endpoints for one invocation.
///
/// Every field has a default suitable for running from the repository
/// root. Command-line flags override these values per command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Reference tables and run batch; defaults resolve against
    /// `TRAINCO2_DATA_DIR`.
    pub inputs: InputPaths,
    /// CSV emissions log the calculate command appends to.
    pub output: PathBuf,
    /// Raw GPU catalog the update command fetches.
    pub gpu_data_url: String,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                            |
    /// |-----------------------------|------------------------------------|
    /// | `TRAINCO2_DATA_DIR`         | `data`                             |
    /// | `TRAINCO2_GPU_SPECS`        | `<data_dir>/gpu_specs.json`        |
    /// | `TRAINCO2_CARBON_INTENSITY` | `<data_dir>/carbon_intensity.json` |
    /// | `TRAINCO2_PARAMETERS`       | `<data_dir>/parameters.json`       |
    /// | `TRAINCO2_OUTPUT`           | `emissions.csv`                    |
    /// | `TRAINCO2_GPU_DATA_URL`     | voidful/gpu-info-api raw catalog   |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`], reading variables through `lookup`.
    /// Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let path_or = |key: &str, default: PathBuf| var(key).map(PathBuf::from).unwrap_or(default);

        let data_dir = path_or("TRAINCO2_DATA_DIR", PathBuf::from(DEFAULT_DATA_DIR));
        let inputs = InputPaths {
            gpu_specs: path_or("TRAINCO2_GPU_SPECS", data_dir.join(GPU_SPECS_FILE)),
            carbon_intensity: path_or(
                "TRAINCO2_CARBON_INTENSITY",
                data_dir.join(CARBON_INTENSITY_FILE),
            ),
            parameters: path_or("TRAINCO2_PARAMETERS", data_dir.join(PARAMETERS_FILE)),
        };
        let output = path_or("TRAINCO2_OUTPUT", PathBuf::from(DEFAULT_OUTPUT_FILE));
        let gpu_data_url = var("TRAINCO2_GPU_DATA_URL").unwrap_or_else(|| GPU_DATA_URL.into());

        Self {
            inputs,
            output,
            gpu_data_url,
        }
    }
}
