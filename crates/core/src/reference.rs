//! Reference data: GPU thermal design power and regional grid carbon intensity.
//!
//! Both tables are read fresh from JSON on every invocation and then passed
//! around as immutable values. Fields beyond the ones the calculator needs
//! (display names, vendor, notes) are kept in `extra` so that rewriting a
//! table never loses manual annotations.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Default GPU specification file name.
pub const GPU_SPECS_FILE: &str = "gpu_specs.json";
/// Default carbon intensity file name.
pub const CARBON_INTENSITY_FILE: &str = "carbon_intensity.json";

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// Specification of one GPU model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuSpec {
    /// Thermal design power in watts.
    pub tdp_watts: u32,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl GpuSpec {
    pub fn new(tdp_watts: u32) -> Self {
        Self {
            tdp_watts,
            extra: serde_json::Map::new(),
        }
    }
}

/// Grid carbon intensity of one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonIntensity {
    pub kg_co2_per_kwh: f64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CarbonIntensity {
    pub fn new(kg_co2_per_kwh: f64) -> Self {
        Self {
            kg_co2_per_kwh,
            extra: serde_json::Map::new(),
        }
    }
}

/// GPU model name -> specification.
pub type GpuSpecTable = BTreeMap<String, GpuSpec>;
/// Region code -> carbon intensity.
pub type CarbonIntensityTable = BTreeMap<String, CarbonIntensity>;

/// Both lookup tables, loaded together for one batch.
///
/// The source paths are kept so lookup failures can name the file an
/// operator has to edit.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub gpu_specs: GpuSpecTable,
    pub carbon_intensity: CarbonIntensityTable,
    pub gpu_specs_source: PathBuf,
    pub carbon_intensity_source: PathBuf,
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self::new(GpuSpecTable::new(), CarbonIntensityTable::new())
    }
}

impl ReferenceData {
    /// Tables not read from disk; sources default to the standard file names.
    pub fn new(gpu_specs: GpuSpecTable, carbon_intensity: CarbonIntensityTable) -> Self {
        Self {
            gpu_specs,
            carbon_intensity,
            gpu_specs_source: PathBuf::from(GPU_SPECS_FILE),
            carbon_intensity_source: PathBuf::from(CARBON_INTENSITY_FILE),
        }
    }

    /// Load and check both tables. Any failure is a [`CoreError::Config`].
    pub fn load(gpu_specs_path: &Path, carbon_intensity_path: &Path) -> Result<Self, CoreError> {
        Ok(Self {
            gpu_specs: load_gpu_specs(gpu_specs_path)?,
            carbon_intensity: load_carbon_intensity(carbon_intensity_path)?,
            gpu_specs_source: gpu_specs_path.to_path_buf(),
            carbon_intensity_source: carbon_intensity_path.to_path_buf(),
        })
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Read and deserialize a JSON file, mapping every failure to a config error.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CoreError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CoreError::config(path, "file not found")
        } else {
            CoreError::config(path, format!("cannot read file: {e}"))
        }
    })?;
    serde_json::from_str(&raw).map_err(|e| CoreError::config(path, format!("invalid JSON: {e}")))
}

/// Load the GPU specification table.
///
/// An empty table is rejected: with no specs loaded no run can succeed.
pub fn load_gpu_specs(path: &Path) -> Result<GpuSpecTable, CoreError> {
    let specs: GpuSpecTable = read_json(path)?;
    check_gpu_specs(&specs).map_err(|message| CoreError::config(path, message))?;
    tracing::debug!(path = %path.display(), models = specs.len(), "Loaded GPU specifications");
    Ok(specs)
}

/// Load the carbon intensity table.
pub fn load_carbon_intensity(path: &Path) -> Result<CarbonIntensityTable, CoreError> {
    let table: CarbonIntensityTable = read_json(path)?;
    check_carbon_intensity(&table).map_err(|message| CoreError::config(path, message))?;
    tracing::debug!(path = %path.display(), regions = table.len(), "Loaded carbon intensity data");
    Ok(table)
}

fn check_gpu_specs(specs: &GpuSpecTable) -> Result<(), String> {
    if specs.is_empty() {
        return Err("no GPU specifications loaded".into());
    }
    if let Some((model, _)) = specs.iter().find(|(_, spec)| spec.tdp_watts == 0) {
        return Err(format!("GPU model '{model}' has tdp_watts 0, must be positive"));
    }
    Ok(())
}

fn check_carbon_intensity(table: &CarbonIntensityTable) -> Result<(), String> {
    if table.is_empty() {
        return Err("no carbon intensity regions loaded".into());
    }
    if let Some((region, entry)) = table.iter().find(|(_, entry)| entry.kg_co2_per_kwh < 0.0) {
        return Err(format!(
            "region '{region}' has kg_co2_per_kwh {}, must be non-negative",
            entry.kg_co2_per_kwh
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// Locations of the three input files for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPaths {
    pub gpu_specs: PathBuf,
    pub carbon_intensity: PathBuf,
    pub parameters: PathBuf,
}

impl InputPaths {
    /// Standard file names inside a single data directory.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            gpu_specs: dir.join(GPU_SPECS_FILE),
            carbon_intensity: dir.join(CARBON_INTENSITY_FILE),
            parameters: dir.join(crate::run::PARAMETERS_FILE),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
