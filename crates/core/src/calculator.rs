//! Energy and emissions calculation for a single validated run.
//!
//! ```text
//! energy_gpu_kwh   = (tdp_watts * gpu_count * duration_hours * utilization) / 1000
//! energy_total_kwh = energy_gpu_kwh * pue
//! emissions_kg_co2 = energy_total_kwh * kg_co2_per_kwh
//! ```
//!
//! Intermediates are carried at full precision; the three outputs are
//! rounded to [`RESULT_DECIMALS`] places once, when the result is built.

use serde::{Deserialize, Serialize};

use crate::error::LookupError;
use crate::reference::ReferenceData;
use crate::run::RunDescriptor;
use crate::types::Timestamp;

/// Watt-hours per kilowatt-hour.
pub const WH_PER_KWH: f64 = 1000.0;

/// Decimal places kept in stored energy and emissions values.
pub const RESULT_DECIMALS: i32 = 4;

/// Energy and emissions for one run. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionsResult {
    pub run_name: String,
    pub timestamp: Timestamp,
    pub gpu_model: String,
    pub gpu_count: u64,
    pub duration_hours: f64,
    pub utilization: f64,
    pub region: String,
    pub carbon_intensity_kg_co2_kwh: f64,
    pub pue: f64,
    pub energy_gpu_kwh: f64,
    pub energy_total_kwh: f64,
    pub emissions_kg_co2: f64,
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Calculate emissions for `run`, stamped with the current time.
pub fn calculate(run: &RunDescriptor, refs: &ReferenceData) -> Result<EmissionsResult, LookupError> {
    calculate_at(run, refs, chrono::Utc::now())
}

/// Calculate emissions for `run` with an explicit timestamp.
///
/// Identical inputs always produce identical results.
pub fn calculate_at(
    run: &RunDescriptor,
    refs: &ReferenceData,
    timestamp: Timestamp,
) -> Result<EmissionsResult, LookupError> {
    let gpu = refs
        .gpu_specs
        .get(&run.gpu_model)
        .ok_or_else(|| LookupError::UnknownGpuModel {
            model: run.gpu_model.clone(),
            table: refs.gpu_specs_source.clone(),
            available: refs.gpu_specs.keys().cloned().collect(),
        })?;

    let carbon = refs
        .carbon_intensity
        .get(&run.region)
        .ok_or_else(|| LookupError::UnknownRegion {
            region: run.region.clone(),
            table: refs.carbon_intensity_source.clone(),
            available: refs.carbon_intensity.keys().cloned().collect(),
        })?;

    let energy_gpu_kwh = f64::from(gpu.tdp_watts)
        * run.gpu_count as f64
        * run.duration_hours
        * run.utilization
        / WH_PER_KWH;
    let energy_total_kwh = energy_gpu_kwh * run.pue;
    let emissions_kg_co2 = energy_total_kwh * carbon.kg_co2_per_kwh;

    Ok(EmissionsResult {
        run_name: run.run_name.clone(),
        timestamp,
        gpu_model: run.gpu_model.clone(),
        gpu_count: run.gpu_count,
        duration_hours: run.duration_hours,
        utilization: run.utilization,
        region: run.region.clone(),
        carbon_intensity_kg_co2_kwh: carbon.kg_co2_per_kwh,
        pue: run.pue,
        energy_gpu_kwh: round_to(energy_gpu_kwh, RESULT_DECIMALS),
        energy_total_kwh: round_to(energy_total_kwh, RESULT_DECIMALS),
        emissions_kg_co2: round_to(emissions_kg_co2, RESULT_DECIMALS),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
