//! Batch totals over calculated runs.

use serde::Serialize;

use crate::calculator::EmissionsResult;
use crate::error::CoreError;

/// Kilograms per metric ton.
pub const KG_PER_METRIC_TON: f64 = 1000.0;

/// Totals across every calculated run of one batch.
///
/// Sums are taken over the already-rounded per-run values and are not
/// rounded again.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BatchTotals {
    pub run_count: usize,
    pub total_energy_kwh: f64,
    pub total_emissions_kg_co2: f64,
    pub total_emissions_metric_tons: f64,
}

/// Sum energy and emissions over `results`.
///
/// An empty slice means no run survived validation and lookup, which is
/// reported as [`CoreError::EmptyBatch`] rather than as zero totals.
pub fn aggregate(results: &[EmissionsResult]) -> Result<BatchTotals, CoreError> {
    if results.is_empty() {
        return Err(CoreError::EmptyBatch);
    }

    let total_energy_kwh: f64 = results.iter().map(|r| r.energy_total_kwh).sum();
    let total_emissions_kg_co2: f64 = results.iter().map(|r| r.emissions_kg_co2).sum();

    Ok(BatchTotals {
        run_count: results.len(),
        total_energy_kwh,
        total_emissions_kg_co2,
        total_emissions_metric_tons: total_emissions_kg_co2 / KG_PER_METRIC_TON,
    })
}
