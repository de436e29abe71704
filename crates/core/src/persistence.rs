//! Append-only CSV log of emissions results.
//!
//! The header is written only when the destination does not exist yet.
//! Existing rows are never rewritten, so running the same batch twice logs
//! it twice.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::calculator::EmissionsResult;
use crate::error::CoreError;

/// Default output file, relative to the working directory.
pub const DEFAULT_OUTPUT_FILE: &str = "emissions.csv";

/// Column order of the output store.
pub const CSV_COLUMNS: [&str; 12] = [
    "run_name",
    "timestamp",
    "gpu_model",
    "gpu_count",
    "duration_hours",
    "utilization",
    "region",
    "carbon_intensity_kg_co2_kwh",
    "pue",
    "energy_gpu_kwh",
    "energy_total_kwh",
    "emissions_kg_co2",
];

/// What one append call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendSummary {
    pub rows_written: usize,
    pub header_written: bool,
}

/// Append `results` to the CSV file at `destination`, in slice order.
///
/// Parent directories are created as needed. The whole batch is encoded in
/// memory and handed to the OS as a single append write.
pub fn append_results(
    results: &[EmissionsResult],
    destination: &Path,
) -> Result<AppendSummary, CoreError> {
    if results.is_empty() {
        return Ok(AppendSummary {
            rows_written: 0,
            header_written: false,
        });
    }

    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| CoreError::io(parent, e))?;
    }

    let header_written = !destination.is_file();
    let buffer = encode_rows(results, header_written)?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(destination)
        .map_err(|e| CoreError::io(destination, e))?;
    file.write_all(&buffer)
        .and_then(|()| file.flush())
        .map_err(|e| CoreError::io(destination, e))?;

    tracing::debug!(
        path = %destination.display(),
        rows = results.len(),
        header_written,
        "Appended emissions results",
    );

    Ok(AppendSummary {
        rows_written: results.len(),
        header_written,
    })
}

fn encode_rows(results: &[EmissionsResult], with_header: bool) -> Result<Vec<u8>, CoreError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    if with_header {
        writer.write_record(CSV_COLUMNS)?;
    }
    for result in results {
        writer.serialize(result)?;
    }
    writer
        .into_inner()
        .map_err(|e| CoreError::Csv(csv::Error::from(e.into_error())))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
