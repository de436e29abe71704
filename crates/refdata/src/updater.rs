//! GPU specification refresh: fetch, extract, compare, back up, merge, write.

use std::path::{Path, PathBuf};

use crate::backup::create_backup;
use crate::extract::{extract_datacenter_gpus, CatalogSpecs};
use crate::merge::{diff_specs, merge_specs, RawSpecTable, SpecDiff};
use crate::source::{FetchError, GpuCatalogSource};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Reasons a GPU specification refresh can fail. Nothing is written when
/// any of these is returned.
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error("Error reading current specs from '{}': {message}", .path.display())]
    ReadCurrent { path: PathBuf, message: String },

    #[error("Failed to fetch GPU data: {0}")]
    Fetch(#[from] FetchError),

    #[error("Fetched GPU catalog is empty or not a JSON object")]
    EmptyCatalog,

    #[error("No GPU data extracted from the catalog")]
    NothingExtracted,

    #[error("Failed to back up '{}': {cause}", .path.display())]
    Backup {
        path: PathBuf,
        #[source]
        cause: std::io::Error,
    },

    #[error("Failed to write '{}': {cause}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        cause: std::io::Error,
    },

    #[error("Failed to encode GPU specs: {0}")]
    Encode(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Everything one refresh found and did.
#[derive(Debug, Clone, PartialEq)]
pub struct GpuUpdateReport {
    /// `false` when the specification file did not exist yet.
    pub current_file_found: bool,
    pub current_count: usize,
    pub catalog_count: usize,
    pub extracted: CatalogSpecs,
    pub diff: SpecDiff,
    pub merged_count: usize,
    pub dry_run: bool,
    pub backup: Option<PathBuf>,
}

impl GpuUpdateReport {
    /// Whether the specification file was rewritten.
    pub fn written(&self) -> bool {
        !self.dry_run
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// Read the current table. A missing file is an empty table.
pub fn read_current_specs(path: &Path) -> Result<(RawSpecTable, bool), UpdateError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "GPU specs not found, will create new file");
            return Ok((RawSpecTable::new(), false));
        }
        Err(e) => {
            return Err(UpdateError::ReadCurrent {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        }
    };
    let table = serde_json::from_str(&raw).map_err(|e| UpdateError::ReadCurrent {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok((table, true))
}

/// Refresh the GPU specification file at `path` from `source`.
///
/// New models are added and fetched models overwrite existing entries; no
/// entry is removed. With `dry_run` the file is left untouched. Otherwise
/// the current file is backed up before being rewritten.
pub async fn update_gpu_specs<S: GpuCatalogSource>(
    source: &S,
    path: &Path,
    dry_run: bool,
) -> Result<GpuUpdateReport, UpdateError> {
    let (current, current_file_found) = read_current_specs(path)?;
    tracing::info!(models = current.len(), "Loaded current GPU specifications");

    tracing::info!(source = source.describe(), "Fetching GPU catalog");
    let catalog = source.fetch().await?;
    let catalog_count = catalog.as_object().map_or(0, |entries| entries.len());
    if catalog_count == 0 {
        return Err(UpdateError::EmptyCatalog);
    }
    tracing::info!(gpus = catalog_count, "Fetched GPU catalog");

    let extracted = extract_datacenter_gpus(&catalog);
    if extracted.is_empty() {
        return Err(UpdateError::NothingExtracted);
    }
    tracing::info!(gpus = extracted.len(), "Extracted NVIDIA datacenter GPUs");

    let diff = diff_specs(&current, &extracted);
    if !diff.has_changes() {
        tracing::info!("GPU specifications already match the catalog");
    }
    let merged = merge_specs(&current, &extracted)?;

    let mut report = GpuUpdateReport {
        current_file_found,
        current_count: current.len(),
        catalog_count,
        extracted,
        diff,
        merged_count: merged.len(),
        dry_run,
        backup: None,
    };

    if dry_run {
        tracing::info!(path = %path.display(), "Dry run, no changes written");
        return Ok(report);
    }

    report.backup = create_backup(path).map_err(|cause| UpdateError::Backup {
        path: path.to_path_buf(),
        cause,
    })?;

    let body = serde_json::to_string_pretty(&merged)?;
    std::fs::write(path, body + "\n").map_err(|cause| UpdateError::Write {
        path: path.to_path_buf(),
        cause,
    })?;
    tracing::info!(
        path = %path.display(),
        models = report.merged_count,
        "Updated GPU specifications",
    );

    Ok(report)
}
