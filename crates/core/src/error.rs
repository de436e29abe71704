use std::path::PathBuf;

use crate::validation::FieldViolation;

/// Batch-level errors. Any of these aborts the whole invocation.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Configuration error in '{}': {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("No valid runs to process")]
    EmptyBatch,

    #[error("I/O error on '{}': {cause}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        cause: std::io::Error,
    },

    #[error("CSV encoding error: {0}")]
    Csv(#[from] csv::Error),
}

impl CoreError {
    pub(crate) fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, cause: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            cause,
        }
    }
}

/// A reference key used by a run is absent from the loaded tables.
///
/// The message names the table file and lists every known key so an
/// operator can spot typos.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error(
        "GPU model '{model}' not found in {}. Available: {}",
        .table.display(),
        .available.join(", ")
    )]
    UnknownGpuModel {
        model: String,
        table: PathBuf,
        available: Vec<String>,
    },

    #[error(
        "Region '{region}' not found in {}. Available: {}",
        .table.display(),
        .available.join(", ")
    )]
    UnknownRegion {
        region: String,
        table: PathBuf,
        available: Vec<String>,
    },
}

/// Run-level errors. The offending run is skipped; the batch continues.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RunError {
    #[error("Invalid parameters: {}", join_violations(.0))]
    Validation(Vec<FieldViolation>),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl RunError {
    /// Short taxonomy tag, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Lookup(_) => "lookup",
        }
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
