//! Run descriptors: one per training run to evaluate.
//!
//! A run is read from JSON as a [`RunDraft`] in which every field is
//! optional. Only [`crate::validation::parse_run`] turns a draft into a
//! [`RunDescriptor`], so a descriptor always holds a complete, in-range run.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::reference::read_json;

/// Default run batch file name.
pub const PARAMETERS_FILE: &str = "parameters.json";

/// Key of the run list inside the batch file.
pub const RUNS_KEY: &str = "runs";

/// Fields every run must carry, in the order presence is checked.
pub const REQUIRED_FIELDS: [&str; 7] = [
    "run_name",
    "gpu_model",
    "gpu_count",
    "duration_hours",
    "utilization",
    "region",
    "pue",
];

/// A run as declared in the batch file, before validation.
///
/// `null` and absent fields both deserialize to `None`. Unknown fields are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunDraft {
    pub run_name: Option<String>,
    pub gpu_model: Option<String>,
    pub gpu_count: Option<i64>,
    pub duration_hours: Option<f64>,
    pub utilization: Option<f64>,
    pub region: Option<String>,
    pub pue: Option<f64>,
}

/// A fully validated training run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunDescriptor {
    pub run_name: String,
    pub gpu_model: String,
    pub gpu_count: u64,
    pub duration_hours: f64,
    /// Fraction of TDP drawn on average, in `[0, 1]`.
    pub utilization: f64,
    pub region: String,
    /// Power usage effectiveness of the datacenter, `>= 1.0`.
    pub pue: f64,
}

/// Load the ordered run list from a batch file.
///
/// Entries are returned as raw JSON so that one malformed run does not stop
/// the others from being read.
pub fn load_run_batch(path: &Path) -> Result<Vec<serde_json::Value>, CoreError> {
    let mut root: serde_json::Value = read_json(path)?;
    let runs = root
        .get_mut(RUNS_KEY)
        .map(serde_json::Value::take)
        .ok_or_else(|| CoreError::config(path, format!("'{RUNS_KEY}' key not found")))?;
    match runs {
        serde_json::Value::Array(items) => {
            tracing::debug!(path = %path.display(), runs = items.len(), "Loaded run batch");
            Ok(items)
        }
        _ => Err(CoreError::config(
            path,
            format!("'{RUNS_KEY}' must be a list of run objects"),
        )),
    }
}

/// Best-effort run name for diagnostics, available even for malformed runs.
pub fn display_name(value: &serde_json::Value) -> Option<&str> {
    value.get("run_name").and_then(serde_json::Value::as_str)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn write_batch(body: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(PARAMETERS_FILE);
        std::fs::write(&path, body).expect("write batch");
        (dir, path)
    }

    #[test]
    fn loads_runs_in_order() {
        let (_dir, path) = write_batch(
            r#"{"runs": [{"run_name": "first"}, {"run_name": "second"}, 42]}"#,
        );
        let runs = load_run_batch(&path).expect("load batch");
        assert_eq!(runs.len(), 3);
        assert_eq!(display_name(&runs[0]), Some("first"));
        assert_eq!(display_name(&runs[1]), Some("second"));
        assert_eq!(display_name(&runs[2]), None);
    }

    #[test]
    fn missing_runs_key_is_config_error() {
        let (_dir, path) = write_batch(r#"{"jobs": []}"#);
        let err = load_run_batch(&path).unwrap_err();
        assert_matches!(err, CoreError::Config { ref message, .. } if message == "'runs' key not found");
    }

    #[test]
    fn runs_must_be_a_list() {
        let (_dir, path) = write_batch(r#"{"runs": {"run_name": "x"}}"#);
        assert_matches!(load_run_batch(&path), Err(CoreError::Config { .. }));
    }

    #[test]
    fn empty_run_list_loads() {
        let (_dir, path) = write_batch(r#"{"runs": []}"#);
        assert!(load_run_batch(&path).expect("load batch").is_empty());
    }

    #[test]
    fn draft_treats_null_as_absent_and_ignores_unknown_fields() {
        let draft: RunDraft = serde_json::from_value(json!({
            "run_name": "llama-ft",
            "gpu_model": null,
            "notes": "ignored"
        }))
        .expect("deserialize draft");
        assert_eq!(draft.run_name.as_deref(), Some("llama-ft"));
        assert_eq!(draft.gpu_model, None);
        assert_eq!(draft.gpu_count, None);
    }
}
