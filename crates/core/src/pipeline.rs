//! End-to-end batch processing: validate, calculate, aggregate, persist.
//!
//! Run-level failures are values ([`RunOutcome::Rejected`]) and never abort
//! the batch. File-level failures and an empty result set do.

use std::path::Path;

use crate::aggregation::{aggregate, BatchTotals};
use crate::calculator::{calculate, EmissionsResult};
use crate::error::{CoreError, RunError};
use crate::persistence::{append_results, AppendSummary};
use crate::reference::{InputPaths, ReferenceData};
use crate::run::{display_name, load_run_batch};
use crate::validation::parse_run;

/// A run that was skipped, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRun {
    /// 1-based position of the run in the input batch.
    pub position: usize,
    pub run_name: Option<String>,
    pub error: RunError,
}

/// The result of processing one run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Calculated(EmissionsResult),
    Rejected(RejectedRun),
}

/// Per-run outcomes of one batch, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    pub outcomes: Vec<RunOutcome>,
}

impl BatchOutcome {
    /// Successful results, in input order.
    pub fn results(&self) -> Vec<&EmissionsResult> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                RunOutcome::Calculated(result) => Some(result),
                RunOutcome::Rejected(_) => None,
            })
            .collect()
    }

    /// Skipped runs, in input order.
    pub fn rejected(&self) -> Vec<&RejectedRun> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                RunOutcome::Rejected(rejected) => Some(rejected),
                RunOutcome::Calculated(_) => None,
            })
            .collect()
    }

    /// Consume the outcome, keeping only the successful results.
    pub fn into_results(self) -> Vec<EmissionsResult> {
        self.outcomes
            .into_iter()
            .filter_map(|o| match o {
                RunOutcome::Calculated(result) => Some(result),
                RunOutcome::Rejected(_) => None,
            })
            .collect()
    }
}

/// Validate and calculate one raw run entry.
pub fn process_run(position: usize, value: &serde_json::Value, refs: &ReferenceData) -> RunOutcome {
    let run_name = display_name(value).map(str::to_string);
    let reject = |error: RunError| {
        tracing::warn!(
            position,
            run_name = run_name.as_deref().unwrap_or("unnamed"),
            kind = error.kind(),
            error = %error,
            "Skipping run",
        );
        RunOutcome::Rejected(RejectedRun {
            position,
            run_name: run_name.clone(),
            error,
        })
    };

    let run = match parse_run(value) {
        Ok(run) => run,
        Err(violations) => return reject(RunError::Validation(violations)),
    };

    match calculate(&run, refs) {
        Ok(result) => {
            tracing::info!(
                position,
                run_name = %result.run_name,
                emissions_kg_co2 = result.emissions_kg_co2,
                "Calculated run",
            );
            RunOutcome::Calculated(result)
        }
        Err(e) => reject(RunError::Lookup(e)),
    }
}

/// Process every run in input order.
pub fn process_batch(runs: &[serde_json::Value], refs: &ReferenceData) -> BatchOutcome {
    let outcomes = runs
        .iter()
        .enumerate()
        .map(|(i, value)| process_run(i + 1, value, refs))
        .collect();
    BatchOutcome { outcomes }
}

/// Everything a completed pipeline invocation produced.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub outcome: BatchOutcome,
    pub totals: BatchTotals,
    pub append: AppendSummary,
}

/// Load inputs, process the batch and append the results to `output`.
///
/// Nothing is written unless at least one run produced a result.
pub fn run_pipeline(inputs: &InputPaths, output: &Path) -> Result<PipelineReport, CoreError> {
    let refs = ReferenceData::load(&inputs.gpu_specs, &inputs.carbon_intensity)?;
    let runs = load_run_batch(&inputs.parameters)?;
    tracing::info!(runs = runs.len(), "Processing training runs");

    let outcome = process_batch(&runs, &refs);
    let results: Vec<EmissionsResult> = outcome.results().into_iter().cloned().collect();
    let totals = aggregate(&results)?;

    let append = append_results(&results, output)?;
    tracing::info!(
        path = %output.display(),
        rows = append.rows_written,
        skipped = outcome.rejected().len(),
        "Saved emissions results",
    );

    Ok(PipelineReport {
        outcome,
        totals,
        append,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;
    use crate::error::LookupError;
    use crate::reference::{CarbonIntensity, GpuSpec};
    use crate::validation::ViolationKind;

    fn refs() -> ReferenceData {
        let mut refs = ReferenceData::default();
        refs.gpu_specs.insert("A100".into(), GpuSpec::new(400));
        refs.carbon_intensity
            .insert("us-east-1".into(), CarbonIntensity::new(0.4));
        refs
    }

    fn run(name: &str) -> serde_json::Value {
        json!({
            "run_name": name,
            "gpu_model": "A100",
            "gpu_count": 8,
            "duration_hours": 10,
            "utilization": 0.9,
            "region": "us-east-1",
            "pue": 1.2
        })
    }

    #[test]
    fn valid_run_is_calculated() {
        let outcome = process_run(1, &run("ok"), &refs());
        assert_matches!(outcome, RunOutcome::Calculated(ref r) if r.run_name == "ok");
    }

    #[test]
    fn invalid_run_is_rejected_with_violations() {
        let mut value = run("bad");
        value["pue"] = json!(0.5);
        let outcome = process_run(3, &value, &refs());
        assert_matches!(
            outcome,
            RunOutcome::Rejected(RejectedRun { position: 3, error: RunError::Validation(ref v), .. })
                if v.len() == 1 && v[0].kind == ViolationKind::OutOfRange
        );
    }

    #[test]
    fn unknown_region_is_rejected_as_lookup() {
        let mut value = run("far");
        value["region"] = json!("mars-1");
        let outcome = process_run(1, &value, &refs());
        assert_matches!(
            outcome,
            RunOutcome::Rejected(RejectedRun {
                error: RunError::Lookup(LookupError::UnknownRegion { .. }),
                ..
            })
        );
    }

    #[test]
    fn rejected_run_without_name_keeps_position() {
        let outcome = process_run(2, &json!({}), &refs());
        assert_matches!(
            outcome,
            RunOutcome::Rejected(RejectedRun { position: 2, run_name: None, .. })
        );
    }

    #[test]
    fn batch_keeps_input_order_and_continues_past_failures() {
        let mut unknown_gpu = run("second");
        unknown_gpu["gpu_model"] = json!("B200");
        let runs = vec![run("first"), unknown_gpu, json!(null), run("fourth")];

        let outcome = process_batch(&runs, &refs());
        assert_eq!(outcome.outcomes.len(), 4);

        let names: Vec<&str> = outcome.results().iter().map(|r| r.run_name.as_str()).collect();
        assert_eq!(names, vec!["first", "fourth"]);

        let positions: Vec<usize> = outcome.rejected().iter().map(|r| r.position).collect();
        assert_eq!(positions, vec![2, 3]);
    }

    #[test]
    fn into_results_drops_rejections() {
        let runs = vec![run("a"), json!({"run_name": "b"}), run("c")];
        let results = process_batch(&runs, &refs()).into_results();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].run_name, "c");
    }
}
