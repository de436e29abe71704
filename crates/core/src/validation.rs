//! Run validation.
//!
//! Presence of every required field is checked first; if anything is missing
//! only the missing-field violations are returned. Otherwise every range
//! check runs and all violations are reported together.

use serde::{Deserialize, Serialize};

use crate::run::{RunDescriptor, RunDraft, REQUIRED_FIELDS};

/// Pseudo field name used when a run entry cannot be read at all.
pub const MALFORMED_FIELD: &str = "malformed";

/// Category of a single violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Missing,
    OutOfRange,
    Malformed,
}

/// A single field-level violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub kind: ViolationKind,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &str, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            kind,
            message: message.into(),
        }
    }

    fn missing(field: &str) -> Self {
        Self::new(
            field,
            ViolationKind::Missing,
            format!("Missing required field '{field}'"),
        )
    }

    fn out_of_range(field: &str, message: String) -> Self {
        Self::new(field, ViolationKind::OutOfRange, message)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check a draft run. Returns an empty vector when the run is valid.
pub fn validate(draft: &RunDraft) -> Vec<FieldViolation> {
    let missing: Vec<FieldViolation> = REQUIRED_FIELDS
        .iter()
        .filter(|field| !is_present(draft, field))
        .map(|field| FieldViolation::missing(field))
        .collect();
    if !missing.is_empty() {
        return missing;
    }

    let mut violations = Vec::new();

    if let Some(utilization) = draft.utilization {
        if !(0.0..=1.0).contains(&utilization) {
            violations.push(FieldViolation::out_of_range(
                "utilization",
                format!("Utilization must be between 0 and 1 (got {utilization})"),
            ));
        }
    }

    if let Some(duration) = draft.duration_hours {
        if duration <= 0.0 {
            violations.push(FieldViolation::out_of_range(
                "duration_hours",
                format!("Duration must be greater than 0 (got {duration})"),
            ));
        }
    }

    if let Some(count) = draft.gpu_count {
        if count <= 0 {
            violations.push(FieldViolation::out_of_range(
                "gpu_count",
                format!("GPU count must be greater than 0 (got {count})"),
            ));
        }
    }

    if let Some(pue) = draft.pue {
        if pue < 1.0 {
            violations.push(FieldViolation::out_of_range(
                "pue",
                format!("PUE must be >= 1.0 (got {pue})"),
            ));
        }
    }

    if draft.run_name.as_deref().is_some_and(|name| name.trim().is_empty()) {
        violations.push(FieldViolation::out_of_range(
            "run_name",
            "Run name must not be empty".to_string(),
        ));
    }

    violations
}

fn is_present(draft: &RunDraft, field: &str) -> bool {
    match field {
        "run_name" => draft.run_name.is_some(),
        "gpu_model" => draft.gpu_model.is_some(),
        "gpu_count" => draft.gpu_count.is_some(),
        "duration_hours" => draft.duration_hours.is_some(),
        "utilization" => draft.utilization.is_some(),
        "region" => draft.region.is_some(),
        "pue" => draft.pue.is_some(),
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

impl TryFrom<RunDraft> for RunDescriptor {
    type Error = Vec<FieldViolation>;

    fn try_from(draft: RunDraft) -> Result<Self, Self::Error> {
        let violations = validate(&draft);
        if !violations.is_empty() {
            return Err(violations);
        }
        match draft {
            RunDraft {
                run_name: Some(run_name),
                gpu_model: Some(gpu_model),
                gpu_count: Some(gpu_count),
                duration_hours: Some(duration_hours),
                utilization: Some(utilization),
                region: Some(region),
                pue: Some(pue),
            } => Ok(RunDescriptor {
                run_name,
                gpu_model,
                gpu_count: gpu_count.unsigned_abs(),
                duration_hours,
                utilization,
                region,
                pue,
            }),
            // Unreachable after a clean presence check.
            _ => Err(vec![FieldViolation::new(
                MALFORMED_FIELD,
                ViolationKind::Malformed,
                "Run is incomplete",
            )]),
        }
    }
}

/// Read one raw batch entry into a validated [`RunDescriptor`].
///
/// Entries that are not JSON objects, or whose fields have the wrong JSON
/// type, yield a single [`ViolationKind::Malformed`] violation.
pub fn parse_run(value: &serde_json::Value) -> Result<RunDescriptor, Vec<FieldViolation>> {
    if !value.is_object() {
        return Err(vec![FieldViolation::new(
            MALFORMED_FIELD,
            ViolationKind::Malformed,
            "Run entry must be a JSON object",
        )]);
    }
    let draft = RunDraft::deserialize(value).map_err(|e| {
        vec![FieldViolation::new(
            MALFORMED_FIELD,
            ViolationKind::Malformed,
            format!("Run entry has a field of the wrong type: {e}"),
        )]
    })?;
    RunDescriptor::try_from(draft)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn valid_draft() -> RunDraft {
        RunDraft {
            run_name: Some("bert-pretrain".into()),
            gpu_model: Some("A100".into()),
            gpu_count: Some(8),
            duration_hours: Some(10.0),
            utilization: Some(0.9),
            region: Some("us-east-1".into()),
            pue: Some(1.2),
        }
    }

    fn fields(violations: &[FieldViolation]) -> Vec<&str> {
        violations.iter().map(|v| v.field.as_str()).collect()
    }

    // -- presence --

    #[test]
    fn valid_draft_has_no_violations() {
        assert!(validate(&valid_draft()).is_empty());
    }

    #[test]
    fn missing_fields_are_reported_in_required_order() {
        let draft = RunDraft {
            pue: None,
            gpu_model: None,
            ..valid_draft()
        };
        let violations = validate(&draft);
        assert_eq!(fields(&violations), vec!["gpu_model", "pue"]);
        assert!(violations.iter().all(|v| v.kind == ViolationKind::Missing));
        assert_eq!(violations[0].message, "Missing required field 'gpu_model'");
    }

    #[test]
    fn missing_field_skips_range_checks() {
        let draft = RunDraft {
            region: None,
            utilization: Some(1.5),
            pue: Some(0.5),
            ..valid_draft()
        };
        assert_eq!(fields(&validate(&draft)), vec!["region"]);
    }

    #[test]
    fn empty_draft_reports_all_seven_fields() {
        let violations = validate(&RunDraft::default());
        assert_eq!(fields(&violations), REQUIRED_FIELDS.to_vec());
    }

    // -- ranges --

    #[test]
    fn rejects_utilization_above_one() {
        let draft = RunDraft {
            utilization: Some(1.5),
            ..valid_draft()
        };
        let violations = validate(&draft);
        assert_eq!(fields(&violations), vec!["utilization"]);
        assert_eq!(
            violations[0].message,
            "Utilization must be between 0 and 1 (got 1.5)"
        );
    }

    #[test]
    fn rejects_zero_duration() {
        let draft = RunDraft {
            duration_hours: Some(0.0),
            ..valid_draft()
        };
        let violations = validate(&draft);
        assert_eq!(fields(&violations), vec!["duration_hours"]);
        assert_eq!(violations[0].message, "Duration must be greater than 0 (got 0)");
    }

    #[test]
    fn rejects_zero_gpu_count() {
        let draft = RunDraft {
            gpu_count: Some(0),
            ..valid_draft()
        };
        let violations = validate(&draft);
        assert_eq!(fields(&violations), vec!["gpu_count"]);
        assert_eq!(violations[0].message, "GPU count must be greater than 0 (got 0)");
    }

    #[test]
    fn rejects_pue_below_one() {
        let draft = RunDraft {
            pue: Some(0.5),
            ..valid_draft()
        };
        let violations = validate(&draft);
        assert_eq!(fields(&violations), vec!["pue"]);
        assert_eq!(violations[0].message, "PUE must be >= 1.0 (got 0.5)");
    }

    #[test]
    fn collects_every_range_violation() {
        let draft = RunDraft {
            utilization: Some(1.5),
            duration_hours: Some(0.0),
            gpu_count: Some(0),
            pue: Some(0.5),
            ..valid_draft()
        };
        let violations = validate(&draft);
        assert_eq!(
            fields(&violations),
            vec!["utilization", "duration_hours", "gpu_count", "pue"]
        );
        let messages: std::collections::HashSet<_> =
            violations.iter().map(|v| v.message.as_str()).collect();
        assert_eq!(messages.len(), 4);
    }

    #[test]
    fn accepts_boundary_values() {
        for utilization in [0.0, 1.0] {
            let draft = RunDraft {
                utilization: Some(utilization),
                pue: Some(1.0),
                gpu_count: Some(1),
                ..valid_draft()
            };
            assert!(validate(&draft).is_empty(), "utilization {utilization}");
        }
    }

    #[test]
    fn rejects_negative_utilization() {
        let draft = RunDraft {
            utilization: Some(-0.01),
            ..valid_draft()
        };
        assert_eq!(fields(&validate(&draft)), vec!["utilization"]);
    }

    #[test]
    fn rejects_blank_run_name() {
        let draft = RunDraft {
            run_name: Some("  ".into()),
            ..valid_draft()
        };
        assert_eq!(fields(&validate(&draft)), vec!["run_name"]);
    }

    // -- parsing --

    #[test]
    fn parse_run_builds_descriptor() {
        let run = parse_run(&json!({
            "run_name": "bert-pretrain",
            "gpu_model": "A100",
            "gpu_count": 8,
            "duration_hours": 10,
            "utilization": 0.9,
            "region": "us-east-1",
            "pue": 1.2
        }))
        .expect("valid run");
        assert_eq!(run.gpu_count, 8);
        assert_eq!(run.duration_hours, 10.0);
        assert_eq!(run.region, "us-east-1");
    }

    #[test]
    fn parse_run_rejects_non_object() {
        let violations = parse_run(&json!("not a run")).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::Malformed);
    }

    #[test]
    fn parse_run_rejects_wrong_field_type() {
        let violations = parse_run(&json!({
            "run_name": "typo",
            "gpu_model": "A100",
            "gpu_count": "eight",
            "duration_hours": 10,
            "utilization": 0.9,
            "region": "us-east-1",
            "pue": 1.2
        }))
        .unwrap_err();
        assert_eq!(fields(&violations), vec![MALFORMED_FIELD]);
        assert!(violations[0].message.contains("wrong type"));
    }
}
