//! Tests for the console report rendering.

use std::path::{Path, PathBuf};

use chrono::{TimeZone, Utc};
use trainco2_cli::report::{render_rejected, render_summary, render_update_report};
use trainco2_core::error::{LookupError, RunError};
use trainco2_core::reference::GpuSpec;
use trainco2_core::{aggregate, EmissionsResult, RejectedRun};
use trainco2_refdata::{CatalogSpecs, GpuUpdateReport, SpecDiff, TdpChange};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn result(name: &str, energy_total_kwh: f64, emissions_kg_co2: f64) -> EmissionsResult {
    EmissionsResult {
        run_name: name.into(),
        timestamp: Utc.with_ymd_and_hms(2025, 11, 3, 9, 30, 0).unwrap(),
        gpu_model: "A100".into(),
        gpu_count: 8,
        duration_hours: 10.0,
        utilization: 0.9,
        region: "us-east-1".into(),
        carbon_intensity_kg_co2_kwh: 0.4,
        pue: 1.2,
        energy_gpu_kwh: 28.8,
        energy_total_kwh,
        emissions_kg_co2,
    }
}

fn update_report(dry_run: bool, backup: Option<PathBuf>) -> GpuUpdateReport {
    let mut extracted = CatalogSpecs::new();
    extracted.insert("A100".into(), GpuSpec::new(250));
    extracted.insert("L4".into(), GpuSpec::new(72));
    GpuUpdateReport {
        current_file_found: true,
        current_count: 2,
        catalog_count: 40,
        extracted,
        diff: SpecDiff {
            added: vec![("L4".into(), 72)],
            updated: vec![TdpChange {
                model: "A100".into(),
                old_tdp_watts: Some(400),
                new_tdp_watts: 250,
            }],
            unchanged: vec![],
        },
        merged_count: 3,
        dry_run,
        backup,
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[test]
fn summary_lists_each_run_in_order() {
    let results = vec![result("bert", 34.56, 13.824), result("gpt", 6.16, 0.0493)];
    let totals = aggregate(&results).expect("totals");

    let text = render_summary(&results, &totals);

    let bert = text.find("Run 1: bert").expect("first run");
    let gpt = text.find("Run 2: gpt").expect("second run");
    assert!(bert < gpt);
    assert!(text.contains("  GPU: 8x A100\n"));
    assert!(text.contains("  Duration: 10 hours @ 90% utilization\n"));
    assert!(text.contains("  Region: us-east-1 (Carbon intensity: 0.4 kg CO₂/kWh)\n"));
    assert!(text.contains("  PUE: 1.2\n"));
    assert!(text.contains("  Energy (GPU only): 28.8 kWh\n"));
    assert!(text.contains("  Energy (Total with PUE): 34.56 kWh\n"));
    assert!(text.contains("  Emissions: 13.824 kg CO₂\n"));
}

#[test]
fn summary_totals_are_rounded_to_four_places() {
    let results = vec![result("bert", 34.56, 13.824), result("gpt", 6.16, 0.0493)];
    let totals = aggregate(&results).expect("totals");

    let text = render_summary(&results, &totals);

    assert!(text.contains("TOTAL ACROSS ALL RUNS:"));
    assert!(text.contains("  Total Energy: 40.72 kWh\n"));
    assert!(text.contains("  Total Emissions: 13.8733 kg CO₂\n"));
    assert!(text.contains("  Equivalent to: 0.0139 metric tons CO₂\n"));
}

#[test]
fn rejected_runs_name_position_and_reason() {
    let rejected = RejectedRun {
        position: 3,
        run_name: None,
        error: RunError::Lookup(LookupError::UnknownRegion {
            region: "mars-1".into(),
            table: PathBuf::from("data/carbon_intensity.json"),
            available: vec!["us-east-1".into()],
        }),
    };

    let text = render_rejected(&[&rejected]);

    assert!(text.starts_with("Skipped run 3 (unnamed): "));
    assert!(text.contains("mars-1"));
}

// ---------------------------------------------------------------------------
// Update report
// ---------------------------------------------------------------------------

#[test]
fn update_report_lists_changes() {
    let text = render_update_report(&update_report(false, None), Path::new("data/gpu_specs.json"));

    assert!(text.contains("Loaded 2 current GPU models"));
    assert!(text.contains("Fetched data for 40 GPUs"));
    assert!(text.contains("Extracted 2 NVIDIA datacenter GPUs"));
    assert!(text.contains("New GPUs: 1\n  + L4: 72W\n"));
    assert!(text.contains("Updated GPUs: 1\n  • A100: 400W → 250W\n"));
    assert!(text.contains("Unchanged GPUs: 0"));
    assert!(text.contains("Updated data/gpu_specs.json"));
    assert!(text.contains("Total GPUs in database: 3"));
}

#[test]
fn update_report_mentions_backup() {
    let backup = PathBuf::from("data/gpu_specs.json.backup_20251103_093000");
    let text = render_update_report(
        &update_report(false, Some(backup)),
        Path::new("data/gpu_specs.json"),
    );
    assert!(text.contains("Created backup: data/gpu_specs.json.backup_20251103_093000"));
}

#[test]
fn dry_run_report_does_not_claim_a_write() {
    let text = render_update_report(&update_report(true, None), Path::new("data/gpu_specs.json"));

    assert!(text.contains("[DRY RUN] No changes written to disk"));
    assert!(text.contains("Would update data/gpu_specs.json"));
    assert!(!text.contains("Total GPUs in database"));
}

#[test]
fn update_report_says_when_nothing_changed() {
    let mut report = update_report(false, None);
    report.diff = SpecDiff {
        added: vec![],
        updated: vec![],
        unchanged: vec!["A100".into(), "L4".into()],
    };

    let text = render_update_report(&report, Path::new("data/gpu_specs.json"));

    assert!(text.contains("Unchanged GPUs: 2\nNo changes detected\n"));
    assert!(text.contains("Updated data/gpu_specs.json"));
}

#[test]
fn changed_report_does_not_claim_no_changes() {
    let text = render_update_report(&update_report(false, None), Path::new("data/gpu_specs.json"));
    assert!(!text.contains("No changes detected"));
}
