//! Console reports for the `calculate` and `update` commands.
//!
//! Rendering is kept apart from printing so the text can be tested.

use std::fmt::Write as _;
use std::path::Path;

use trainco2_core::calculator::round_to;
use trainco2_core::{BatchTotals, EmissionsResult, RejectedRun};
use trainco2_refdata::GpuUpdateReport;

const RULE_WIDTH: usize = 80;
const SUMMARY_DECIMALS: i32 = 4;

/// A full-width `=` banner around `title`.
pub fn banner(title: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("{rule}\n{title}\n{rule}\n")
}

/// Per-run details followed by batch totals.
pub fn render_summary(results: &[EmissionsResult], totals: &BatchTotals) -> String {
    let mut out = banner("ML TRAINING EMISSIONS CALCULATION RESULTS");
    out.push('\n');

    for (i, r) in results.iter().enumerate() {
        let _ = writeln!(out, "Run {}: {}", i + 1, r.run_name);
        let _ = writeln!(out, "  GPU: {}x {}", r.gpu_count, r.gpu_model);
        let _ = writeln!(
            out,
            "  Duration: {} hours @ {}% utilization",
            r.duration_hours,
            round_to(r.utilization * 100.0, 2)
        );
        let _ = writeln!(
            out,
            "  Region: {} (Carbon intensity: {} kg CO₂/kWh)",
            r.region, r.carbon_intensity_kg_co2_kwh
        );
        let _ = writeln!(out, "  PUE: {}", r.pue);
        let _ = writeln!(out, "  Energy (GPU only): {} kWh", r.energy_gpu_kwh);
        let _ = writeln!(out, "  Energy (Total with PUE): {} kWh", r.energy_total_kwh);
        let _ = writeln!(out, "  Emissions: {} kg CO₂", r.emissions_kg_co2);
        out.push('\n');
    }

    out.push_str(&"-".repeat(RULE_WIDTH));
    out.push('\n');
    out.push_str("TOTAL ACROSS ALL RUNS:\n");
    let _ = writeln!(
        out,
        "  Total Energy: {} kWh",
        round_to(totals.total_energy_kwh, SUMMARY_DECIMALS)
    );
    let _ = writeln!(
        out,
        "  Total Emissions: {} kg CO₂",
        round_to(totals.total_emissions_kg_co2, SUMMARY_DECIMALS)
    );
    let _ = writeln!(
        out,
        "  Equivalent to: {} metric tons CO₂",
        round_to(totals.total_emissions_metric_tons, SUMMARY_DECIMALS)
    );
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');
    out
}

/// One line per skipped run with its reason.
pub fn render_rejected(rejected: &[&RejectedRun]) -> String {
    let mut out = String::new();
    for run in rejected {
        let _ = writeln!(
            out,
            "Skipped run {} ({}): {}",
            run.position,
            run.run_name.as_deref().unwrap_or("unnamed"),
            run.error
        );
    }
    out
}

/// What a GPU specification refresh found and did to `path`.
pub fn render_update_report(report: &GpuUpdateReport, path: &Path) -> String {
    let mut out = String::new();

    if report.current_file_found {
        let _ = writeln!(out, "Loaded {} current GPU models", report.current_count);
    } else {
        let _ = writeln!(out, "{} not found, will create new file", path.display());
    }
    let _ = writeln!(out, "Fetched data for {} GPUs", report.catalog_count);
    let _ = writeln!(
        out,
        "Extracted {} NVIDIA datacenter GPUs",
        report.extracted.len()
    );

    let diff = &report.diff;
    let _ = writeln!(out, "\nNew GPUs: {}", diff.added.len());
    for (model, tdp) in &diff.added {
        let _ = writeln!(out, "  + {model}: {tdp}W");
    }
    let _ = writeln!(out, "\nUpdated GPUs: {}", diff.updated.len());
    for change in &diff.updated {
        let old = change
            .old_tdp_watts
            .map_or_else(|| "?".to_string(), |w| w.to_string());
        let _ = writeln!(out, "  • {}: {old}W → {}W", change.model, change.new_tdp_watts);
    }
    let _ = writeln!(out, "\nUnchanged GPUs: {}", diff.unchanged.len());
    if !diff.has_changes() {
        out.push_str("No changes detected\n");
    }

    if !report.written() {
        out.push_str("\n[DRY RUN] No changes written to disk\n");
        let _ = writeln!(out, "Would update {}", path.display());
        return out;
    }

    out.push('\n');
    if let Some(backup) = &report.backup {
        let _ = writeln!(out, "Created backup: {}", backup.display());
    }
    let _ = writeln!(out, "Updated {}", path.display());
    let _ = writeln!(out, "Total GPUs in database: {}", report.merged_count);
    out
}
