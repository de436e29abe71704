use anyhow::Context;
use trainco2_core::run_pipeline;

use crate::cli::CalculateArgs;
use crate::config::AppConfig;
use crate::report::{render_rejected, render_summary};

/// Process the run batch, append the results and print the summary.
pub fn execute(args: &CalculateArgs, config: &AppConfig) -> anyhow::Result<bool> {
    let inputs = args.inputs(config);
    let output = args.output(config);

    tracing::info!(
        gpu_specs = %inputs.gpu_specs.display(),
        carbon_intensity = %inputs.carbon_intensity.display(),
        parameters = %inputs.parameters.display(),
        "Loading configuration files",
    );

    let report = run_pipeline(&inputs, &output)
        .with_context(|| format!("emissions calculation for '{}'", inputs.parameters.display()))?;

    let rejected = report.outcome.rejected();
    if !rejected.is_empty() {
        eprint!("{}", render_rejected(&rejected));
    }

    let results: Vec<_> = report.outcome.results().into_iter().cloned().collect();
    println!(
        "Saved {} result(s) to {}\n",
        report.append.rows_written,
        output.display()
    );
    print!("{}", render_summary(&results, &report.totals));

    Ok(true)
}
