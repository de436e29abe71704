use clap::CommandFactory;
use trainco2_refdata::{render_carbon_guidance, update_gpu_specs, HttpCatalogSource};

use crate::cli::{Cli, UpdateArgs};
use crate::config::AppConfig;
use crate::report::{banner, render_update_report};

/// Refresh the selected reference data.
///
/// Reports failure when the GPU refresh was requested and failed. Carbon
/// guidance is informational and never fails.
pub async fn execute(args: &UpdateArgs, config: &AppConfig) -> anyhow::Result<bool> {
    if !args.has_target() {
        let mut command = Cli::command();
        if let Some(update) = command.find_subcommand_mut("update") {
            update.print_help()?;
        }
        return Ok(true);
    }

    let mut succeeded = true;

    if args.update_gpu() {
        println!("{}", banner("UPDATING GPU SPECIFICATIONS"));
        succeeded &= update_gpu(args, config).await;
    }

    if args.show_carbon_guidance() {
        println!("\n{}", banner("CARBON INTENSITY DATA UPDATE GUIDANCE"));
        print!("{}", render_carbon_guidance());
    }

    let footer = if succeeded {
        "✓ Data source update completed successfully"
    } else {
        "✗ Data source update encountered errors"
    };
    println!("\n{}", banner(footer));

    Ok(succeeded)
}

async fn update_gpu(args: &UpdateArgs, config: &AppConfig) -> bool {
    let path = args.gpu_specs(config);

    let source = match HttpCatalogSource::new(config.gpu_data_url.as_str()) {
        Ok(source) => source,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build HTTP client");
            eprintln!("✗ {e}");
            return false;
        }
    };

    println!("Fetching GPU data from {}", config.gpu_data_url);
    match update_gpu_specs(&source, &path, args.dry_run).await {
        Ok(report) => {
            print!("{}", render_update_report(&report, &path));
            true
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "GPU specification update failed");
            eprintln!("✗ {e}");
            false
        }
    }
}
