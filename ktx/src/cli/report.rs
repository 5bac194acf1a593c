// ktx/src/cli/report.rs
//! Contains the logic for reporting a build and for the `--dry-run` preview.
use std::path::PathBuf;

use ktx_common::error::Result;
use ktx_common::{CiEnvironment, Config};
use ktx_core::{preview_build, report_build, PatternExpander};
use ktx_net::KetryxClient;
use tracing::{debug, info};

use crate::cli::inputs::InputArgs;
use crate::output::{self, RunOutputs};

/// Uploads evidence, registers the build and publishes the step outputs.
///
/// Returns `Ok(false)` when the service rejected the build. Fatal errors still
/// publish `ok=false` before being returned.
pub async fn run_report(inputs: &InputArgs, root: PathBuf) -> Result<bool> {
    let outputs = match report(inputs, root).await {
        Ok(outputs) => outputs,
        Err(e) => {
            if let Err(publish_err) = output::publish(&RunOutputs::failed(&e)) {
                debug!("Could not publish failure outputs: {}", publish_err);
            }
            return Err(e);
        }
    };

    output::publish(&outputs)?;
    output::print_summary(&outputs);
    Ok(outputs.ok)
}

async fn report(inputs: &InputArgs, root: PathBuf) -> Result<RunOutputs> {
    let ci = CiEnvironment::from_env();
    let config = Config::from_inputs(inputs.to_raw_inputs(), &ci)?;
    debug!("Resolved configuration: {:?}", config);

    let expander = PatternExpander::new(root);
    let client = KetryxClient::new(&config)?;
    let outcome = report_build(&config, &ci, &expander, &client, &client).await?;

    if outcome.ok {
        info!(
            "Reported build {} to Ketryx",
            outcome.build_id.as_deref().unwrap_or("(no id)")
        );
    }
    Ok(RunOutputs::from_outcome(&outcome, &config.ketryx_url))
}

/// Prints the manifest that would have been submitted. Nothing leaves the
/// machine and no outputs are published.
pub async fn run_dry_run(inputs: &InputArgs, root: PathBuf) -> Result<()> {
    let ci = CiEnvironment::from_env();
    let config = Config::from_inputs(inputs.to_raw_inputs(), &ci)?;
    info!("Dry run: no files will be uploaded and no build will be registered");

    let manifest = preview_build(&config, &ci, &PatternExpander::new(root)).await?;
    println!("{}", serde_json::to_string_pretty(&manifest)?);
    Ok(())
}
