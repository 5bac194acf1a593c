// ktx-core/src/report.rs
use ktx_common::ci::CiEnvironment;
use ktx_common::config::Config;
use ktx_common::error::Result;
use ktx_common::model::{BuildManifest, BuildOutcome};
use ktx_net::{ArtifactUploader, BuildSubmitter};
use tracing::{debug, info};

use crate::assemble::{assemble_manifest, AssembledManifest};
use crate::dry_run::DryRunUploader;
use crate::expand::PatternExpander;

/// Combines assembled artifacts and tests with the run's metadata.
///
/// `commitSha` is dropped whenever a version is given, and a synchronous
/// repository update is requested whenever a compliance check is.
pub fn build_manifest(config: &Config, ci: &CiEnvironment, assembled: AssembledManifest) -> BuildManifest {
    let commit_sha = match (&config.version, &config.commit_sha) {
        (Some(version), Some(sha)) => {
            debug!("Version {} given, not sending commit {}", version, sha);
            None
        }
        (_, sha) => sha.clone(),
    };

    BuildManifest {
        project: config.project.clone(),
        version: config.version.clone(),
        commit_sha,
        build_name: config.build_name.clone(),
        log: config.log.clone(),
        source_url: ci.run_url.clone(),
        repository_urls: ci.repository_url.clone().map(|url| vec![url]),
        // The service has to index the current commit before it can evaluate
        // dependency or release status for it.
        sync_repository_update: Some(config.requests_compliance_checks()),
        check_dependencies_status: Some(config.check_dependencies_status),
        check_release_status: Some(config.check_release_status),
        artifacts: assembled.artifacts,
        tests: assembled.tests,
    }
}

/// Uploads all evidence, then registers the build.
///
/// Nothing is submitted unless every upload succeeded.
pub async fn report_build<U, S>(
    config: &Config,
    ci: &CiEnvironment,
    expander: &PatternExpander,
    uploader: &U,
    submitter: &S,
) -> Result<BuildOutcome>
where
    U: ArtifactUploader + ?Sized,
    S: BuildSubmitter + ?Sized,
{
    if let Some(number) = ci.change_request_number {
        info!("Reporting build for change request #{}", number);
    }

    let assembled = assemble_manifest(config, expander, uploader).await?;
    let manifest = build_manifest(config, ci, assembled);

    info!(
        "Registering build with {} artifact(s) and {} test(s)",
        manifest.artifacts.len(),
        manifest.tests.len()
    );
    let outcome = submitter.submit(&manifest).await?;
    debug!("Build outcome: {:?}", outcome);
    Ok(outcome)
}

/// Runs expansion and manifest assembly without touching the network and
/// returns the manifest that would have been submitted.
pub async fn preview_build(
    config: &Config,
    ci: &CiEnvironment,
    expander: &PatternExpander,
) -> Result<BuildManifest> {
    let assembled = assemble_manifest(config, expander, &DryRunUploader::new()).await?;
    let manifest = build_manifest(config, ci, assembled);
    debug!("Would submit: {}", serde_json::to_string(&manifest)?);
    Ok(manifest)
}
