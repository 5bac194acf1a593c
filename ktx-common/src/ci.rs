// ktx-common/src/ci.rs
//! Best-effort build metadata derived from the GitHub Actions environment.
use std::env;

use tracing::debug;

/// Metadata about the CI run, read from the environment.
///
/// Every field is optional: outside of a CI runner (or with a partially
/// populated environment) the reporter still works, it just sends less context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CiEnvironment {
    pub commit_sha: Option<String>,
    pub change_request_number: Option<u64>,
    pub run_url: Option<String>,
    pub repository_url: Option<String>,
}

impl CiEnvironment {
    pub fn from_env() -> Self {
        let server_url = non_empty_var("GITHUB_SERVER_URL");
        let repository = non_empty_var("GITHUB_REPOSITORY");
        let run_id = non_empty_var("GITHUB_RUN_ID");

        let ci = Self {
            commit_sha: non_empty_var("GITHUB_SHA"),
            change_request_number: non_empty_var("GITHUB_REF_NAME")
                .as_deref()
                .and_then(parse_change_request_number),
            run_url: run_url(server_url.as_deref(), repository.as_deref(), run_id.as_deref()),
            repository_url: repository_url(server_url.as_deref(), repository.as_deref()),
        };
        debug!("Detected CI environment: {:?}", ci);
        ci
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// `$GITHUB_SERVER_URL/$GITHUB_REPOSITORY/actions/runs/$GITHUB_RUN_ID`
fn run_url(server: Option<&str>, repository: Option<&str>, run_id: Option<&str>) -> Option<String> {
    let server = server?;
    match (repository, run_id) {
        (Some(repository), Some(run_id)) => {
            Some(format!("{server}/{repository}/actions/runs/{run_id}"))
        }
        // Without repository or run id the server URL is the best we can do.
        _ => Some(server.to_string()),
    }
}

fn repository_url(server: Option<&str>, repository: Option<&str>) -> Option<String> {
    Some(format!("{}/{}", server?, repository?))
}

/// Extracts `123` from a pull request ref name such as `123/merge`.
pub fn parse_change_request_number(ref_name: &str) -> Option<u64> {
    ref_name.strip_suffix("/merge")?.parse().ok()
}
