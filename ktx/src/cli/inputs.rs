// ktx/src/cli/inputs.rs
use clap::Args;
use ktx_common::config::RawInputs;

/// Named action inputs. Values stay raw strings here; parsing and validation
/// happen in [`ktx_common::Config::from_inputs`].
#[derive(Args, Debug, Default)]
pub struct InputArgs {
    /// Ketryx base URL
    #[arg(long, env = "INPUT_KETRYX-URL", value_name = "URL")]
    pub ketryx_url: Option<String>,

    /// Ketryx project id
    #[arg(long, env = "INPUT_PROJECT")]
    pub project: Option<String>,

    /// Ketryx API key
    #[arg(long, env = "INPUT_API-KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Version the build belongs to
    #[arg(long, env = "INPUT_VERSION")]
    pub version: Option<String>,

    /// Commit the build was made from (defaults to GITHUB_SHA)
    #[arg(long, env = "INPUT_COMMIT-SHA", value_name = "SHA")]
    pub commit_sha: Option<String>,

    #[arg(long, env = "INPUT_BUILD-NAME", value_name = "NAME")]
    pub build_name: Option<String>,

    /// Free-form build log
    #[arg(long, env = "INPUT_LOG")]
    pub log: Option<String>,

    /// Generic artifacts (glob, repeatable or newline separated)
    #[arg(long, env = "INPUT_ARTIFACT-PATH", value_name = "GLOB", value_delimiter = '\n')]
    pub artifact_path: Vec<String>,

    /// Cucumber JSON reports
    #[arg(long, env = "INPUT_TEST-CUCUMBER-PATH", value_name = "GLOB", value_delimiter = '\n')]
    pub test_cucumber_path: Vec<String>,

    /// JUnit XML reports
    #[arg(long, env = "INPUT_TEST-JUNIT-PATH", value_name = "GLOB", value_delimiter = '\n')]
    pub test_junit_path: Vec<String>,

    /// SPDX JSON SBOMs
    #[arg(long, env = "INPUT_SPDX-JSON-PATH", value_name = "GLOB", value_delimiter = '\n')]
    pub spdx_json_path: Vec<String>,

    /// CycloneDX JSON SBOMs
    #[arg(long, env = "INPUT_CYCLONEDX-JSON-PATH", value_name = "GLOB", value_delimiter = '\n')]
    pub cyclonedx_json_path: Vec<String>,

    /// Individual test results as a YAML list
    #[arg(long, env = "INPUT_TESTS", value_name = "YAML")]
    pub tests: Option<String>,

    #[arg(long, env = "INPUT_CHECK-DEPENDENCIES-STATUS", value_name = "BOOL")]
    pub check_dependencies_status: Option<String>,

    #[arg(long, env = "INPUT_CHECK-RELEASE-STATUS", value_name = "BOOL")]
    pub check_release_status: Option<String>,
}

impl InputArgs {
    pub fn to_raw_inputs(&self) -> RawInputs {
        RawInputs {
            ketryx_url: self.ketryx_url.clone(),
            project: self.project.clone(),
            api_key: self.api_key.clone(),
            version: self.version.clone(),
            commit_sha: self.commit_sha.clone(),
            build_name: self.build_name.clone(),
            log: self.log.clone(),
            artifact_path: join_lines(&self.artifact_path),
            test_cucumber_path: join_lines(&self.test_cucumber_path),
            test_junit_path: join_lines(&self.test_junit_path),
            spdx_json_path: join_lines(&self.spdx_json_path),
            cyclonedx_json_path: join_lines(&self.cyclonedx_json_path),
            tests: self.tests.clone(),
            check_dependencies_status: self.check_dependencies_status.clone(),
            check_release_status: self.check_release_status.clone(),
        }
    }
}

fn join_lines(values: &[String]) -> Option<String> {
    if values.is_empty() {
        None
    } else {
        Some(values.join("\n"))
    }
}
