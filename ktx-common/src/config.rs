// ktx-common/src/config.rs
use std::fmt;
use std::str::FromStr;

use mime::Mime;
use tracing::debug;

use super::ci::CiEnvironment;
use super::error::{KtxError, Result};
use super::model::{ArtifactCategory, PathPattern, TestRecordInput};

pub const DEFAULT_KETRYX_URL: &str = "https://app.ketryx.com";

/// Inputs exactly as the invoking environment handed them over, before any
/// defaulting or parsing. Empty strings count as absent.
#[derive(Debug, Clone, Default)]
pub struct RawInputs {
    pub ketryx_url: Option<String>,
    pub project: Option<String>,
    pub api_key: Option<String>,
    pub version: Option<String>,
    pub commit_sha: Option<String>,
    pub build_name: Option<String>,
    pub log: Option<String>,
    pub artifact_path: Option<String>,
    pub test_cucumber_path: Option<String>,
    pub test_junit_path: Option<String>,
    pub spdx_json_path: Option<String>,
    pub cyclonedx_json_path: Option<String>,
    pub tests: Option<String>,
    pub check_dependencies_status: Option<String>,
    pub check_release_status: Option<String>,
}

/// Validated configuration for one reporting run.
#[derive(Clone)]
pub struct Config {
    pub ketryx_url: String,
    pub project: String,
    pub api_key: String,
    pub version: Option<String>,
    pub commit_sha: Option<String>,
    pub build_name: Option<String>,
    pub log: Option<String>,
    pub artifact_paths: Vec<PathPattern>,
    pub test_cucumber_paths: Vec<PathPattern>,
    pub test_junit_paths: Vec<PathPattern>,
    pub spdx_json_paths: Vec<PathPattern>,
    pub cyclonedx_json_paths: Vec<PathPattern>,
    pub tests: Vec<TestRecordInput>,
    pub check_dependencies_status: bool,
    pub check_release_status: bool,
}

impl Config {
    /// Validates raw inputs. The commit SHA falls back to the one the CI run
    /// was triggered for.
    pub fn from_inputs(raw: RawInputs, ci: &CiEnvironment) -> Result<Self> {
        debug!("Loading ktx configuration");

        let project = non_empty(raw.project)
            .ok_or_else(|| KtxError::Config("Missing input project".to_string()))?;
        let api_key = non_empty(raw.api_key)
            .ok_or_else(|| KtxError::Config("Missing input api-key".to_string()))?;
        let ketryx_url = non_empty(raw.ketryx_url).unwrap_or_else(|| {
            debug!("No ketryx-url given, using default: {}", DEFAULT_KETRYX_URL);
            DEFAULT_KETRYX_URL.to_string()
        });

        let commit_sha = non_empty(raw.commit_sha).or_else(|| ci.commit_sha.clone());

        let config = Self {
            ketryx_url,
            project,
            api_key,
            version: non_empty(raw.version),
            commit_sha,
            build_name: non_empty(raw.build_name),
            log: non_empty(raw.log),
            artifact_paths: parse_pattern_list(
                raw.artifact_path.as_deref(),
                ArtifactCategory::Generic,
            )?,
            test_cucumber_paths: parse_pattern_list(
                raw.test_cucumber_path.as_deref(),
                ArtifactCategory::CucumberJson,
            )?,
            test_junit_paths: parse_pattern_list(
                raw.test_junit_path.as_deref(),
                ArtifactCategory::JunitXml,
            )?,
            spdx_json_paths: parse_pattern_list(
                raw.spdx_json_path.as_deref(),
                ArtifactCategory::SpdxJson,
            )?,
            cyclonedx_json_paths: parse_pattern_list(
                raw.cyclonedx_json_path.as_deref(),
                ArtifactCategory::CyclonedxJson,
            )?,
            tests: parse_tests(raw.tests.as_deref())?,
            check_dependencies_status: parse_bool_input(
                "check-dependencies-status",
                raw.check_dependencies_status.as_deref(),
            )?,
            check_release_status: parse_bool_input(
                "check-release-status",
                raw.check_release_status.as_deref(),
            )?,
        };
        debug!("Configuration loaded: {:?}", config);
        Ok(config)
    }

    /// Pattern list configured for `category`.
    pub fn patterns_for(&self, category: ArtifactCategory) -> &[PathPattern] {
        match category {
            ArtifactCategory::CucumberJson => &self.test_cucumber_paths,
            ArtifactCategory::JunitXml => &self.test_junit_paths,
            ArtifactCategory::CyclonedxJson => &self.cyclonedx_json_paths,
            ArtifactCategory::SpdxJson => &self.spdx_json_paths,
            ArtifactCategory::Generic => &self.artifact_paths,
        }
    }

    pub fn requests_compliance_checks(&self) -> bool {
        self.check_dependencies_status || self.check_release_status
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("ketryx_url", &self.ketryx_url)
            .field("project", &self.project)
            .field("api_key", &"<redacted>")
            .field("version", &self.version)
            .field("commit_sha", &self.commit_sha)
            .field("build_name", &self.build_name)
            .field("log", &self.log.as_ref().map(|l| format!("<{} bytes>", l.len())))
            .field("artifact_paths", &self.artifact_paths)
            .field("test_cucumber_paths", &self.test_cucumber_paths)
            .field("test_junit_paths", &self.test_junit_paths)
            .field("spdx_json_paths", &self.spdx_json_paths)
            .field("cyclonedx_json_paths", &self.cyclonedx_json_paths)
            .field("tests", &self.tests.len())
            .field("check_dependencies_status", &self.check_dependencies_status)
            .field("check_release_status", &self.check_release_status)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Splits a multi-line input into trimmed, non-empty lines.
pub fn parse_multiline(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses a pattern-list input.
///
/// One glob per line, or a YAML sequence (first non-blank line starting with
/// `- `) whose entries are strings or `{path, contentType}` mappings.
/// Content-type overrides are only honored where the category allows them.
pub fn parse_pattern_list(value: Option<&str>, category: ArtifactCategory) -> Result<Vec<PathPattern>> {
    let text = value.unwrap_or_default();
    let is_yaml_sequence = text
        .lines()
        .map(str::trim_start)
        .find(|line| !line.is_empty())
        .is_some_and(|line| line.starts_with("- "));

    let patterns: Vec<PathPattern> = if is_yaml_sequence {
        serde_yaml::from_str(text).map_err(|e| {
            KtxError::Config(format!("Invalid {category} path list: {e}"))
        })?
    } else {
        parse_multiline(Some(text))
            .into_iter()
            .map(PathPattern::new)
            .collect()
    };

    patterns
        .into_iter()
        .filter(|p| !p.path.trim().is_empty())
        .map(|p| {
            if p.content_type.is_some() && !category.allows_content_type_override() {
                return Err(KtxError::Config(format!(
                    "Pattern '{}': {category} paths do not accept a contentType",
                    p.path
                )));
            }
            if let Some(content_type) = &p.content_type {
                validate_content_type(&p.path, content_type)?;
            }
            Ok(p)
        })
        .collect()
}

/// Rejects content types the upload could not send, before anything is uploaded.
fn validate_content_type(path: &str, content_type: &str) -> Result<()> {
    Mime::from_str(content_type).map(|_| ()).map_err(|e| {
        KtxError::Config(format!(
            "Pattern '{path}': invalid contentType '{content_type}': {e}"
        ))
    })
}

/// Parses a boolean input the way GitHub Actions does (YAML 1.2 core schema).
/// A missing or empty input is `false`.
pub fn parse_bool_input(name: &str, value: Option<&str>) -> Result<bool> {
    match value.map(str::trim).unwrap_or_default() {
        "" => Ok(false),
        "true" | "True" | "TRUE" => Ok(true),
        "false" | "False" | "FALSE" => Ok(false),
        other => Err(KtxError::Config(format!(
            "Input does not meet YAML 1.2 \"Core Schema\" specification: {name} (got '{other}'). \
             Support boolean input list: `true | True | TRUE | false | False | FALSE`"
        ))),
    }
}

/// Decodes the `tests` input. An empty input means no test records.
pub fn parse_tests(value: Option<&str>) -> Result<Vec<TestRecordInput>> {
    let text = value.unwrap_or_default();
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let tests: Vec<TestRecordInput> =
        serde_yaml::from_str::<Option<Vec<TestRecordInput>>>(text)?.unwrap_or_default();
    for test in &tests {
        for pattern in &test.artifact_paths {
            if let Some(content_type) = &pattern.content_type {
                validate_content_type(&pattern.path, content_type)?;
            }
        }
    }
    Ok(tests)
}
