// ktx-common/src/model/test_record.rs
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::artifact::{ArtifactIdRef, PathPattern};
use crate::error::KtxError;

/// Outcome of a single reported test.
///
/// Accepted case-insensitively on input; always sent upper-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum TestResult {
    #[serde(rename = "PASS")]
    Pass,
    #[serde(rename = "FAIL")]
    Fail,
}

impl TestResult {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
        }
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestResult {
    type Err = KtxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PASS" => Ok(Self::Pass),
            "FAIL" => Ok(Self::Fail),
            _ => Err(KtxError::Config(format!(
                "Invalid test result '{s}': expected PASS or FAIL"
            ))),
        }
    }
}

impl TryFrom<String> for TestResult {
    type Error = KtxError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One structured test outcome as supplied in the `tests` input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRecordInput {
    pub tested_item: String,
    pub result: TestResult,
    pub title: String,
    #[serde(default)]
    pub log: Option<String>,
    #[serde(default)]
    pub artifact_paths: Vec<PathPattern>,
}

/// A test record in the form submitted to the build endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRecordOutput {
    pub tested_item: String,
    pub result: TestResult,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<String>,
    pub artifacts: Vec<ArtifactIdRef>,
}

impl TestRecordOutput {
    /// Builds the submitted form of `input` from ids already resolved for its artifacts.
    pub fn from_input(input: &TestRecordInput, artifact_ids: Vec<String>) -> Self {
        Self {
            tested_item: input.tested_item.clone(),
            result: input.result,
            title: input.title.clone(),
            log: input.log.clone(),
            artifacts: artifact_ids
                .into_iter()
                .map(|id| ArtifactIdRef { id })
                .collect(),
        }
    }
}
