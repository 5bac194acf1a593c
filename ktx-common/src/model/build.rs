// ktx-common/src/model/build.rs
use serde::{Deserialize, Serialize};

use super::artifact::UploadedArtifactRef;
use super::test_record::TestRecordOutput;

/// The payload registering one build with the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildManifest {
    pub project: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_sha: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_urls: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_repository_update: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_dependencies_status: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_release_status: Option<bool>,
    pub artifacts: Vec<UploadedArtifactRef>,
    pub tests: Vec<TestRecordOutput>,
}

/// Terminal result of one reporting run.
///
/// On HTTP 200 the service's response body is taken verbatim; error responses
/// are folded into `ok: false` plus a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildOutcome {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_shas: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies_accepted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies_controlled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub versions_released: Option<bool>,
}

impl BuildOutcome {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Link to the build in the web UI, when the service reported both ids.
    pub fn build_url(&self, base_url: &str) -> Option<String> {
        let project_id = self.project_id.as_deref()?;
        let build_id = self.build_id.as_deref()?;
        Some(format!(
            "{}/projects/{}/builds/{}",
            base_url.trim_end_matches('/'),
            project_id,
            build_id
        ))
    }
}
