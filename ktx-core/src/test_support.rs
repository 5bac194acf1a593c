// ktx-core/src/test_support.rs
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use ktx_common::error::{KtxError, Result};
use ktx_common::model::{BuildManifest, BuildOutcome};
use ktx_net::{ArtifactUploader, BuildSubmitter};

/// Records every upload and hands out sequential ids `ID1`, `ID2`, ...
#[derive(Default)]
pub struct RecordingUploader {
    calls: Mutex<Vec<(PathBuf, String)>>,
    failing: HashSet<PathBuf>,
}

impl RecordingUploader {
    pub fn failing_on(path: impl Into<PathBuf>) -> Self {
        Self {
            failing: HashSet::from([path.into()]),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<(PathBuf, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArtifactUploader for RecordingUploader {
    async fn upload(&self, file_path: &Path, content_type: &str) -> Result<String> {
        if self.failing.contains(file_path) {
            return Err(KtxError::upload("http://test/api/v1/build-artifacts", Some(500), "status 500"));
        }
        let mut calls = self.calls.lock().unwrap();
        calls.push((file_path.to_path_buf(), content_type.to_string()));
        Ok(format!("ID{}", calls.len()))
    }
}

/// Captures submitted manifests and answers with a fixed outcome.
pub struct RecordingSubmitter {
    submitted: Mutex<Vec<BuildManifest>>,
    outcome: BuildOutcome,
}

impl RecordingSubmitter {
    pub fn answering(outcome: BuildOutcome) -> Self {
        Self {
            submitted: Mutex::new(Vec::new()),
            outcome,
        }
    }

    pub fn submitted(&self) -> Vec<BuildManifest> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl BuildSubmitter for RecordingSubmitter {
    async fn submit(&self, manifest: &BuildManifest) -> Result<BuildOutcome> {
        self.submitted.lock().unwrap().push(manifest.clone());
        Ok(self.outcome.clone())
    }
}
