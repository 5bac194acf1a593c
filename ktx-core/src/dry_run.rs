// ktx-core/src/dry_run.rs
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use ktx_common::error::{KtxError, Result};
use ktx_net::ArtifactUploader;
use tracing::info;

/// Stands in for the real uploader when previewing a report: checks that the
/// file is readable and hands out placeholder ids without any network access.
#[derive(Debug, Default)]
pub struct DryRunUploader {
    count: AtomicUsize,
}

impl DryRunUploader {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ArtifactUploader for DryRunUploader {
    async fn upload(&self, file_path: &Path, content_type: &str) -> Result<String> {
        let metadata = tokio::fs::metadata(file_path).await.map_err(|e| {
            KtxError::IoError(format!(
                "Failed to read artifact {}: {}",
                file_path.display(),
                e
            ))
        })?;
        let n = self.count.fetch_add(1, Ordering::SeqCst) + 1;
        info!(
            "Would upload {} ({}, {} bytes)",
            file_path.display(),
            content_type,
            metadata.len()
        );
        Ok(format!("dry-run-{n}"))
    }
}
