// ktx-net/src/upload.rs
use std::path::Path;

use async_trait::async_trait;
use ktx_common::error::{KtxError, Result};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, error};

use crate::http::KetryxClient;

/// Uploads a single local file and returns the service's artifact id.
///
/// Implementations perform exactly one upload per call and keep no memory
/// between calls; deduplication is the caller's job.
#[async_trait]
pub trait ArtifactUploader {
    async fn upload(&self, file_path: &Path, content_type: &str) -> Result<String>;
}

#[async_trait]
impl ArtifactUploader for KetryxClient {
    async fn upload(&self, file_path: &Path, content_type: &str) -> Result<String> {
        let url = self.build_artifacts_url()?;
        let url_string = url.to_string();

        let contents = tokio::fs::read(file_path).await.map_err(|e| {
            error!("Failed to read artifact {}: {}", file_path.display(), e);
            KtxError::IoError(format!(
                "Failed to read artifact {}: {}",
                file_path.display(),
                e
            ))
        })?;
        let file_name = file_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "artifact".to_string());
        let part = Part::bytes(contents)
            .file_name(file_name)
            .mime_str(content_type)
            .map_err(|e| {
                KtxError::Config(format!("Invalid content type '{content_type}': {e}"))
            })?;
        let form = Form::new().part("file", part);

        debug!(
            "Sending request to {} ({}, {})",
            url_string,
            file_path.display(),
            content_type
        );
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!("HTTP request failed for {}: {}", url_string, e);
                KtxError::upload(&url_string, None, e.to_string())
            })?;

        let status = response.status();
        debug!("Received HTTP status: {} for {}", status, url_string);
        if status != StatusCode::OK {
            return Err(KtxError::upload(
                &url_string,
                Some(status.as_u16()),
                format!("status {}", status.as_u16()),
            ));
        }

        let unexpected = || {
            KtxError::upload(
                &url_string,
                Some(status.as_u16()),
                format!("Unexpected response data from {url_string}"),
            )
        };
        let body: Value = response.json().await.map_err(|e| {
            debug!("Failed to parse upload response from {}: {}", url_string, e);
            unexpected()
        })?;
        match body.get("id").and_then(Value::as_str) {
            Some(id) => {
                debug!("Uploaded {} as artifact {}", file_path.display(), id);
                Ok(id.to_string())
            }
            None => Err(unexpected()),
        }
    }
}
