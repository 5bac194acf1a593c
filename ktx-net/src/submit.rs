// ktx-net/src/submit.rs
use async_trait::async_trait;
use ktx_common::error::{KtxError, Result};
use ktx_common::model::{BuildManifest, BuildOutcome};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, error};

use crate::http::KetryxClient;
use crate::validation::is_json_content_type;

/// Registers a build and reports how the service answered.
///
/// HTTP-level failures come back as `Ok(BuildOutcome { ok: false, .. })`;
/// only network-level failures are errors.
#[async_trait]
pub trait BuildSubmitter {
    async fn submit(&self, manifest: &BuildManifest) -> Result<BuildOutcome>;
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[async_trait]
impl BuildSubmitter for KetryxClient {
    async fn submit(&self, manifest: &BuildManifest) -> Result<BuildOutcome> {
        let url = self.builds_url()?;
        let url_string = url.to_string();
        let body = serde_json::to_string(manifest)?;

        debug!("Sending request to {}: {}", url_string, body);
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                error!("HTTP request failed for {}: {}", url_string, e);
                KtxError::from(e)
            })?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if status == StatusCode::OK {
            let text = response.text().await?;
            debug!("Received response {}", text);
            return Ok(serde_json::from_str::<BuildOutcome>(&text).unwrap_or_else(|e| {
                error!("Failed to parse build response from {}: {}", url_string, e);
                BuildOutcome::failure(format!("Unexpected response data from {url_string}"))
            }));
        }

        let fallback = format!("Error status {}", status.as_u16());
        if !is_json_content_type(content_type.as_deref()) {
            debug!(
                "Received response status {}, type {}",
                status.as_u16(),
                content_type.as_deref().unwrap_or("unspecified")
            );
            return Ok(BuildOutcome::failure(fallback));
        }

        let text = response.text().await?;
        debug!("Received response status {}, JSON {}", status.as_u16(), text);
        let error = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|b| b.error)
            .filter(|e| !e.is_empty())
            .unwrap_or(fallback);
        Ok(BuildOutcome::failure(error))
    }
}
