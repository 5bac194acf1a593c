// ktx-net/src/validation.rs
use ktx_common::error::{KtxError, Result};
use url::Url;

/// Validates the service base URL: it must parse and use http or https.
pub fn validate_url(url_str: &str) -> Result<Url> {
    let url = Url::parse(url_str)
        .map_err(|e| KtxError::Config(format!("Failed to parse URL '{url_str}': {e}")))?;
    match url.scheme() {
        "https" => {}
        "http" => {
            tracing::warn!("Using unencrypted connection to {}", url_str);
        }
        other => {
            return Err(KtxError::Config(format!(
                "Invalid URL scheme for '{url_str}': Must be http or https, but got '{other}'"
            )))
        }
    }
    Ok(url)
}

/// True for `application/json` and `application/json; charset=...`.
pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| {
        let ct = ct.trim();
        ct == "application/json" || ct.starts_with("application/json;")
    })
}
