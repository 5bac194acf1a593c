// ktx-common/src/error.rs
use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum KtxError {
    #[error("I/O Error: {0}")]
    Io(#[from] Arc<std::io::Error>),

    #[error("HTTP Request Error: {0}")]
    Http(#[from] Arc<reqwest::Error>),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] Arc<serde_json::Error>),

    #[error("YAML Parsing Error: {0}")]
    Yaml(#[from] Arc<serde_yaml::Error>),

    #[error("URL Parsing Error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Glob Error: {0}")]
    Glob(String),

    /// A build artifact could not be uploaded. Always fatal for the run.
    #[error("Error uploading build artifact to {url}: {message}")]
    Upload {
        url: String,
        status: Option<u16>,
        message: String,
    },

    #[error("IoError: {0}")]
    IoError(String),

    #[error("Generic Error: {0}")]
    Generic(String),
}

impl KtxError {
    pub fn upload(url: impl Into<String>, status: Option<u16>, message: impl Into<String>) -> Self {
        KtxError::Upload {
            url: url.into(),
            status,
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for KtxError {
    fn from(err: std::io::Error) -> Self {
        KtxError::Io(Arc::new(err))
    }
}

impl From<reqwest::Error> for KtxError {
    fn from(err: reqwest::Error) -> Self {
        KtxError::Http(Arc::new(err))
    }
}

impl From<serde_json::Error> for KtxError {
    fn from(err: serde_json::Error) -> Self {
        KtxError::Json(Arc::new(err))
    }
}

impl From<serde_yaml::Error> for KtxError {
    fn from(err: serde_yaml::Error) -> Self {
        KtxError::Yaml(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, KtxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_error_mentions_url_and_status() {
        let err = KtxError::upload(
            "https://app.ketryx.com/api/v1/build-artifacts?project=p",
            Some(403),
            "status 403",
        );
        let msg = err.to_string();
        assert!(msg.contains("https://app.ketryx.com/api/v1/build-artifacts?project=p"));
        assert!(msg.contains("status 403"));
    }

    #[test]
    fn upload_error_without_status_keeps_message() {
        let err = KtxError::upload("http://localhost/x", None, "Unexpected response data");
        assert_eq!(
            err.to_string(),
            "Error uploading build artifact to http://localhost/x: Unexpected response data"
        );
    }
}
