// ktx-net/src/http.rs
use std::time::Duration;

use ktx_common::config::Config;
use ktx_common::error::{KtxError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::validation::validate_url;

const REQUEST_TIMEOUT_SECS: u64 = 300;
const CONNECT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT_STRING: &str = concat!("ktx build reporter/", env!("CARGO_PKG_VERSION"), " (Rust)");

const BUILD_ARTIFACTS_PATH: &str = "/api/v1/build-artifacts";
const BUILDS_PATH: &str = "/api/v1/builds";

/// Authenticated client for the build-tracking service, scoped to one project.
///
/// Holds no state between requests besides the connection pool.
#[derive(Clone)]
pub struct KetryxClient {
    pub(crate) http: Client,
    pub(crate) base_url: Url,
    pub(crate) project: String,
    pub(crate) api_key: String,
}

impl KetryxClient {
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = validate_url(&config.ketryx_url)?;
        debug!("Using service base URL: {}", base_url);
        Ok(Self {
            http: build_http_client()?,
            base_url,
            project: config.project.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// `<base>/api/v1/build-artifacts?project=<project>`
    pub fn build_artifacts_url(&self) -> Result<Url> {
        let mut url = self.base_url.join(BUILD_ARTIFACTS_PATH)?;
        url.query_pairs_mut().append_pair("project", &self.project);
        Ok(url)
    }

    /// `<base>/api/v1/builds`
    pub fn builds_url(&self) -> Result<Url> {
        Ok(self.base_url.join(BUILDS_PATH)?)
    }
}

fn build_http_client() -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_STRING));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| KtxError::Generic(format!("Failed to build HTTP client: {e}")))
}
