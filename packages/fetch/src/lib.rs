#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Remote data acquisition for the gun-violence dashboard.
//!
//! Two kinds of endpoint are consumed: named JSON documents served from the
//! dashboard-data repository ([`DataRepoClient`]), and ArcGIS-style feature
//! servers queried with WHERE-clause filtering ([`feature_server`]).
//!
//! No retries and no timeouts anywhere; a failed request fails the calling
//! operation, and callers needing bounded latency wrap their own timeout
//! around the future.

pub mod feature_server;

/// Raw-content root of the dashboard-data repository. Named documents
/// (years list, per-year feature collections, homicide totals) live directly
/// under this path.
pub const DATA_REPO_URL: &str = "https://raw.githubusercontent.com/PhiladelphiaController/gun-violence-dashboard-data/master/gun_violence_dashboard_data/data/processed";

/// Errors from a named-JSON document fetch.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Client for named JSON documents in the dashboard-data repository.
#[derive(Debug, Clone)]
pub struct DataRepoClient {
    client: reqwest::Client,
    base_url: String,
}

impl Default for DataRepoClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DataRepoClient {
    /// Creates a client against [`DATA_REPO_URL`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(DATA_REPO_URL)
    }

    /// Creates a client against a different content root.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// The underlying HTTP client, shared with feature-server queries.
    #[must_use]
    pub const fn http_client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Fetches `{base}/{filename}` and parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on transport failure or a non-JSON body.
    pub async fn fetch_named_json(
        &self,
        filename: &str,
    ) -> Result<serde_json::Value, FetchError> {
        let url = format!("{}/{filename}", self.base_url);
        log::info!("Fetching {filename} from data repository");

        let response = self.client.get(&url).send().await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
