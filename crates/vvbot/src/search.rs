//! Keyword image search against the `api.zvv.quest` service.
//!
//! `GET {endpoint}?q=<keyword>&n=1` answers `{code, data, msg}`; the first
//! entry of `data` is the picture URL. Every failure is logged and collapsed
//! into [`SearchOutcome::NotFound`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use vvbot_runtime::config::SearchConfig;
use vvbot_transport::TransportResult;
use vvbot_transport::http::http_client;

/// Result of a lookup as seen by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// URL of the best match.
    Found(String),
    NotFound,
}

/// Image lookup by keyword.
#[async_trait]
pub trait ImageSearch: Send + Sync {
    /// Looks up `keyword`, which is trimmed and non-empty.
    async fn search(&self, keyword: &str) -> SearchOutcome;
}

/// Response body of the search API.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub data: Option<Vec<String>>,
    #[serde(default)]
    pub msg: String,
}

/// Why a lookup produced no URL.
#[derive(Debug, Error)]
enum SearchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("API error {code}: {msg}")]
    Api { code: i64, msg: String },

    #[error("no results")]
    Empty,
}

/// HTTP client for the search API.
#[derive(Clone)]
pub struct SearchClient {
    client: Client,
    endpoint: String,
}

impl SearchClient {
    /// Creates a client for `endpoint` with the given request timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> TransportResult<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            endpoint: endpoint.into(),
        })
    }

    /// Creates a client from the `search` config section.
    pub fn from_config(config: &SearchConfig) -> TransportResult<Self> {
        Self::new(config.endpoint.clone(), config.timeout())
    }

    async fn fetch(&self, keyword: &str) -> Result<String, SearchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", keyword), ("n", "1")])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status != StatusCode::OK {
            return Err(SearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|e| SearchError::Decode(e.to_string()))?;
        if parsed.code >= 400 {
            return Err(SearchError::Api {
                code: parsed.code,
                msg: parsed.msg,
            });
        }

        parsed
            .data
            .and_then(|urls| urls.into_iter().next())
            .ok_or(SearchError::Empty)
    }
}

#[async_trait]
impl ImageSearch for SearchClient {
    async fn search(&self, keyword: &str) -> SearchOutcome {
        match self.fetch(keyword).await {
            Ok(url) => {
                debug!(keyword = %keyword, url = %url, "Search hit");
                SearchOutcome::Found(url)
            }
            Err(e) => {
                warn!(keyword = %keyword, error = %e, "Search returned no image");
                SearchOutcome::NotFound
            }
        }
    }
}
