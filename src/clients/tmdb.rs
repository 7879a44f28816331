use reqwest::{Client, StatusCode, header};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::CatalogConfig;
use crate::domain::CatalogQuery;
use crate::models::Movie;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("TMDB API key is not configured")]
    MissingApiKey,

    #[error("TMDB rejected the API key")]
    Unauthorized,

    #[error("TMDB returned status {0}")]
    Status(StatusCode),

    #[error("TMDB request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("TMDB response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A well-formed catalog answer: either movies or an error envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogPayload {
    Results(Vec<Movie>),
    UpstreamError(Option<String>),
}

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    #[serde(default)]
    results: Option<Vec<Movie>>,
    #[serde(rename = "Response", default)]
    response: Option<String>,
    #[serde(rename = "Error", default)]
    error: Option<String>,
}

impl From<CatalogResponse> for CatalogPayload {
    fn from(body: CatalogResponse) -> Self {
        if body.response.as_deref() == Some("False") {
            return Self::UpstreamError(body.error.filter(|e| !e.is_empty()));
        }

        Self::Results(body.results.unwrap_or_default())
    }
}

#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl TmdbClient {
    pub fn new(config: &CatalogConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent("Reelscout/1.0")
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build TMDB HTTP client: {e}"))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key().map(String::from),
        })
    }

    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// One request, no retries.
    pub async fn fetch(&self, query: &CatalogQuery) -> Result<CatalogPayload, CatalogError> {
        let result = self.send(query).await;

        let outcome = match &result {
            Ok(CatalogPayload::Results(_)) => "ok",
            Ok(CatalogPayload::UpstreamError(_)) => "upstream_error",
            Err(CatalogError::Unauthorized) => "unauthorized",
            Err(_) => "error",
        };
        metrics::counter!("catalog_requests_total", "mode" => query.mode(), "outcome" => outcome)
            .increment(1);

        result
    }

    async fn send(&self, query: &CatalogQuery) -> Result<CatalogPayload, CatalogError> {
        let api_key = self.api_key.as_deref().ok_or(CatalogError::MissingApiKey)?;
        let url = query.endpoint(&self.base_url);

        debug!(mode = query.mode(), "Fetching movies from TMDB");

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .bearer_auth(api_key)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(CatalogError::Unauthorized);
        }
        if !status.is_success() {
            return Err(CatalogError::Status(status));
        }

        let body = response.text().await?;
        let parsed: CatalogResponse = serde_json::from_str(&body)?;

        Ok(parsed.into())
    }
}
