//! Search orchestration: turns debounced queries into catalog fetches and
//! keeps the observable loading/error/result state consistent.

use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, warn};

use crate::clients::tmdb::{CatalogError, CatalogPayload};
use crate::domain::CatalogQuery;
use crate::models::Movie;
use crate::services::catalog::MovieCatalog;
use crate::services::trending::TrendingService;

const FETCH_FAILED: &str = "Failed to fetch movies";

/// Search-path failures, as shown to the user.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("TMDB API key is not configured. Please set TMDB_API_KEY or catalog.api_key.")]
    ConfigMissing,

    #[error("Invalid API key. Please check your TMDB_API_KEY.")]
    Unauthorized,

    #[error("Failed to fetch movies")]
    TransportFailure { detail: String },

    #[error("{0}")]
    UpstreamApplicationError(String),
}

impl From<CatalogError> for SearchError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::MissingApiKey => Self::ConfigMissing,
            CatalogError::Unauthorized => Self::Unauthorized,
            other => Self::TransportFailure {
                detail: other.to_string(),
            },
        }
    }
}

/// Observable state of the movie list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchState {
    pub is_loading: bool,
    pub error_message: String,
    pub movie_list: Vec<Movie>,
}

pub struct SearchService {
    catalog: Arc<dyn MovieCatalog>,
    trending: TrendingService,
    state: watch::Sender<SearchState>,
    latest_request: AtomicU64,
}

/// Clears `is_loading` when an attempt ends, however it ends, unless a newer
/// attempt has taken over the state.
struct LoadingGuard<'a> {
    service: &'a SearchService,
    token: u64,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.service.is_current(self.token) {
            self.service.state.send_if_modified(|s| {
                let was_loading = s.is_loading;
                s.is_loading = false;
                was_loading
            });
        }
    }
}

impl SearchService {
    #[must_use]
    pub fn new(catalog: Arc<dyn MovieCatalog>, trending: TrendingService) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            catalog,
            trending,
            state,
            latest_request: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub const fn trending(&self) -> &TrendingService {
        &self.trending
    }

    fn is_current(&self, token: u64) -> bool {
        self.latest_request.load(Ordering::SeqCst) == token
    }

    /// Runs one debounced query against the shared state.
    ///
    /// A newer call supersedes this one: if it starts before this fetch
    /// resolves, this fetch's result is dropped without touching state.
    pub async fn run_query(&self, input: &str) {
        let token = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        let query = CatalogQuery::from_input(input);

        if !self.catalog.has_credentials() {
            warn!("TMDB API key is not configured; skipping fetch");
            self.state.send_modify(|s| {
                s.error_message = SearchError::ConfigMissing.to_string();
                s.movie_list.clear();
                s.is_loading = false;
            });
            return;
        }

        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error_message.clear();
        });
        let _guard = LoadingGuard {
            service: self,
            token,
        };

        let result = self.fetch(&query).await;

        if let Ok(movies) = &result {
            self.spawn_record(&query, movies);
        }

        if !self.is_current(token) {
            debug!(query = %query, "Discarding superseded catalog response");
            metrics::counter!("stale_responses_discarded_total").increment(1);
            return;
        }

        self.state.send_modify(|s| {
            match result {
                Ok(movies) => s.movie_list = movies,
                Err(e) => {
                    s.error_message = e.to_string();
                    s.movie_list.clear();
                }
            }
            s.is_loading = false;
        });
    }

    /// One-shot search without debounce or shared state. The search count is
    /// written before returning.
    pub async fn search(&self, input: &str) -> Result<Vec<Movie>, SearchError> {
        let query = CatalogQuery::from_input(input);

        if !self.catalog.has_credentials() {
            return Err(SearchError::ConfigMissing);
        }

        let movies = self.fetch(&query).await?;

        if let (Some(term), Some(first)) = (query.search_term(), movies.first()) {
            self.trending.record_search(term, first).await;
        }

        Ok(movies)
    }

    async fn fetch(&self, query: &CatalogQuery) -> Result<Vec<Movie>, SearchError> {
        match self.catalog.fetch(query).await {
            Ok(CatalogPayload::Results(movies)) => Ok(movies),
            Ok(CatalogPayload::UpstreamError(message)) => {
                warn!(query = %query, "Catalog returned an error payload");
                Err(SearchError::UpstreamApplicationError(
                    message.unwrap_or_else(|| FETCH_FAILED.to_string()),
                ))
            }
            Err(e) => {
                error!(query = %query, "error fetching movies: {e}");
                Err(e.into())
            }
        }
    }

    fn spawn_record(&self, query: &CatalogQuery, movies: &[Movie]) {
        let (Some(term), Some(first)) = (query.search_term(), movies.first()) else {
            return;
        };

        let trending = self.trending.clone();
        let term = term.to_string();
        let movie = first.clone();
        tokio::spawn(async move {
            trending.record_search(&term, &movie).await;
        });
    }
}
