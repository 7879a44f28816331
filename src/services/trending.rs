use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::clients::appwrite::AppwriteClient;
use crate::config::{Config, StoreBackend};
use crate::db::Store;
use crate::models::{Movie, SearchCountRecord, TrendingEntry};
use crate::services::search_counts::{SearchCountStore, StoreError};
use crate::services::search_counts_impl::{AppwriteSearchCounts, SeaOrmSearchCounts};

/// Number of entries in the trending list.
pub const TRENDING_LIMIT: u64 = 5;

/// What `record_search` did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Created,
    Incremented { count: i64 },
    Skipped,
}

/// Maintains search counters and derives the trending list from them.
///
/// Every failure stops here: trending data is secondary to search, so
/// writes degrade to a logged no-op and reads to an empty list.
#[derive(Clone)]
pub struct TrendingService {
    store: Option<Arc<dyn SearchCountStore>>,
    image_base_url: String,
    limit: u64,
}

impl TrendingService {
    #[must_use]
    pub fn new(store: Option<Arc<dyn SearchCountStore>>, image_base_url: impl Into<String>) -> Self {
        Self {
            store,
            image_base_url: image_base_url.into(),
            limit: TRENDING_LIMIT,
        }
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self::new(None, crate::config::CatalogConfig::default().image_base_url)
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// Builds the configured backend. A backend that cannot be reached at
    /// start-up is logged and treated as unconfigured.
    pub async fn from_config(config: &Config) -> Self {
        let image_base_url = config.catalog.image_base_url.clone();

        let store: Option<Arc<dyn SearchCountStore>> = match config.store.backend {
            StoreBackend::Appwrite => match config.store.appwrite_target() {
                Some(target) => {
                    match AppwriteClient::new(target, config.store.request_timeout_seconds) {
                        Ok(client) => Some(Arc::new(AppwriteSearchCounts::new(client))),
                        Err(e) => {
                            error!("Failed to set up Appwrite client: {e:#}");
                            None
                        }
                    }
                }
                None => None,
            },
            StoreBackend::Sqlite => match Store::new(&config.store.database_path).await {
                Ok(store) => Some(Arc::new(SeaOrmSearchCounts::new(store))),
                Err(e) => {
                    error!("Failed to open search count database: {e:#}");
                    None
                }
            },
        };

        match &store {
            Some(s) => info!(backend = s.backend(), "Trending store ready"),
            None => warn!("Trending store is not configured. Trending movies are disabled."),
        }

        Self::new(store, image_base_url).with_limit(config.search.trending_limit)
    }

    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.store.is_some()
    }

    /// Poster URL stored alongside a counter.
    #[must_use]
    pub fn poster_url(&self, poster_path: Option<&str>) -> String {
        format!("{}{}", self.image_base_url, poster_path.unwrap_or_default())
    }

    /// Counts one search for `term`, whose top result was `movie`.
    ///
    /// Never fails; problems are logged.
    pub async fn record_search(&self, term: &str, movie: &Movie) -> RecordOutcome {
        let Some(store) = &self.store else {
            warn!("Trending store is not configured. Skipping search count update.");
            return RecordOutcome::Skipped;
        };

        match self.try_record(store.as_ref(), term, movie).await {
            Ok(outcome) => {
                debug!(term, ?outcome, "Search count updated");
                metrics::counter!("search_counts_recorded_total", "outcome" => "ok").increment(1);
                outcome
            }
            Err(e) => {
                error!(term, backend = store.backend(), "Error updating search count: {e}");
                metrics::counter!("search_counts_recorded_total", "outcome" => "error")
                    .increment(1);
                RecordOutcome::Skipped
            }
        }
    }

    // Lookup and write are separate calls; concurrent identical searches can
    // race and lose an increment.
    async fn try_record(
        &self,
        store: &dyn SearchCountStore,
        term: &str,
        movie: &Movie,
    ) -> Result<RecordOutcome, StoreError> {
        let poster_url = self.poster_url(movie.poster_path.as_deref());

        if let Some(existing) = store.find_by_term(term).await? {
            let record = SearchCountRecord {
                count: existing.count + 1,
                movie_id: movie.id,
                poster_url,
                ..existing
            };
            store.update(&record).await?;
            return Ok(RecordOutcome::Incremented {
                count: record.count,
            });
        }

        store.create(term, movie.id, &poster_url).await?;
        Ok(RecordOutcome::Created)
    }

    /// The most searched terms, highest count first. Empty when the store is
    /// unconfigured or unreachable.
    pub async fn get_trending(&self) -> Vec<TrendingEntry> {
        let Some(store) = &self.store else {
            warn!("Trending store is not configured. Returning empty trending movies.");
            return Vec::new();
        };

        match store.top_by_count(self.limit).await {
            Ok(mut records) => {
                // Stable, so ties keep the store's order.
                records.sort_by(|a, b| b.count.cmp(&a.count));
                records.truncate(usize::try_from(self.limit).unwrap_or(usize::MAX));
                records.into_iter().map(TrendingEntry::from).collect()
            }
            Err(e) => {
                error!(backend = store.backend(), "Error fetching trending movies: {e}");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MovieId;

    struct FailingStore;

    #[async_trait::async_trait]
    impl SearchCountStore for FailingStore {
        fn backend(&self) -> &'static str {
            "failing"
        }

        async fn find_by_term(&self, _: &str) -> Result<Option<SearchCountRecord>, StoreError> {
            Err(StoreError::Request("connection reset".to_string()))
        }

        async fn create(
            &self,
            _: &str,
            _: MovieId,
            _: &str,
        ) -> Result<SearchCountRecord, StoreError> {
            Err(StoreError::Request("connection reset".to_string()))
        }

        async fn update(&self, _: &SearchCountRecord) -> Result<(), StoreError> {
            Err(StoreError::Request("connection reset".to_string()))
        }

        async fn top_by_count(&self, _: u64) -> Result<Vec<SearchCountRecord>, StoreError> {
            Err(StoreError::Request("connection reset".to_string()))
        }
    }

    async fn sqlite_service() -> (TrendingService, Store) {
        let store = Store::new("sqlite::memory:").await.unwrap();
        let service = TrendingService::new(
            Some(Arc::new(SeaOrmSearchCounts::new(store.clone()))),
            "https://image.tmdb.org/t/p/w500",
        );
        (service, store)
    }

    #[test]
    fn poster_url_template() {
        let service = TrendingService::disabled();
        assert_eq!(
            service.poster_url(Some("/x.jpg")),
            "https://image.tmdb.org/t/p/w500/x.jpg"
        );
        assert_eq!(service.poster_url(None), "https://image.tmdb.org/t/p/w500");
    }

    #[tokio::test]
    async fn repeat_search_increments_single_record() {
        let (service, store) = sqlite_service().await;
        let movie = Movie::new(1, "Dune", Some("/x.jpg"));

        assert_eq!(
            service.record_search("dune", &movie).await,
            RecordOutcome::Created
        );
        let first = store.find_search_count("dune").await.unwrap().unwrap();
        assert_eq!(first.count, 1);
        assert_eq!(first.movie_id, MovieId::new(1));
        assert_eq!(first.poster_url, "https://image.tmdb.org/t/p/w500/x.jpg");

        let newer = Movie::new(438_631, "Dune", Some("/y.jpg"));
        assert_eq!(
            service.record_search("dune", &newer).await,
            RecordOutcome::Incremented { count: 2 }
        );
        let second = store.find_search_count("dune").await.unwrap().unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.count, 2);
        assert_eq!(second.movie_id, MovieId::new(438_631));
        assert_eq!(second.poster_url, "https://image.tmdb.org/t/p/w500/y.jpg");

        assert_eq!(store.search_count_rows("dune").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn trending_is_top_five_by_count() {
        let (service, store) = sqlite_service().await;
        for (i, count) in [3_i64, 7, 1, 9, 2, 5].into_iter().enumerate() {
            let row = store
                .create_search_count(&format!("t{i}"), MovieId::new(1), "u")
                .await
                .unwrap();
            store
                .update_search_count(&row.id, count, MovieId::new(1), "u")
                .await
                .unwrap();
        }

        let counts: Vec<i64> = service
            .get_trending()
            .await
            .into_iter()
            .map(|e| e.count)
            .collect();
        assert_eq!(counts, vec![9, 7, 5, 3, 2]);
    }

    #[tokio::test]
    async fn unconfigured_store_is_a_no_op() {
        let service = TrendingService::disabled();
        assert!(!service.is_configured());

        let movie = Movie::new(1, "Dune", None);
        assert_eq!(
            service.record_search("dune", &movie).await,
            RecordOutcome::Skipped
        );
        assert!(service.get_trending().await.is_empty());
    }

    #[tokio::test]
    async fn store_failures_are_swallowed() {
        let service = TrendingService::new(Some(Arc::new(FailingStore)), "https://img");

        let movie = Movie::new(1, "Dune", None);
        assert_eq!(
            service.record_search("dune", &movie).await,
            RecordOutcome::Skipped
        );
        assert!(service.get_trending().await.is_empty());
    }

    #[tokio::test]
    async fn sqlite_backend_from_config() {
        let mut config = Config::default();
        config.store.backend = StoreBackend::Sqlite;
        config.store.database_path = "sqlite::memory:".to_string();

        let service = TrendingService::from_config(&config).await;
        assert!(service.is_configured());
    }

    #[tokio::test]
    async fn appwrite_without_ids_is_disabled() {
        let service = TrendingService::from_config(&Config::default()).await;
        assert!(!service.is_configured());
    }
}
