use std::sync::Arc;
use std::time::Duration;

use crate::clients::tmdb::TmdbClient;
use crate::config::Config;
use crate::services::{MovieCatalog, SearchService, SearchSession, TrendingService};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub search_service: Arc<SearchService>,

    pub trending: TrendingService,

    /// The interactive session driven through `/api/session`.
    pub session: Arc<SearchSession>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let catalog = Arc::new(TmdbClient::new(&config.catalog)?);
        let trending = TrendingService::from_config(&config).await;
        Ok(Self::with_services(config, catalog, trending))
    }

    /// Wires the state around an already built catalog and trending service.
    #[must_use]
    pub fn with_services(
        config: Config,
        catalog: Arc<dyn MovieCatalog>,
        trending: TrendingService,
    ) -> Self {
        let search_service = Arc::new(SearchService::new(catalog, trending.clone()));
        let session = Arc::new(SearchSession::start(
            search_service.clone(),
            Duration::from_millis(config.search.debounce_ms),
        ));

        Self {
            config: Arc::new(config),
            search_service,
            trending,
            session,
        }
    }
}
