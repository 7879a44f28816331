use crate::clients::tmdb::{CatalogError, CatalogPayload, TmdbClient};
use crate::domain::CatalogQuery;

/// Source of movie listings.
///
/// `TmdbClient` is the production implementation; tests swap in scripted
/// catalogs to control timing and payloads.
#[async_trait::async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Whether a credential is available. Checked before every fetch.
    fn has_credentials(&self) -> bool;

    /// Issues exactly one request for `query`.
    async fn fetch(&self, query: &CatalogQuery) -> Result<CatalogPayload, CatalogError>;
}

#[async_trait::async_trait]
impl MovieCatalog for TmdbClient {
    fn has_credentials(&self) -> bool {
        self.has_api_key()
    }

    async fn fetch(&self, query: &CatalogQuery) -> Result<CatalogPayload, CatalogError> {
        Self::fetch(self, query).await
    }
}
