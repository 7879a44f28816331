use crate::clients::appwrite::{AppwriteClient, SearchCountDocument, SearchCountFields, query};
use crate::db::Store;
use crate::domain::MovieId;
use crate::models::SearchCountRecord;
use crate::services::search_counts::{SearchCountStore, StoreError};

impl From<SearchCountDocument> for SearchCountRecord {
    fn from(doc: SearchCountDocument) -> Self {
        Self {
            id: doc.id,
            search_term: doc.search_term,
            count: doc.count,
            movie_id: MovieId::new(doc.movie_id),
            poster_url: doc.poster_url,
        }
    }
}

/// Counters kept in an Appwrite collection.
pub struct AppwriteSearchCounts {
    client: AppwriteClient,
}

impl AppwriteSearchCounts {
    #[must_use]
    pub const fn new(client: AppwriteClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl SearchCountStore for AppwriteSearchCounts {
    fn backend(&self) -> &'static str {
        "appwrite"
    }

    async fn find_by_term(&self, term: &str) -> Result<Option<SearchCountRecord>, StoreError> {
        let documents = self
            .client
            .list_documents(&[query::equal("searchTerm", term)])
            .await?;

        Ok(documents.into_iter().next().map(Into::into))
    }

    async fn create(
        &self,
        term: &str,
        movie_id: MovieId,
        poster_url: &str,
    ) -> Result<SearchCountRecord, StoreError> {
        let fields = SearchCountFields {
            search_term: Some(term),
            count: 1,
            movie_id: movie_id.value(),
            poster_url,
        };

        Ok(self.client.create_document(&fields).await?.into())
    }

    async fn update(&self, record: &SearchCountRecord) -> Result<(), StoreError> {
        let fields = SearchCountFields {
            search_term: None,
            count: record.count,
            movie_id: record.movie_id.value(),
            poster_url: &record.poster_url,
        };

        self.client.update_document(&record.id, &fields).await?;
        Ok(())
    }

    async fn top_by_count(&self, limit: u64) -> Result<Vec<SearchCountRecord>, StoreError> {
        let documents = self
            .client
            .list_documents(&[query::limit(limit), query::order_desc("count")])
            .await?;

        Ok(documents.into_iter().map(Into::into).collect())
    }
}

/// Counters kept in the local SQLite database.
pub struct SeaOrmSearchCounts {
    store: Store,
}

impl SeaOrmSearchCounts {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

fn db_err(err: &anyhow::Error) -> StoreError {
    StoreError::Database(format!("{err:#}"))
}

#[async_trait::async_trait]
impl SearchCountStore for SeaOrmSearchCounts {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn find_by_term(&self, term: &str) -> Result<Option<SearchCountRecord>, StoreError> {
        self.store
            .find_search_count(term)
            .await
            .map_err(|e| db_err(&e))
    }

    async fn create(
        &self,
        term: &str,
        movie_id: MovieId,
        poster_url: &str,
    ) -> Result<SearchCountRecord, StoreError> {
        self.store
            .create_search_count(term, movie_id, poster_url)
            .await
            .map_err(|e| db_err(&e))
    }

    async fn update(&self, record: &SearchCountRecord) -> Result<(), StoreError> {
        let updated = self
            .store
            .update_search_count(
                &record.id,
                record.count,
                record.movie_id,
                &record.poster_url,
            )
            .await
            .map_err(|e| db_err(&e))?;

        if updated {
            Ok(())
        } else {
            Err(StoreError::Database(format!(
                "search count {} no longer exists",
                record.id
            )))
        }
    }

    async fn top_by_count(&self, limit: u64) -> Result<Vec<SearchCountRecord>, StoreError> {
        self.store
            .top_search_counts(limit)
            .await
            .map_err(|e| db_err(&e))
    }
}
