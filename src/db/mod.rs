use crate::domain::MovieId;
use crate::models::SearchCountRecord;
use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

fn is_memory_url(db_url: &str) -> bool {
    let path = db_url.trim_start_matches("sqlite:");
    path.starts_with(":memory:") || db_url.contains("mode=memory")
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        if is_memory_url(db_url) {
            // Every pooled connection would otherwise get its own empty database.
            Self::with_pool_options(db_url, 1, 1).await
        } else {
            Self::with_pool_options(db_url, 5, 1).await
        }
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !is_memory_url(db_url) {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    #[cfg(test)]
    pub async fn ping(&self) -> Result<()> {
        use sea_orm::{ConnectionTrait, Statement};

        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn search_count_repo(&self) -> repositories::search_count::SearchCountRepository {
        repositories::search_count::SearchCountRepository::new(self.conn.clone())
    }

    pub async fn find_search_count(&self, term: &str) -> Result<Option<SearchCountRecord>> {
        self.search_count_repo().find_by_term(term).await
    }

    pub async fn create_search_count(
        &self,
        term: &str,
        movie_id: MovieId,
        poster_url: &str,
    ) -> Result<SearchCountRecord> {
        self.search_count_repo()
            .create(term, movie_id, poster_url)
            .await
    }

    pub async fn update_search_count(
        &self,
        id: &str,
        count: i64,
        movie_id: MovieId,
        poster_url: &str,
    ) -> Result<bool> {
        self.search_count_repo()
            .update(id, count, movie_id, poster_url)
            .await
    }

    pub async fn top_search_counts(&self, limit: u64) -> Result<Vec<SearchCountRecord>> {
        self.search_count_repo().top_by_count(limit).await
    }

    #[cfg(test)]
    pub async fn search_count_rows(&self, term: &str) -> Result<usize> {
        self.search_count_repo().count_rows(term).await
    }
}
