use crate::domain::MovieId;
use crate::entities::{prelude::*, search_counts};
use crate::models::SearchCountRecord;
use anyhow::Result;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::debug;

/// Repository for search counter rows
pub struct SearchCountRepository {
    conn: DatabaseConnection,
}

impl SearchCountRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(m: search_counts::Model) -> SearchCountRecord {
        SearchCountRecord {
            id: m.id,
            search_term: m.search_term,
            count: m.count,
            movie_id: MovieId::new(m.movie_id),
            poster_url: m.poster_url,
        }
    }

    pub async fn find_by_term(&self, term: &str) -> Result<Option<SearchCountRecord>> {
        let row = SearchCounts::find()
            .filter(search_counts::Column::SearchTerm.eq(term))
            .one(&self.conn)
            .await?;

        Ok(row.map(Self::map_model))
    }

    pub async fn create(
        &self,
        term: &str,
        movie_id: MovieId,
        poster_url: &str,
    ) -> Result<SearchCountRecord> {
        let now = chrono::Utc::now().to_rfc3339();
        let id = uuid::Uuid::new_v4().simple().to_string();

        let active_model = search_counts::ActiveModel {
            id: Set(id.clone()),
            search_term: Set(term.to_string()),
            count: Set(1),
            movie_id: Set(movie_id.value()),
            poster_url: Set(poster_url.to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        SearchCounts::insert(active_model)
            .exec_without_returning(&self.conn)
            .await?;

        debug!(term, id = %id, "Created search count row");

        Ok(SearchCountRecord {
            id,
            search_term: term.to_string(),
            count: 1,
            movie_id,
            poster_url: poster_url.to_string(),
        })
    }

    pub async fn update(
        &self,
        id: &str,
        count: i64,
        movie_id: MovieId,
        poster_url: &str,
    ) -> Result<bool> {
        let result = SearchCounts::update_many()
            .col_expr(
                search_counts::Column::Count,
                sea_orm::sea_query::Expr::value(count),
            )
            .col_expr(
                search_counts::Column::MovieId,
                sea_orm::sea_query::Expr::value(movie_id.value()),
            )
            .col_expr(
                search_counts::Column::PosterUrl,
                sea_orm::sea_query::Expr::value(poster_url),
            )
            .col_expr(
                search_counts::Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().to_rfc3339()),
            )
            .filter(search_counts::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn top_by_count(&self, limit: u64) -> Result<Vec<SearchCountRecord>> {
        let rows = SearchCounts::find()
            .order_by_desc(search_counts::Column::Count)
            .limit(limit)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    #[cfg(test)]
    pub async fn count_rows(&self, term: &str) -> Result<usize> {
        let rows = SearchCounts::find()
            .filter(search_counts::Column::SearchTerm.eq(term))
            .all(&self.conn)
            .await?;

        Ok(rows.len())
    }
}
