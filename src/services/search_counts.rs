//! Storage seam for search counters.

use crate::clients::appwrite::AppwriteError;
use crate::domain::MovieId;
use crate::models::SearchCountRecord;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("Store request failed: {0}")]
    Request(String),

    /// The store answered with a non-success status.
    #[error("Store returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Store response could not be decoded: {0}")]
    Decode(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<AppwriteError> for StoreError {
    fn from(err: AppwriteError) -> Self {
        match err {
            AppwriteError::Request(e) => Self::Request(e.to_string()),
            AppwriteError::Endpoint(e) => Self::Request(format!("invalid endpoint: {e}")),
            AppwriteError::Status { status, message } => Self::Status {
                status: status.as_u16(),
                message,
            },
            AppwriteError::Decode(e) => Self::Decode(e.to_string()),
        }
    }
}

/// Persistence for per-term search counters.
///
/// Implementations are plain data access: they report every failure. The
/// best-effort policy lives in [`crate::services::TrendingService`].
#[async_trait::async_trait]
pub trait SearchCountStore: Send + Sync {
    /// Short backend name for logs.
    fn backend(&self) -> &'static str;

    /// Exact-match lookup by search term.
    async fn find_by_term(&self, term: &str) -> Result<Option<SearchCountRecord>, StoreError>;

    /// Inserts a new counter with `count = 1`.
    async fn create(
        &self,
        term: &str,
        movie_id: MovieId,
        poster_url: &str,
    ) -> Result<SearchCountRecord, StoreError>;

    /// Writes `count`, `movie_id` and `poster_url` of an existing record.
    async fn update(&self, record: &SearchCountRecord) -> Result<(), StoreError>;

    /// Up to `limit` records, highest count first.
    async fn top_by_count(&self, limit: u64) -> Result<Vec<SearchCountRecord>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn appwrite_errors_keep_their_kind() {
        let err = StoreError::from(AppwriteError::Status {
            status: StatusCode::UNAUTHORIZED,
            message: "Project is not accessible".to_string(),
        });
        assert!(matches!(
            err,
            StoreError::Status { status: 401, ref message } if message == "Project is not accessible"
        ));

        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(
            StoreError::from(AppwriteError::Decode(decode)),
            StoreError::Decode(_)
        ));

        let endpoint = url::Url::parse("not a url").unwrap_err();
        assert!(matches!(
            StoreError::from(AppwriteError::Endpoint(endpoint)),
            StoreError::Request(_)
        ));
    }
}
