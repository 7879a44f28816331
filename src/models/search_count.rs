use serde::{Deserialize, Serialize};

use crate::domain::MovieId;

/// Persisted counter for one search term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCountRecord {
    /// Store-generated document id.
    pub id: String,
    pub search_term: String,
    pub count: i64,
    pub movie_id: MovieId,
    pub poster_url: String,
}

/// One row of the trending list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendingEntry {
    pub id: String,
    pub search_term: String,
    pub count: i64,
    pub movie_id: MovieId,
    pub poster_url: String,
}

impl From<SearchCountRecord> for TrendingEntry {
    fn from(record: SearchCountRecord) -> Self {
        Self {
            id: record.id,
            search_term: record.search_term,
            count: record.count,
            movie_id: record.movie_id,
            poster_url: record.poster_url,
        }
    }
}
