use serde::{Deserialize, Serialize};

use crate::domain::MovieId;

/// A movie as returned by the catalog.
///
/// Only `id`, `title` and `poster_path` drive behaviour; the rest is carried
/// through untouched for whoever renders the list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
}

impl Movie {
    #[must_use]
    pub fn new(id: i64, title: impl Into<String>, poster_path: Option<&str>) -> Self {
        Self {
            id: MovieId::new(id),
            title: title.into(),
            poster_path: poster_path.map(String::from),
            overview: None,
            release_date: None,
            vote_average: None,
            original_language: None,
            popularity: None,
        }
    }

    /// Four-digit release year, when the catalog provided a date.
    #[must_use]
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|d| d.get(..4))
            .filter(|y| y.chars().all(|c| c.is_ascii_digit()))
    }
}
