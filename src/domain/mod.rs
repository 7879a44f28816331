//! Domain types for movie discovery with strong typing.
//!
//! This module provides the type-safe primitives shared by the catalog client,
//! the search orchestration and the trending aggregation. It follows the
//! Newtype pattern to keep external catalog ids apart from store document ids.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a movie in the remote catalog.
///
/// # Examples
///
/// ```rust
/// use reelscout::domain::MovieId;
///
/// let id = MovieId::new(438631);
/// assert_eq!(id.value(), 438631);
/// assert_eq!(id.to_string(), "438631");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MovieId(i64);

impl MovieId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<MovieId> for i64 {
    fn from(id: MovieId) -> Self {
        id.0
    }
}

impl From<i64> for MovieId {
    fn from(id: i64) -> Self {
        Self::new(id)
    }
}

impl Serialize for MovieId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for MovieId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        i64::deserialize(deserializer).map(Self)
    }
}

/// What the catalog is asked for.
///
/// An empty input means "show what is popular"; anything else is a title
/// search. The term is kept verbatim because it doubles as the key of the
/// search-count record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CatalogQuery {
    DiscoverPopular,
    SearchByTerm(String),
}

impl CatalogQuery {
    #[must_use]
    pub fn from_input(input: &str) -> Self {
        if input.is_empty() {
            Self::DiscoverPopular
        } else {
            Self::SearchByTerm(input.to_string())
        }
    }

    /// Full request URL for this query against the catalog base URL.
    #[must_use]
    pub fn endpoint(&self, base_url: &str) -> String {
        let base = base_url.trim_end_matches('/');
        match self {
            Self::DiscoverPopular => format!("{base}/discover/movie?sort_by=popularity.desc"),
            Self::SearchByTerm(term) => {
                format!("{base}/search/movie?query={}", urlencoding::encode(term))
            }
        }
    }

    /// The term a successful search is counted under, if any.
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        match self {
            Self::DiscoverPopular => None,
            Self::SearchByTerm(term) => Some(term),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> &'static str {
        match self {
            Self::DiscoverPopular => "discover",
            Self::SearchByTerm(_) => "search",
        }
    }
}

impl fmt::Display for CatalogQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DiscoverPopular => write!(f, "<popular>"),
            Self::SearchByTerm(term) => write!(f, "{term}"),
        }
    }
}
