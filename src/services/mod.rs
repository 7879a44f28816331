pub mod catalog;
pub use catalog::MovieCatalog;

pub mod debounce;
pub use debounce::spawn_debouncer;

pub mod search;
pub use search::{SearchError, SearchService, SearchState};

pub mod search_counts;
pub use search_counts::{SearchCountStore, StoreError};

pub mod search_counts_impl;
pub use search_counts_impl::{AppwriteSearchCounts, SeaOrmSearchCounts};

pub mod session;
pub use session::{SearchSession, ViewState};

pub mod trending;
pub use trending::{RecordOutcome, TRENDING_LIMIT, TrendingService};
