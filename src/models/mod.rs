pub mod movie;
pub mod search_count;

pub use movie::Movie;
pub use search_count::{SearchCountRecord, TrendingEntry};
