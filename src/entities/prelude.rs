pub use super::search_counts::Entity as SearchCounts;
