use std::sync::Arc;

use super::print_movies;
use crate::clients::tmdb::TmdbClient;
use crate::config::Config;
use crate::services::{SearchService, TrendingService};

pub async fn cmd_search(config: &Config, query: &str) -> anyhow::Result<()> {
    if query.is_empty() {
        println!("Fetching popular movies...");
    } else {
        println!("Searching for: {query}");
    }

    let catalog = Arc::new(TmdbClient::new(&config.catalog)?);
    let trending = TrendingService::from_config(config).await;
    let service = SearchService::new(catalog, trending);

    let movies = match service.search(query).await {
        Ok(movies) => movies,
        Err(e) => {
            println!("✗ {e}");
            return Ok(());
        }
    };

    if movies.is_empty() {
        println!("No movies found matching '{query}'");
        return Ok(());
    }

    println!();
    println!("Results ({} total):", movies.len());
    println!("{:-<60}", "");
    print_movies(&movies);

    Ok(())
}
