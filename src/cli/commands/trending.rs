use crate::config::Config;
use crate::services::TrendingService;

pub async fn cmd_trending(config: &Config) -> anyhow::Result<()> {
    let trending = TrendingService::from_config(config).await;

    if !trending.is_configured() {
        println!("Trending store is not configured.");
        println!("Set the APPWRITE_* variables or use store.backend = \"sqlite\".");
        return Ok(());
    }

    let entries = trending.get_trending().await;
    if entries.is_empty() {
        println!("No searches recorded yet.");
        return Ok(());
    }

    println!("Trending Searches");
    println!("{:-<60}", "");

    for (rank, entry) in entries.iter().enumerate() {
        println!(
            "{:>2}. {} ({} searches)",
            rank + 1,
            entry.search_term,
            entry.count
        );
        println!("    Movie ID: {} | Poster: {}", entry.movie_id, entry.poster_url);
    }

    Ok(())
}
