mod search;
mod serve;
mod trending;
mod watch;

pub use search::cmd_search;
pub use serve::cmd_serve;
pub use trending::cmd_trending;
pub use watch::cmd_watch;

use crate::models::Movie;

fn print_movies(movies: &[Movie]) {
    for movie in movies.iter().take(20) {
        let year = movie.release_year().unwrap_or("????");
        let rating = movie
            .vote_average
            .map_or_else(|| "-".to_string(), |v| format!("{v:.1}"));

        println!("• {} ({}) ★ {}", movie.title, year, rating);
        println!("  ID: {}", movie.id);
    }

    if movies.len() > 20 {
        println!("  ... and {} more", movies.len() - 20);
    }
}
