use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use super::print_movies;
use crate::config::Config;
use crate::services::ViewState;
use crate::state::SharedState;

/// Reads search text line by line and prints every view change.
pub async fn cmd_watch(config: Config) -> anyhow::Result<()> {
    let state = SharedState::new(config).await?;
    let session = state.session.clone();
    let mut view = session.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Type to search; an empty line shows popular movies. Ctrl-D to quit.");

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(text) => session.set_search_text(text),
                None => break,
            },
            changed = view.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = view.borrow_and_update().clone();
                render(&snapshot);
            }
        }
    }

    debug!("Watch session finished");
    Ok(())
}

fn render(view: &ViewState) {
    if view.is_loading {
        println!("Loading...");
        return;
    }

    println!();
    if !view.error_message.is_empty() {
        println!("✗ {}", view.error_message);
    } else if view.movie_list.is_empty() {
        println!("No movies found.");
    } else {
        print_movies(&view.movie_list);
    }

    if !view.trending_list.is_empty() {
        let terms: Vec<&str> = view
            .trending_list
            .iter()
            .map(|e| e.search_term.as_str())
            .collect();
        println!("Trending: {}", terms.join(", "));
    }
}
