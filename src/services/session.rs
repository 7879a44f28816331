use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::models::{Movie, TrendingEntry};
use crate::services::debounce::spawn_debouncer;
use crate::services::search::{SearchService, SearchState};
use crate::services::trending::TrendingService;

/// Everything the presentation layer renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewState {
    pub is_loading: bool,
    pub error_message: String,
    pub movie_list: Vec<Movie>,
    pub trending_list: Vec<TrendingEntry>,
}

impl ViewState {
    fn compose(search: &SearchState, trending: &[TrendingEntry]) -> Self {
        Self {
            is_loading: search.is_loading,
            error_message: search.error_message.clone(),
            movie_list: search.movie_list.clone(),
            trending_list: trending.to_vec(),
        }
    }
}

/// One interactive search box: keystrokes in, [`ViewState`] out.
///
/// Starting a session performs the initial "popular movies" fetch (after one
/// debounce window) and loads the trending list. Dropping it stops its tasks.
pub struct SearchSession {
    input: mpsc::UnboundedSender<String>,
    view: watch::Sender<ViewState>,
    trending_list: Arc<watch::Sender<Vec<TrendingEntry>>>,
    trending: TrendingService,
    tasks: Vec<JoinHandle<()>>,
}

impl SearchSession {
    #[must_use]
    pub fn start(search: Arc<SearchService>, window: Duration) -> Self {
        let trending = search.trending().clone();
        let (trending_tx, _) = watch::channel(Vec::new());
        let trending_list = Arc::new(trending_tx);
        let (view, _) = watch::channel(ViewState::default());

        let (input, debouncer) = spawn_debouncer(window, Some(String::new()), {
            let search = search.clone();
            move |query| {
                debug!(query = %query, "Search text settled");
                let search = search.clone();
                tokio::spawn(async move { search.run_query(&query).await });
            }
        });

        let composer = tokio::spawn(compose_view(
            search.subscribe(),
            trending_list.subscribe(),
            view.clone(),
        ));

        let initial_trending = tokio::spawn(load_trending(trending.clone(), trending_list.clone()));

        Self {
            input,
            view,
            trending_list,
            trending,
            tasks: vec![debouncer, composer, initial_trending],
        }
    }

    /// Feeds the current contents of the search box. Call on every keystroke.
    pub fn set_search_text(&self, text: impl Into<String>) {
        if self.input.send(text.into()).is_err() {
            warn!("Search session input is closed; keystroke dropped");
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.view.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> ViewState {
        self.view.borrow().clone()
    }

    /// Reloads the trending list from the store.
    pub async fn refresh_trending(&self) {
        load_trending(self.trending.clone(), self.trending_list.clone()).await;
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

async fn load_trending(trending: TrendingService, list: Arc<watch::Sender<Vec<TrendingEntry>>>) {
    let entries = trending.get_trending().await;
    list.send_replace(entries);
}

async fn compose_view(
    mut search: watch::Receiver<SearchState>,
    mut trending: watch::Receiver<Vec<TrendingEntry>>,
    view: watch::Sender<ViewState>,
) {
    loop {
        let next = ViewState::compose(&search.borrow_and_update(), &trending.borrow_and_update());
        view.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });

        tokio::select! {
            changed = search.changed() => if changed.is_err() { break },
            changed = trending.changed() => if changed.is_err() { break },
        }
    }
}
