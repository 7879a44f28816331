use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, put},
};
use futures::stream::{self, Stream};
use std::{convert::Infallible, sync::Arc, time::Duration};
use tracing::warn;

use super::{ApiError, ApiResponse, AppState, SearchTextRequest};
use crate::services::ViewState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/session", get(get_view))
        .route("/session/search", put(set_search_text))
        .route("/session/trending/refresh", put(refresh_trending))
        .route("/session/events", get(sse_handler))
}

async fn get_view(State(state): State<Arc<AppState>>) -> Json<ApiResponse<ViewState>> {
    Json(ApiResponse::success(state.session().snapshot()))
}

/// Longest search text accepted from a client, in characters.
const MAX_SEARCH_TEXT: usize = 200;

async fn set_search_text(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchTextRequest>,
) -> Result<StatusCode, ApiError> {
    if request.text.chars().count() > MAX_SEARCH_TEXT {
        return Err(ApiError::validation(format!(
            "Search text must be at most {MAX_SEARCH_TEXT} characters"
        )));
    }

    state.session().set_search_text(request.text);
    Ok(StatusCode::ACCEPTED)
}

async fn refresh_trending(State(state): State<Arc<AppState>>) -> Json<ApiResponse<ViewState>> {
    state.session().refresh_trending().await;
    Json(ApiResponse::success(state.session().snapshot()))
}

/// Streams the current view, then every change to it.
async fn sse_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.session().subscribe();

    let stream = stream::unfold((rx, true), |(mut rx, first)| async move {
        if !first && rx.changed().await.is_err() {
            return None;
        }

        let view = rx.borrow_and_update().clone();
        let event = match serde_json::to_string(&view) {
            Ok(json) => Event::default().event("view").data(json),
            Err(e) => {
                warn!("Failed to serialize view state: {}", e);
                Event::default().event("warning").data("View state unavailable")
            }
        };

        Some((Ok(event), (rx, false)))
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
