use axum::{
    Json,
    extract::{Query, State},
};
use std::sync::Arc;
use tracing::info;

use super::{ApiError, ApiResponse, AppState, MovieQuery};
use crate::models::{Movie, TrendingEntry};

pub async fn search_movies(
    State(state): State<Arc<AppState>>,
    Query(request): Query<MovieQuery>,
) -> Result<Json<ApiResponse<Vec<Movie>>>, ApiError> {
    let movies = state.search_service().search(&request.query).await?;

    info!(
        query = %request.query,
        results = movies.len(),
        "Movie search finished"
    );

    Ok(Json(ApiResponse::success(movies)))
}

pub async fn get_trending(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<Vec<TrendingEntry>>> {
    Json(ApiResponse::success(state.trending().get_trending().await))
}
