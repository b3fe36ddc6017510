use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    config::MAX_RANDOM_POSTERS,
    error::{AppError, AppResult},
    models::{MovieRecord, RecommendationResult},
};

use super::AppState;

const DEFAULT_SEARCH_LIMIT: usize = 20;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    pub q: String,
    pub n: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RandomPostersQuery {
    pub n: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RandomPostersResponse {
    pub posters: Vec<String>,
}

// Handlers

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "healthy", "movies": state.catalog.len() })),
    )
}

/// Recommend movies similar to the first title matching `q`
pub async fn recommend(
    State(state): State<AppState>,
    Query(params): Query<RecommendQuery>,
) -> AppResult<Json<RecommendationResult>> {
    let n = params.n.unwrap_or(state.config.default_recommendations);
    if n > state.config.max_recommendations {
        return Err(AppError::InvalidInput(format!(
            "n must be at most {}",
            state.config.max_recommendations
        )));
    }

    let result = state.engine.recommend(&params.q, n).await;
    Ok(Json(result))
}

/// List catalog titles containing `q`
pub async fn search_titles(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<MovieRecord>>> {
    if params.q.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Search query cannot be empty".to_string(),
        ));
    }

    let limit = params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
    let titles: Vec<MovieRecord> = state
        .catalog
        .search(&params.q, limit)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(titles))
}

/// Posters of randomly chosen catalog movies, for decoration
pub async fn random_posters(
    State(state): State<AppState>,
    Query(params): Query<RandomPostersQuery>,
) -> AppResult<Json<RandomPostersResponse>> {
    let n = params.n.unwrap_or(state.config.random_poster_count);
    if n > MAX_RANDOM_POSTERS {
        return Err(AppError::InvalidInput(format!(
            "n must be at most {}",
            MAX_RANDOM_POSTERS
        )));
    }

    let posters = state.posters.sample_random_posters(&state.catalog, n).await;
    Ok(Json(RandomPostersResponse { posters }))
}
