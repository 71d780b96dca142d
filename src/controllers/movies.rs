use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use super::ensure_id;
use crate::error::AppResult;
use crate::models::{Movie, MovieForm};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/movies", get(list_movies).post(create_movie))
        .route("/movies/{id}", put(update_movie).delete(delete_movie))
}

// GET /api/movies
async fn list_movies(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Movie>>> {
    let movies = state.backend.get_movies().await?;
    Ok(Json(movies))
}

// POST /api/movies
async fn create_movie(
    State(state): State<Arc<AppState>>,
    Json(form): Json<MovieForm>,
) -> AppResult<impl IntoResponse> {
    form.validate()?;
    state.backend.register_movie(&form).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "message": "Movie registered" })),
    ))
}

// PUT /api/movies/{id}
async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(form): Json<MovieForm>,
) -> AppResult<impl IntoResponse> {
    ensure_id(id, "Movie")?;
    form.validate()?;
    state.backend.update_movie(id, &form).await?;

    Ok(Json(json!({ "success": true, "message": "Movie updated" })))
}

// DELETE /api/movies/{id}
async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    ensure_id(id, "Movie")?;
    state.backend.delete_movie(id).await?;

    Ok(Json(json!({ "success": true, "message": "Movie deleted" })))
}
