//! records.rs
//!
//! Отчёт по фильмам: брони, места, уникальные покупатели и распределение
//! мест по категориям. Считается заново на каждый запрос из актуальных
//! данных бэкенда.

use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

use crate::error::AppResult;
use crate::services::stats::{aggregate_with, MovieStat, RoomTiers};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/records", get(movie_records))
}

/// GET /api/records
async fn movie_records(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<MovieStat>>> {
    // Фильмы, брони и залы запрашиваем параллельно
    let (movies, reservations, rooms) = futures::try_join!(
        state.backend.get_movies(),
        state.backend.get_reservations(),
        state.backend.get_rooms()
    )?;

    let stats = aggregate_with(&movies, &reservations, &RoomTiers::new(&rooms));

    tracing::info!(
        "Records built: {} movies, {} reservations",
        stats.len(),
        reservations.len()
    );

    Ok(Json(stats))
}
