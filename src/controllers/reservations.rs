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
use crate::error::{AppError, AppResult};
use crate::models::{Reservation, ReservationForm};
use crate::services::seat_map;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reservations", get(list_reservations).post(create_reservation))
        .route("/reservations/{id}", put(update_reservation).delete(delete_reservation))
}

/* ---------- helpers ---------- */

/// Проверяет форму и то, что все места существуют в выбранном зале.
async fn check_form(state: &AppState, form: &ReservationForm) -> AppResult<()> {
    form.validate()?;

    let room = state
        .backend
        .get_room(form.room_id)
        .await?
        .ok_or_else(|| AppError::BadRequest(format!("Room {} does not exist", form.room_id)))?;

    seat_map::validate_seats(&room, &form.seats)?;
    Ok(())
}

/* ---------- RESERVATIONS ---------- */

// GET /api/reservations
async fn list_reservations(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Reservation>>> {
    let reservations = state.backend.get_reservations().await?;
    Ok(Json(reservations))
}

// POST /api/reservations
async fn create_reservation(
    State(state): State<Arc<AppState>>,
    Json(form): Json<ReservationForm>,
) -> AppResult<impl IntoResponse> {
    check_form(&state, &form).await?;
    state.backend.create_reservation(&form).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "message": "Reservation created" })),
    ))
}

// PUT /api/reservations/{id}
async fn update_reservation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(form): Json<ReservationForm>,
) -> AppResult<impl IntoResponse> {
    ensure_id(id, "Reservation")?;
    check_form(&state, &form).await?;
    state.backend.update_reservation(id, &form).await?;

    Ok(Json(json!({ "success": true, "message": "Reservation updated" })))
}

// DELETE /api/reservations/{id}
async fn delete_reservation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    ensure_id(id, "Reservation")?;
    state.backend.delete_reservation(id).await?;

    Ok(Json(json!({ "success": true, "message": "Reservation deleted" })))
}
