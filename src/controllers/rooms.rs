use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use super::ensure_id;
use crate::error::{AppError, AppResult};
use crate::models::{Room, RoomForm, SeatId};
use crate::services::{seat_map, BackendError};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rooms", get(list_rooms).post(create_room))
        .route("/rooms/{id}", put(update_room).delete(delete_room))
        .route("/rooms/{id}/seat-map", get(room_seat_map))
}

#[derive(Debug, Serialize)]
struct SeatMapResponse {
    room: Room,
    total_seats: usize,
    rows: Vec<SeatRow>,
}

#[derive(Debug, Serialize)]
struct SeatRow {
    row: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    tier: Option<String>,
    seats: Vec<SeatId>,
}

// GET /api/rooms
async fn list_rooms(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Room>>> {
    let rooms = state.backend.get_rooms().await?;
    Ok(Json(rooms))
}

// POST /api/rooms
async fn create_room(
    State(state): State<Arc<AppState>>,
    Json(form): Json<RoomForm>,
) -> AppResult<impl IntoResponse> {
    form.validate()?;
    state.backend.register_room(&form).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "message": "Room registered" })),
    ))
}

// PUT /api/rooms/{id}
async fn update_room(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(form): Json<RoomForm>,
) -> AppResult<impl IntoResponse> {
    ensure_id(id, "Room")?;
    form.validate()?;
    state.backend.update_room(id, &form).await?;

    Ok(Json(json!({ "success": true, "message": "Room updated" })))
}

// DELETE /api/rooms/{id}
//
// Бэкенд не даёт удалить зал, на который есть брони, и отвечает 4xx.
async fn delete_room(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    ensure_id(id, "Room")?;

    match state.backend.delete_room(id).await {
        Ok(()) => Ok(Json(json!({ "success": true, "message": "Room deleted" }))),
        Err(BackendError::Rejected { status, .. }) if (400..500).contains(&status) && status != 404 => {
            Err(AppError::Conflict(
                "Cannot delete a room with linked reservations".to_string(),
            ))
        }
        Err(e) => Err(e.into()),
    }
}

// GET /api/rooms/{id}/seat-map
async fn room_seat_map(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<Json<SeatMapResponse>> {
    ensure_id(id, "Room")?;

    let room = state
        .backend
        .get_room(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Room {id} not found")))?;
    seat_map::ensure_capacity(&room)?;

    let rows: Vec<SeatRow> = seat_map::generate_seat_map(room.capacity)
        .into_iter()
        .enumerate()
        .map(|(idx, seats)| {
            let row = idx as u32 + 1;
            SeatRow {
                row,
                tier: room.tier_for_row(row).map(str::to_string),
                seats,
            }
        })
        .collect();

    Ok(Json(SeatMapResponse {
        total_seats: rows.iter().map(|r| r.seats.len()).sum(),
        room,
        rows,
    }))
}
