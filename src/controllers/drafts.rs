//! drafts.rs
//!
//! Черновики броней: выбор зала, выбор мест по схеме зала и отправка брони.
//!
//! Каждая открытая форма работает со своим черновиком. Успешная отправка и
//! отмена сбрасывают черновик целиком, повторная отправка во время текущей
//! отклоняется с 409.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::ensure_id;
use crate::error::{AppError, AppResult};
use crate::models::{Reservation, ReservationDetails, Room, SeatId};
use crate::services::seat_map;
use crate::session::ReservationDraft;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/drafts", post(create_draft))
        .route("/drafts/{id}", get(get_draft).delete(discard_draft))
        .route("/drafts/{id}/room", put(select_room))
        .route("/drafts/{id}/seats", patch(toggle_seat))
        .route("/drafts/{id}/submit", post(submit_draft))
        .route("/drafts/{id}/cancel", post(cancel_draft))
        .route("/reservations/{id}/draft", post(edit_reservation_draft))
}

/* ---------- views ---------- */

#[derive(Debug, Serialize)]
struct DraftResponse {
    id: Uuid,
    room: Option<Room>,
    selected_seats: Vec<SeatId>,
    editing: Option<Reservation>,
    submitting: bool,
    seat_map: Vec<Vec<SeatCell>>,
}

#[derive(Debug, Serialize)]
struct SeatCell {
    seat: SeatId,
    selected: bool,
}

#[derive(Debug, Serialize)]
struct ToggleResponse {
    seat: SeatId,
    selected: bool,
    draft: DraftResponse,
}

fn view(id: Uuid, draft: &ReservationDraft) -> DraftResponse {
    let selection = draft.selection();
    let seat_map = draft
        .room()
        .map(|room| {
            seat_map::generate_seat_map(room.capacity)
                .into_iter()
                .map(|row| {
                    row.into_iter()
                        .map(|seat| SeatCell { selected: selection.contains(&seat), seat })
                        .collect()
                })
                .collect()
        })
        .unwrap_or_default();

    DraftResponse {
        id,
        room: draft.room().cloned(),
        selected_seats: selection.seats().to_vec(),
        editing: draft.editing().cloned(),
        submitting: draft.is_submitting(),
        seat_map,
    }
}

/* ---------- requests ---------- */

#[derive(Debug, Deserialize)]
struct SelectRoomRequest {
    room_id: i64,
}

#[derive(Debug, Deserialize)]
struct ToggleSeatRequest {
    seat: String,
}

/* ---------- DRAFTS ---------- */

// POST /api/drafts
async fn create_draft(State(state): State<Arc<AppState>>) -> AppResult<impl IntoResponse> {
    let id = state.drafts.create().await;
    let draft = state.drafts.with_draft(id, |d| Ok(view(id, d))).await?;
    Ok((StatusCode::CREATED, Json(draft)))
}

// POST /api/reservations/{id}/draft
async fn edit_reservation_draft(
    State(state): State<Arc<AppState>>,
    Path(reservation_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    ensure_id(reservation_id, "Reservation")?;

    let reservation = state
        .backend
        .get_reservation(reservation_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Reservation {reservation_id} not found")))?;

    let room = state.backend.get_room(reservation.room_id).await?.ok_or_else(|| {
        AppError::NotFound(format!(
            "Room {} of reservation {} not found",
            reservation.room_id, reservation_id
        ))
    })?;

    let id = state.drafts.insert(ReservationDraft::for_edit(reservation, room)?).await;
    let draft = state.drafts.with_draft(id, |d| Ok(view(id, d))).await?;
    Ok((StatusCode::CREATED, Json(draft)))
}

// GET /api/drafts/{id}
async fn get_draft(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DraftResponse>> {
    let draft = state.drafts.with_draft(id, |d| Ok(view(id, d))).await?;
    Ok(Json(draft))
}

// DELETE /api/drafts/{id}
async fn discard_draft(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if state.drafts.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("draft {id} not found")))
    }
}

// PUT /api/drafts/{id}/room
async fn select_room(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<SelectRoomRequest>,
) -> AppResult<Json<DraftResponse>> {
    ensure_id(req.room_id, "Room")?;

    // Зал берём у бэкенда до захвата блокировки черновиков
    let room = state
        .backend
        .get_room(req.room_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Room {} not found", req.room_id)))?;
    seat_map::ensure_capacity(&room)?;

    let draft = state
        .drafts
        .with_draft(id, |d| {
            d.select_room(room);
            Ok(view(id, d))
        })
        .await?;
    Ok(Json(draft))
}

// PATCH /api/drafts/{id}/seats
async fn toggle_seat(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<ToggleSeatRequest>,
) -> AppResult<Json<ToggleResponse>> {
    let seat: SeatId = req.seat.parse()?;

    let response = state
        .drafts
        .with_draft(id, |d| {
            let selected = d.toggle_seat(seat)?;
            Ok(ToggleResponse { seat, selected, draft: view(id, d) })
        })
        .await?;
    Ok(Json(response))
}

// POST /api/drafts/{id}/submit
async fn submit_draft(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(details): Json<ReservationDetails>,
) -> AppResult<impl IntoResponse> {
    let submission = state.drafts.with_draft(id, |d| d.begin_submit(details)).await?;

    let result = match submission.reservation_id {
        Some(reservation_id) => {
            state
                .backend
                .update_reservation(reservation_id, &submission.form)
                .await
        }
        None => state.backend.create_reservation(&submission.form).await,
    };

    // Черновик могли удалить, пока шла отправка
    let success = result.is_ok();
    if let Err(e) = state
        .drafts
        .with_draft(id, |d| {
            d.finish_submit(success);
            Ok(())
        })
        .await
    {
        warn!("Draft {} disappeared during submit: {}", id, e);
    }

    result?;

    match submission.reservation_id {
        Some(reservation_id) => {
            info!("Draft {} updated reservation {}", id, reservation_id);
            Ok((
                StatusCode::OK,
                Json(json!({ "success": true, "message": "Reservation updated" })),
            ))
        }
        None => {
            info!("Draft {} created a reservation with {} seats", id, submission.form.seats.len());
            Ok((
                StatusCode::CREATED,
                Json(json!({ "success": true, "message": "Reservation created" })),
            ))
        }
    }
}

// POST /api/drafts/{id}/cancel
async fn cancel_draft(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DraftResponse>> {
    let draft = state
        .drafts
        .with_draft(id, |d| {
            d.reset();
            Ok(view(id, d))
        })
        .await?;
    Ok(Json(draft))
}
