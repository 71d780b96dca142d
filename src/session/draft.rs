use std::time::{Duration, Instant};
use thiserror::Error;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use super::selection::SeatSelection;
use crate::models::{ReservationDetails, ReservationForm, Reservation, Room, SeatError, SeatId};
use crate::services::seat_map;

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("draft {0} not found")]
    NotFound(Uuid),
    #[error("select a room before choosing seats")]
    NoRoomSelected,
    #[error("select at least one seat")]
    NoSeatsSelected,
    #[error("a submission for this draft is already in progress")]
    SubmitInProgress,
    #[error(transparent)]
    Seat(#[from] SeatError),
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),
}

/// Готовая к отправке бронь, снятая с черновика.
#[derive(Debug, Clone)]
pub struct Submission {
    /// `Some(id)` при редактировании существующей брони.
    pub reservation_id: Option<i64>,
    pub form: ReservationForm,
}

/// Состояние одной формы бронирования.
///
/// Всё, что раньше жило в разрозненных переменных формы (выбранный зал,
/// места, редактируемая бронь, флаг отправки), собрано здесь и сбрасывается
/// одним вызовом [`ReservationDraft::reset`].
#[derive(Debug, Clone)]
pub struct ReservationDraft {
    room: Option<Room>,
    selection: SeatSelection,
    editing: Option<Reservation>,
    /// Момент начала текущей отправки.
    submit_started: Option<Instant>,
    last_touched: Instant,
}

impl Default for ReservationDraft {
    fn default() -> Self {
        Self {
            room: None,
            selection: SeatSelection::new(),
            editing: None,
            submit_started: None,
            last_touched: Instant::now(),
        }
    }
}

impl ReservationDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Черновик для редактирования: зал и места берутся из брони.
    pub fn for_edit(reservation: Reservation, room: Room) -> Result<Self, DraftError> {
        let seats = reservation
            .seats
            .iter()
            .map(|raw| raw.parse::<SeatId>())
            .collect::<Result<Vec<_>, _>>()?;
        seat_map::ensure_capacity(&room)?;
        seat_map::validate_seats(&room, &seats)?;

        Ok(Self {
            room: Some(room),
            selection: seats.into_iter().collect(),
            editing: Some(reservation),
            ..Self::default()
        })
    }

    pub fn room(&self) -> Option<&Room> {
        self.room.as_ref()
    }

    pub fn selection(&self) -> &SeatSelection {
        &self.selection
    }

    pub fn editing(&self) -> Option<&Reservation> {
        self.editing.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submit_started.is_some()
    }

    /// Снимает флаг отправки, начатой дольше `stale_after` назад.
    /// Обработчик, потерявший клиента посреди отправки, до `finish_submit`
    /// не доходит, а запрос к бэкенду к этому моменту уже оборван по таймауту.
    pub fn release_stale_submit(&mut self, stale_after: Duration) -> bool {
        match self.submit_started {
            Some(started) if started.elapsed() >= stale_after => {
                self.submit_started = None;
                true
            }
            _ => false,
        }
    }

    pub fn touch(&mut self) {
        self.last_touched = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.last_touched.elapsed()
    }

    /// Смена зала сбрасывает выбор мест: места другого зала не имеют смысла.
    pub fn select_room(&mut self, room: Room) {
        let same_room = self
            .room
            .as_ref()
            .is_some_and(|current| current.id == room.id && current.capacity == room.capacity);
        if !same_room {
            self.selection.clear();
        }
        self.room = Some(room);
    }

    pub fn toggle_seat(&mut self, seat: SeatId) -> Result<bool, DraftError> {
        let room = self.room.as_ref().ok_or(DraftError::NoRoomSelected)?;
        seat_map::validate_seats(room, [&seat])?;
        Ok(self.selection.toggle(seat))
    }

    /// Проверяет форму и помечает черновик как отправляемый.
    /// Повторный вызов до [`finish_submit`](Self::finish_submit) отклоняется.
    pub fn begin_submit(&mut self, details: ReservationDetails) -> Result<Submission, DraftError> {
        if self.is_submitting() {
            return Err(DraftError::SubmitInProgress);
        }
        let room = self.room.as_ref().ok_or(DraftError::NoRoomSelected)?;
        if self.selection.is_empty() {
            return Err(DraftError::NoSeatsSelected);
        }
        seat_map::validate_seats(room, self.selection.seats())?;

        let form = ReservationForm {
            details,
            room_id: room.id,
            seats: self.selection.seats().to_vec(),
        };
        form.validate()?;

        self.submit_started = Some(Instant::now());
        Ok(Submission {
            reservation_id: self.editing.as_ref().map(|r| r.id),
            form,
        })
    }

    /// Успешная отправка очищает черновик, неуспешная только снимает флаг.
    pub fn finish_submit(&mut self, success: bool) {
        if success {
            self.reset();
        } else {
            self.submit_started = None;
        }
    }

    pub fn reset(&mut self) {
        self.room = None;
        self.selection.clear();
        self.editing = None;
        self.submit_started = None;
        self.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(id: i64, capacity: i64) -> Room {
        Room { id, name: format!("Sala {id}"), capacity, tiers: vec![] }
    }

    fn details() -> ReservationDetails {
        ReservationDetails {
            email: "ana@example.com".into(),
            customer_name: "Ana".into(),
            doc_number: "CC-1".into(),
            movie_id: 1,
            show_time: "2025-03-01T18:30".into(),
        }
    }

    fn reservation(seats: &[&str]) -> Reservation {
        Reservation {
            id: 42,
            customer_name: "Ana".into(),
            doc_number: "CC-1".into(),
            email: "ana@example.com".into(),
            movie_id: 1,
            room_id: 3,
            show_time: "2025-03-01T18:30".into(),
            seats: seats.iter().map(|s| s.to_string()).collect(),
            movie_title: "Alien".into(),
            room_name: "Sala 3".into(),
        }
    }

    #[test]
    fn seats_need_a_room() {
        let mut draft = ReservationDraft::new();
        assert!(matches!(draft.toggle_seat(SeatId::new(1, 1)), Err(DraftError::NoRoomSelected)));
    }

    #[test]
    fn rejects_seats_outside_the_room() {
        let mut draft = ReservationDraft::new();
        draft.select_room(room(1, 15));

        assert!(draft.toggle_seat(SeatId::new(2, 5)).unwrap());
        assert!(matches!(
            draft.toggle_seat(SeatId::new(2, 6)),
            Err(DraftError::Seat(SeatError::OutOfRange { .. }))
        ));
        assert_eq!(draft.selection().len(), 1);
    }

    #[test]
    fn switching_rooms_clears_selection() {
        let mut draft = ReservationDraft::new();
        draft.select_room(room(1, 20));
        draft.toggle_seat(SeatId::new(1, 1)).unwrap();

        draft.select_room(room(1, 20));
        assert_eq!(draft.selection().len(), 1);

        draft.select_room(room(2, 20));
        assert!(draft.selection().is_empty());
    }

    #[test]
    fn submit_requires_seats() {
        let mut draft = ReservationDraft::new();
        draft.select_room(room(1, 20));
        assert!(matches!(draft.begin_submit(details()), Err(DraftError::NoSeatsSelected)));
        assert!(!draft.is_submitting());
    }

    #[test]
    fn invalid_details_do_not_lock_the_draft() {
        let mut draft = ReservationDraft::new();
        draft.select_room(room(1, 20));
        draft.toggle_seat(SeatId::new(1, 1)).unwrap();

        let mut bad = details();
        bad.email = "nope".into();
        assert!(matches!(draft.begin_submit(bad), Err(DraftError::Invalid(_))));
        assert!(!draft.is_submitting());
    }

    #[test]
    fn double_submit_is_rejected() {
        let mut draft = ReservationDraft::new();
        draft.select_room(room(1, 20));
        draft.toggle_seat(SeatId::new(1, 3)).unwrap();

        let submission = draft.begin_submit(details()).unwrap();
        assert_eq!(submission.reservation_id, None);
        assert_eq!(submission.form.room_id, 1);
        assert_eq!(submission.form.seats, vec![SeatId::new(1, 3)]);

        assert!(matches!(draft.begin_submit(details()), Err(DraftError::SubmitInProgress)));

        draft.finish_submit(false);
        assert!(!draft.is_submitting());
        assert_eq!(draft.selection().len(), 1);
        assert!(draft.begin_submit(details()).is_ok());
    }

    #[test]
    fn abandoned_submit_is_released_after_timeout() {
        let mut draft = ReservationDraft::new();
        draft.select_room(room(1, 20));
        draft.toggle_seat(SeatId::new(2, 2)).unwrap();
        draft.begin_submit(details()).unwrap();

        assert!(!draft.release_stale_submit(Duration::from_secs(60)));
        assert!(draft.is_submitting());

        assert!(draft.release_stale_submit(Duration::ZERO));
        assert!(!draft.is_submitting());
        assert_eq!(draft.selection().seats(), &[SeatId::new(2, 2)]);
        assert!(draft.begin_submit(details()).is_ok());
    }

    #[test]
    fn successful_submit_resets_everything() {
        let mut draft = ReservationDraft::for_edit(reservation(&["1-1", "2-4"]), room(3, 30)).unwrap();
        let submission = draft.begin_submit(details()).unwrap();
        assert_eq!(submission.reservation_id, Some(42));

        draft.finish_submit(true);
        assert!(draft.room().is_none());
        assert!(draft.selection().is_empty());
        assert!(draft.editing().is_none());
        assert!(!draft.is_submitting());
    }

    #[test]
    fn edit_draft_rejects_seats_outside_the_room() {
        let err = ReservationDraft::for_edit(reservation(&["5-1"]), room(3, 30)).unwrap_err();
        assert!(matches!(err, DraftError::Seat(SeatError::OutOfRange { .. })));

        let err = ReservationDraft::for_edit(reservation(&["A1"]), room(3, 30)).unwrap_err();
        assert!(matches!(err, DraftError::Seat(SeatError::Malformed(_))));
    }
}
