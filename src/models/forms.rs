//! Формы административного интерфейса.
//!
//! Все данные, которые уходят на бэкенд, сначала проходят проверку здесь:
//! фильм, зал и бронь. Ошибки валидации возвращаются клиенту как 400.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::room::SeatTier;
use super::seat::SeatId;

pub const GENRES: [&str; 6] = ["accion", "aventura", "comedia", "drama", "terror", "suspenso"];
pub const CLASSIFICATIONS: [&str; 5] = ["G", "PG", "PG-13", "R", "NC-17"];

const SHOW_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MovieForm {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(custom(function = "validate_genre"))]
    pub gender: String,
    #[validate(range(min = 1, message = "Invalid duration"))]
    pub duration: i32,
    #[validate(custom(function = "validate_classification"))]
    pub classification: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RoomForm {
    #[validate(length(min = 1, message = "Room name is required"))]
    pub name: String,
    #[validate(range(min = 1, max = 10000, message = "Capacity must be between 1 and 10000"))]
    pub capacity: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[validate(nested)]
    pub tiers: Vec<SeatTier>,
}

/// Данные покупателя и сеанса без зала и мест: их даёт черновик брони.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReservationDetails {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Customer name is required"))]
    pub customer_name: String,
    #[validate(length(min = 1, message = "Document number is required"))]
    pub doc_number: String,
    #[validate(range(min = 1, message = "Select a movie"))]
    pub movie_id: i64,
    #[validate(custom(function = "validate_show_time"))]
    pub show_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReservationForm {
    #[serde(flatten)]
    #[validate(nested)]
    pub details: ReservationDetails,
    #[validate(range(min = 1, message = "Select a room"))]
    pub room_id: i64,
    #[validate(length(min = 1, message = "Select at least one seat"))]
    pub seats: Vec<SeatId>,
}

fn validate_genre(gender: &str) -> Result<(), ValidationError> {
    one_of(gender, &GENRES, "genre", "Genre is required")
}

fn validate_classification(classification: &str) -> Result<(), ValidationError> {
    one_of(classification, &CLASSIFICATIONS, "classification", "Classification is required")
}

fn one_of(value: &str, allowed: &[&str], code: &'static str, message: &'static str) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        return Ok(());
    }
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err.add_param("value".into(), &value);
    Err(err)
}

/// Принимает значение `datetime-local` (с секундами или без) либо RFC 3339.
pub(crate) fn parse_show_time(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    SHOW_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

fn validate_show_time(show_time: &str) -> Result<(), ValidationError> {
    match parse_show_time(show_time) {
        Some(_) => Ok(()),
        None => {
            let mut err = ValidationError::new("show_time");
            err.message = Some("Show time must look like YYYY-MM-DDTHH:MM".into());
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::seat_map::MAX_CAPACITY;

    fn movie() -> MovieForm {
        MovieForm {
            title: "Alien".into(),
            gender: "terror".into(),
            duration: 117,
            classification: "R".into(),
        }
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

    #[test]
    fn accepts_a_complete_movie() {
        assert!(movie().validate().is_ok());
    }

    #[test]
    fn rejects_movie_with_bad_fields() {
        let mut form = movie();
        form.title.clear();
        form.duration = 0;
        form.classification = "X".into();

        let errors = form.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("duration"));
        assert!(fields.contains_key("classification"));
        assert!(!fields.contains_key("gender"));
    }

    #[test]
    fn room_capacity_is_bounded() {
        let form = RoomForm { name: "Sala 1".into(), capacity: 0, tiers: vec![] };
        assert!(form.validate().is_err());

        let form = RoomForm { capacity: 40, ..form };
        assert!(form.validate().is_ok());

        let form = RoomForm { capacity: MAX_CAPACITY, ..form };
        assert!(form.validate().is_ok());

        for capacity in [MAX_CAPACITY + 1, 1_000_000_000_000] {
            let form = RoomForm { capacity, ..form.clone() };
            assert!(form.validate().unwrap_err().field_errors().contains_key("capacity"));
        }
    }

    #[test]
    fn room_form_validates_nested_tiers() {
        let form = RoomForm {
            name: "Sala 1".into(),
            capacity: 40,
            tiers: vec![SeatTier { name: "VIP".into(), from_row: 4, to_row: 2 }],
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn show_time_accepts_datetime_local_and_rfc3339() {
        assert!(parse_show_time("2025-03-01T18:30").is_some());
        assert!(parse_show_time("2025-03-01T18:30:15").is_some());
        assert!(parse_show_time("2025-03-01T18:30:00Z").is_some());
        assert!(parse_show_time("2025-03-01T18:30:00-05:00").is_some());
        assert!(parse_show_time("tomorrow").is_none());
        assert!(parse_show_time("").is_none());
    }

    #[test]
    fn reservation_form_requires_seats_and_valid_details() {
        let form = ReservationForm { details: details(), room_id: 2, seats: vec![] };
        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("seats"));

        let mut bad = details();
        bad.email = "not-an-email".into();
        let form = ReservationForm { details: bad, room_id: 2, seats: vec![SeatId::new(1, 1)] };
        assert!(form.validate().is_err());

        let form = ReservationForm { details: details(), room_id: 2, seats: vec![SeatId::new(1, 1)] };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn reservation_form_serializes_flat() {
        let form = ReservationForm { details: details(), room_id: 2, seats: vec![SeatId::new(1, 3)] };
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["email"], "ana@example.com");
        assert_eq!(json["room_id"], 2);
        assert_eq!(json["seats"][0], "1-3");
    }
}
