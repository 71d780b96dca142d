use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub customer_name: String,
    pub doc_number: String,
    pub email: String,
    pub movie_id: i64,
    pub room_id: i64,
    pub show_time: String,
    pub seats: Vec<String>,
    #[serde(default)]
    pub movie_title: String,
    #[serde(default)]
    pub room_name: String,
}

/// Бронь в том виде, в котором её отдаёт бэкенд: `seats` может прийти
/// как JSON-массив или как строка с сериализованным массивом.
#[derive(Debug, Clone, Deserialize)]
pub struct RawReservation {
    pub id: i64,
    #[serde(default)]
    pub customer_name: String,
    pub doc_number: String,
    #[serde(default)]
    pub email: String,
    pub movie_id: i64,
    pub room_id: i64,
    #[serde(default)]
    pub show_time: String,
    pub seats: Value,
    #[serde(default)]
    pub movie_title: String,
    #[serde(default)]
    pub room_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("reservation {reservation_id} has a malformed seat list: {reason}")]
    MalformedSeats { reservation_id: i64, reason: String },
}

impl TryFrom<RawReservation> for Reservation {
    type Error = DecodeError;

    fn try_from(raw: RawReservation) -> Result<Self, Self::Error> {
        let seats = decode_seats(raw.seats).map_err(|reason| DecodeError::MalformedSeats {
            reservation_id: raw.id,
            reason,
        })?;

        Ok(Reservation {
            id: raw.id,
            customer_name: raw.customer_name,
            doc_number: raw.doc_number,
            email: raw.email,
            movie_id: raw.movie_id,
            room_id: raw.room_id,
            show_time: raw.show_time,
            seats,
            movie_title: raw.movie_title,
            room_name: raw.room_name,
        })
    }
}

/// Декодирует список броней целиком; первая битая запись прерывает разбор.
pub fn decode_reservations(raw: Vec<RawReservation>) -> Result<Vec<Reservation>, DecodeError> {
    raw.into_iter().map(Reservation::try_from).collect()
}

fn decode_seats(value: Value) -> Result<Vec<String>, String> {
    match value {
        Value::Array(items) => seats_from_array(items),
        Value::String(encoded) => match serde_json::from_str::<Value>(&encoded) {
            Ok(Value::Array(items)) => seats_from_array(items),
            Ok(other) => Err(format!("expected an encoded array, got {}", kind(&other))),
            Err(e) => Err(format!("invalid encoded seat list: {e}")),
        },
        other => Err(format!("expected an array of seats, got {}", kind(&other))),
    }
}

fn seats_from_array(items: Vec<Value>) -> Result<Vec<String>, String> {
    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| match item {
            Value::String(seat) => Ok(seat),
            other => Err(format!("seat #{idx} is {} instead of a string", kind(&other))),
        })
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
