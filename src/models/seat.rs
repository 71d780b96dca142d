use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Идентификатор места в зале: `"<ряд>-<место>"`, нумерация с 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeatId {
    pub row: u32,
    pub column: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeatError {
    #[error("malformed seat identifier '{0}', expected '<row>-<column>'")]
    Malformed(String),
    #[error("seat {seat} does not exist in a room with capacity {capacity}")]
    OutOfRange { seat: String, capacity: i64 },
    #[error("room capacity {capacity} exceeds the supported maximum of {max} seats")]
    CapacityTooLarge { capacity: i64, max: i64 },
}

impl SeatId {
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Порядковый номер места в зале (1..=capacity).
    pub fn position(&self, seats_per_row: u32) -> u64 {
        u64::from(self.row.saturating_sub(1)) * u64::from(seats_per_row) + u64::from(self.column)
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.column)
    }
}

impl FromStr for SeatId {
    type Err = SeatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || SeatError::Malformed(s.to_string());

        let (row, column) = s.trim().split_once('-').ok_or_else(malformed)?;
        let row: u32 = row.parse().map_err(|_| malformed())?;
        let column: u32 = column.parse().map_err(|_| malformed())?;

        // Нулевых рядов и мест не бывает
        if row == 0 || column == 0 {
            return Err(malformed());
        }

        Ok(SeatId { row, column })
    }
}

impl Serialize for SeatId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SeatId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays_seat_ids() {
        let seat: SeatId = "3-7".parse().unwrap();
        assert_eq!(seat, SeatId::new(3, 7));
        assert_eq!(seat.to_string(), "3-7");
    }

    #[test]
    fn rejects_malformed_seat_ids() {
        for raw in ["", "3", "3-", "-7", "a-b", "0-1", "1-0", "1-2-3", "-1-2"] {
            assert!(
                matches!(raw.parse::<SeatId>(), Err(SeatError::Malformed(_))),
                "expected '{raw}' to be rejected"
            );
        }
    }

    #[test]
    fn position_is_row_major() {
        assert_eq!(SeatId::new(1, 1).position(10), 1);
        assert_eq!(SeatId::new(1, 10).position(10), 10);
        assert_eq!(SeatId::new(2, 5).position(10), 15);
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&SeatId::new(2, 3)).unwrap();
        assert_eq!(json, "\"2-3\"");

        let back: SeatId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SeatId::new(2, 3));
        assert!(serde_json::from_str::<SeatId>("\"x\"").is_err());
    }
}
