//! Генерация схемы зала.
//!
//! Зал режется на ряды по десять мест, последний ряд может быть неполным.
//! Схема целиком определяется вместимостью, поэтому её можно пересчитывать
//! на каждый запрос.

use crate::models::{Room, SeatError, SeatId};

pub const SEATS_PER_ROW: u32 = 10;

/// Самый большой зал, для которого строится схема.
pub const MAX_CAPACITY: i64 = 10_000;

/// Строит схему зала построчно. Для вместимости <= 0 схема пустая,
/// вместимость больше [`MAX_CAPACITY`] обрезается до него.
pub fn generate_seat_map(capacity: i64) -> Vec<Vec<SeatId>> {
    if capacity <= 0 {
        return Vec::new();
    }
    let capacity = capacity.min(MAX_CAPACITY);

    let per_row = i64::from(SEATS_PER_ROW);
    let rows = (capacity - 1) / per_row + 1;

    (1..=rows)
        .map(|row| {
            let taken = (row - 1) * per_row;
            let in_row = (capacity - taken).min(per_row);
            (1..=in_row)
                .map(|column| SeatId::new(row as u32, column as u32))
                .collect()
        })
        .collect()
}

/// Отклоняет залы, схему которых мы не строим.
pub fn ensure_capacity(room: &Room) -> Result<(), SeatError> {
    if room.capacity > MAX_CAPACITY {
        return Err(SeatError::CapacityTooLarge {
            capacity: room.capacity,
            max: MAX_CAPACITY,
        });
    }
    Ok(())
}

/// Есть ли место в схеме зала заданной вместимости.
pub fn seat_in_map(capacity: i64, seat: &SeatId) -> bool {
    if capacity <= 0 || seat.column == 0 || seat.column > SEATS_PER_ROW || seat.row == 0 {
        return false;
    }
    seat.position(SEATS_PER_ROW) <= capacity as u64
}

/// Проверяет, что все места существуют в зале.
pub fn validate_seats<'a, I>(room: &Room, seats: I) -> Result<(), SeatError>
where
    I: IntoIterator<Item = &'a SeatId>,
{
    for seat in seats {
        if !seat_in_map(room.capacity, seat) {
            return Err(SeatError::OutOfRange {
                seat: seat.to_string(),
                capacity: room.capacity,
            });
        }
    }
    Ok(())
}
