use serde::Serialize;

use crate::models::SeatId;

/// Выбранные места в порядке выбора.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SeatSelection {
    seats: Vec<SeatId>,
}

impl SeatSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавляет место, если его нет, иначе убирает.
    /// Возвращает `true`, если после вызова место выбрано.
    pub fn toggle(&mut self, seat: SeatId) -> bool {
        match self.seats.iter().position(|s| *s == seat) {
            Some(idx) => {
                self.seats.remove(idx);
                false
            }
            None => {
                self.seats.push(seat);
                true
            }
        }
    }

    pub fn contains(&self, seat: &SeatId) -> bool {
        self.seats.contains(seat)
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn seats(&self) -> &[SeatId] {
        &self.seats
    }

    pub fn clear(&mut self) {
        self.seats.clear();
    }
}

impl FromIterator<SeatId> for SeatSelection {
    fn from_iter<I: IntoIterator<Item = SeatId>>(iter: I) -> Self {
        let mut selection = SeatSelection::new();
        for seat in iter {
            if !selection.contains(&seat) {
                selection.seats.push(seat);
            }
        }
        selection
    }
}
