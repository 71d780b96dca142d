//! stats.rs
//!
//! Сводная статистика бронирований по фильмам.
//!
//! Для каждого фильма считается:
//! - количество броней и суммарное число мест;
//! - число уникальных покупателей (по номеру документа);
//! - распределение мест по категориям.
//!
//! Категория места определяется политикой [`SeatClassifier`]. По умолчанию
//! это префикс (номер ряда) первого места брони, при наличии зон у зала
//! используется название зоны.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::models::{Movie, Reservation, Room, SeatId};

/// Категория брони без мест.
pub const FALLBACK_CLASSIFICATION: &str = "General";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieStat {
    pub movie: Movie,
    pub total_reservations: usize,
    pub total_seats: usize,
    pub unique_customers: usize,
    pub seats_by_classification: BTreeMap<String, usize>,
    pub reservations: Vec<Reservation>,
}

/// Политика группировки мест брони по категориям.
pub trait SeatClassifier {
    fn classify(&self, reservation: &Reservation) -> String;
}

/// Префикс первого места до первого `-`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowPrefix;

impl SeatClassifier for RowPrefix {
    fn classify(&self, reservation: &Reservation) -> String {
        reservation
            .seats
            .first()
            .map(|seat| seat.split('-').next().unwrap_or_default())
            .filter(|prefix| !prefix.is_empty())
            .unwrap_or(FALLBACK_CLASSIFICATION)
            .to_string()
    }
}

/// Зоны зала по рядам; если зона не найдена, работает [`RowPrefix`].
#[derive(Debug, Clone)]
pub struct RoomTiers<'a> {
    rooms: HashMap<i64, &'a Room>,
}

impl<'a> RoomTiers<'a> {
    pub fn new(rooms: &'a [Room]) -> Self {
        Self {
            rooms: rooms.iter().map(|room| (room.id, room)).collect(),
        }
    }
}

impl SeatClassifier for RoomTiers<'_> {
    fn classify(&self, reservation: &Reservation) -> String {
        let tier = self.rooms.get(&reservation.room_id).and_then(|room| {
            let seat: SeatId = reservation.seats.first()?.parse().ok()?;
            room.tier_for_row(seat.row)
        });

        match tier {
            Some(name) => name.to_string(),
            None => RowPrefix.classify(reservation),
        }
    }
}

/// Статистика с группировкой мест по номеру ряда.
pub fn aggregate(movies: &[Movie], reservations: &[Reservation]) -> Vec<MovieStat> {
    aggregate_with(movies, reservations, &RowPrefix)
}

/// Одна запись на каждый фильм в порядке входного списка; фильмы без броней
/// получают нулевую статистику.
pub fn aggregate_with(
    movies: &[Movie],
    reservations: &[Reservation],
    classifier: &dyn SeatClassifier,
) -> Vec<MovieStat> {
    movies
        .iter()
        .map(|movie| {
            let movie_reservations: Vec<Reservation> = reservations
                .iter()
                .filter(|r| r.movie_id == movie.id)
                .cloned()
                .collect();

            let customers: HashSet<&str> = movie_reservations
                .iter()
                .map(|r| r.doc_number.as_str())
                .collect();

            let mut seats_by_classification = BTreeMap::new();
            for reservation in &movie_reservations {
                *seats_by_classification
                    .entry(classifier.classify(reservation))
                    .or_insert(0) += reservation.seats.len();
            }

            MovieStat {
                movie: movie.clone(),
                total_reservations: movie_reservations.len(),
                total_seats: movie_reservations.iter().map(|r| r.seats.len()).sum(),
                unique_customers: customers.len(),
                seats_by_classification,
                reservations: movie_reservations,
            }
        })
        .collect()
}
