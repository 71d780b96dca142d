use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    // Жанр; поле исторически называется gender на стороне бэкенда
    pub gender: String,
    /// Длительность в минутах.
    pub duration: i32,
    /// Возрастной рейтинг (G, PG, PG-13, R, NC-17).
    pub classification: String,
}
