pub mod drafts;
pub mod movies;
pub mod records;
pub mod reservations;
pub mod rooms;

use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(movies::routes())
        .merge(rooms::routes())
        .merge(reservations::routes())
        .merge(records::routes())
        .merge(drafts::routes())
}

// Идентификаторы бэкенда всегда положительные
pub(crate) fn ensure_id(id: i64, what: &str) -> crate::error::AppResult<()> {
    if id <= 0 {
        return Err(crate::error::AppError::BadRequest(format!("{what} id must be > 0")));
    }
    Ok(())
}
