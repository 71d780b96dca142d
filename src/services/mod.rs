pub mod backend;
pub mod seat_map;
pub mod stats;

pub use backend::{BackendError, CinemaBackendClient};
