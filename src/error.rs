use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::models::SeatError;
use crate::services::backend::BackendError;
use crate::session::DraftError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Seat(#[from] SeatError),
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Seat(SeatError::CapacityTooLarge { .. })
            | AppError::Draft(DraftError::Seat(SeatError::CapacityTooLarge { .. })) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::BadRequest(_) | AppError::Validation(_) | AppError::Seat(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Draft(e) => match e {
                DraftError::NotFound(_) => StatusCode::NOT_FOUND,
                DraftError::SubmitInProgress => StatusCode::CONFLICT,
                DraftError::NoRoomSelected
                | DraftError::NoSeatsSelected
                | DraftError::Seat(_)
                | DraftError::Invalid(_) => StatusCode::BAD_REQUEST,
            },
            AppError::Backend(e) => match e {
                BackendError::CircuitOpen => StatusCode::SERVICE_UNAVAILABLE,
                BackendError::Rejected { status, .. } if *status == 404 => StatusCode::NOT_FOUND,
                BackendError::Rejected { status, .. } if *status < 500 => StatusCode::CONFLICT,
                BackendError::Transport(_) | BackendError::Rejected { .. } | BackendError::Decode(_) => {
                    StatusCode::BAD_GATEWAY
                }
            },
        }
    }

    fn field_errors(&self) -> Option<&ValidationErrors> {
        match self {
            AppError::Validation(errors) | AppError::Draft(DraftError::Invalid(errors)) => Some(errors),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected ({}): {}", status, self);
        }

        let body = match self.field_errors() {
            Some(errors) => json!({
                "success": false,
                "error": "Validation failed",
                "fields": errors,
            }),
            None => json!({
                "success": false,
                "error": self.to_string(),
            }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DecodeError;

    #[test]
    fn maps_backend_failures_to_gateway_statuses() {
        let open = AppError::from(BackendError::CircuitOpen);
        assert_eq!(open.status(), StatusCode::SERVICE_UNAVAILABLE);

        let decode = AppError::from(BackendError::Decode(DecodeError::MalformedSeats {
            reservation_id: 1,
            reason: "bad".into(),
        }));
        assert_eq!(decode.status(), StatusCode::BAD_GATEWAY);

        let rejected = |status| {
            AppError::from(BackendError::Rejected {
                operation: "delete-room",
                status,
                message: String::new(),
            })
            .status()
        };
        assert_eq!(rejected(400), StatusCode::CONFLICT);
        assert_eq!(rejected(404), StatusCode::NOT_FOUND);
        assert_eq!(rejected(503), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn maps_draft_errors() {
        assert_eq!(AppError::from(DraftError::SubmitInProgress).status(), StatusCode::CONFLICT);
        assert_eq!(AppError::from(DraftError::NoSeatsSelected).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::from(DraftError::NotFound(uuid::Uuid::new_v4())).status(),
            StatusCode::NOT_FOUND
        );
        let oversized = SeatError::CapacityTooLarge { capacity: 20_000, max: 10_000 };
        assert_eq!(
            AppError::from(DraftError::Seat(oversized)).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
