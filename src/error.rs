use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::{
    dao::storage::StorageError, services::ranking::RankingError, state::live_state::LiveStateError,
};

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage backend is unavailable.
    #[error("storage unavailable")]
    Unavailable(#[source] StorageError),
    /// Application is running in degraded mode without storage.
    #[error("storage unavailable (degraded mode)")]
    Degraded,
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Participant index outside the live scoreboard.
    #[error("out of range: {0}")]
    OutOfRange(String),
    /// Recorded data cannot be interpreted (e.g. a malformed time).
    #[error("malformed data: {0}")]
    Format(String),
    /// A uniqueness rule rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Operation exceeded its timeout limit.
    #[error("operation timed out")]
    Timeout,
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Conflict { message } => ServiceError::Conflict(message),
            other => ServiceError::Unavailable(other),
        }
    }
}

impl From<LiveStateError> for ServiceError {
    fn from(err: LiveStateError) -> Self {
        match err {
            LiveStateError::OutOfRange { .. } => ServiceError::OutOfRange(err.to_string()),
            LiveStateError::WrongGameType { .. } => ServiceError::InvalidInput(err.to_string()),
        }
    }
}

impl From<RankingError> for ServiceError {
    fn from(err: RankingError) -> Self {
        ServiceError::Format(err.to_string())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest(format!("validation failed: {}", err))
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Conflict with current state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Stored data could not be processed.
    #[error("unprocessable: {0}")]
    Unprocessable(String),
    /// Service unavailable or degraded.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unavailable(source) => AppError::ServiceUnavailable(source.to_string()),
            ServiceError::Degraded => AppError::ServiceUnavailable("degraded mode".into()),
            ServiceError::InvalidInput(message) | ServiceError::OutOfRange(message) => {
                AppError::BadRequest(message)
            }
            ServiceError::Format(message) => AppError::Unprocessable(message),
            ServiceError::Conflict(message) => AppError::Conflict(message),
            ServiceError::NotFound(message) => AppError::NotFound(message),
            ServiceError::Timeout => AppError::ServiceUnavailable("operation timed out".into()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::GameType;

    fn status_of(err: ServiceError) -> StatusCode {
        AppError::from(err).into_response().status()
    }

    #[test]
    fn service_errors_map_to_status_codes() {
        assert_eq!(status_of(ServiceError::NotFound("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(status_of(ServiceError::InvalidInput("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(ServiceError::OutOfRange("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(ServiceError::Format("x".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(status_of(ServiceError::Conflict("x".into())), StatusCode::CONFLICT);
        assert_eq!(status_of(ServiceError::Degraded), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(status_of(ServiceError::Timeout), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn storage_conflict_surfaces_as_conflict() {
        let err: ServiceError = StorageError::conflict("duplicate").into();
        assert!(matches!(err, ServiceError::Conflict(message) if message == "duplicate"));
    }

    #[test]
    fn live_state_errors_keep_their_kind() {
        let out_of_range: ServiceError = LiveStateError::OutOfRange { index: 4, len: 2 }.into();
        assert!(matches!(out_of_range, ServiceError::OutOfRange(_)));

        let wrong_type: ServiceError = LiveStateError::WrongGameType {
            operation: "score",
            game_type: GameType::Individual,
        }
        .into();
        assert!(matches!(wrong_type, ServiceError::InvalidInput(_)));
    }
}
