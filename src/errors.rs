use crate::models::HabitId;
use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("field '{field}' is required")]
    Validation { field: &'static str },

    #[error("habit {0} not found")]
    NotFound(HabitId),

    #[error("no habit selected")]
    NoActiveHabit,

    #[error("no habit ids left")]
    IdExhausted,

    #[error("day index {index} out of range (habit has {len} days)")]
    Index { index: usize, len: usize },
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }

    pub fn invalid_fields(fields: &[String]) -> Self {
        Self::bad_request(format!("invalid fields: {}", fields.join(", ")))
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation { .. } => Self::bad_request(err.to_string()),
            StoreError::IdExhausted => Self {
                status: StatusCode::CONFLICT,
                message: err.to_string(),
            },
            StoreError::NotFound(_) | StoreError::NoActiveHabit | StoreError::Index { .. } => {
                Self::not_found(err.to_string())
            }
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
