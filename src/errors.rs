//! Centralized error handling.
//!
//! Every business-rule violation is a structured `AppError` variant returned
//! to the caller; only storage-layer failures surface as 500s.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication & Authorization
    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    #[error("Invalid credentials")]
    InvalidCredentials,

    // Resource errors
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("A user with this email already exists")]
    DuplicateEmail,

    // Booking admission
    #[error("End date must be after start date")]
    InvalidRange,

    #[error("No rooms specified for the booking")]
    EmptyRoomSet,

    #[error("Room {0} is not available for booking")]
    RoomUnavailable(Uuid),

    #[error("One or more rooms are already booked for these dates")]
    DateConflict,

    // Lifecycle guards
    #[error("Requester account is not active")]
    RequesterNotActive,

    #[error("Owner account is not active")]
    OwnerNotActive,

    #[error("Acting user is not active")]
    ActorNotActive,

    #[error("{0} is already archived")]
    AlreadyArchived(&'static str),

    #[error("Archived rooms cannot be modified")]
    ArchivedImmutable,

    #[error("Invalid state transition: {0}")]
    InvalidTransition(&'static str),

    // Field validation
    #[error("Price cannot be negative")]
    NegativePrice,

    #[error("Name cannot be empty")]
    EmptyName,

    #[error("{0}")]
    Validation(String),

    // External service errors
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[error("Authentication error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl AppError {
    /// Get error code for client
    fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::DuplicateEmail => "DUPLICATE_EMAIL",
            AppError::InvalidRange => "INVALID_RANGE",
            AppError::EmptyRoomSet => "EMPTY_ROOM_SET",
            AppError::RoomUnavailable(_) => "ROOM_UNAVAILABLE",
            AppError::DateConflict => "DATE_CONFLICT",
            AppError::RequesterNotActive => "REQUESTER_NOT_ACTIVE",
            AppError::OwnerNotActive => "OWNER_NOT_ACTIVE",
            AppError::ActorNotActive => "ACTOR_NOT_ACTIVE",
            AppError::AlreadyArchived(_) => "ALREADY_ARCHIVED",
            AppError::ArchivedImmutable => "ARCHIVED_IMMUTABLE",
            AppError::InvalidTransition(_) => "INVALID_TRANSITION",
            AppError::NegativePrice => "NEGATIVE_PRICE",
            AppError::EmptyName => "EMPTY_NAME",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Jwt(_) => "AUTH_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::InvalidCredentials | AppError::Jwt(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateEmail | AppError::DateConflict => StatusCode::CONFLICT,
            AppError::InvalidRange
            | AppError::EmptyRoomSet
            | AppError::NegativePrice
            | AppError::EmptyName
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::RoomUnavailable(_)
            | AppError::RequesterNotActive
            | AppError::OwnerNotActive
            | AppError::ActorNotActive
            | AppError::AlreadyArchived(_)
            | AppError::ArchivedImmutable
            | AppError::InvalidTransition(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    fn user_message(&self) -> String {
        match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                "A database error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    /// True when the database aborted a serializable transaction because
    /// of concurrent access (Postgres SQLSTATE 40001).
    pub fn is_serialization_failure(&self) -> bool {
        match self {
            AppError::Database(e) => {
                let msg = e.to_string();
                msg.contains("could not serialize access") || msg.contains("40001")
            }
            _ => false,
        }
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
