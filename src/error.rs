//! Error types for the Kanisa server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error codes surfaced to API clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    NotAuthorized = 2,
    NoSuchUser = 3,
    NoSuchBook = 4,
    NoSuchCategory = 5,
    NoSuchBorrow = 6,
    BookUnavailable = 7,
    CategoryHasBooks = 8,
    BookBorrowed = 9,
    AlreadyReturned = 10,
    QrMalformed = 11,
    QrExpired = 12,
    BadValue = 13,
    Duplicate = 14,
    StorageFailure = 15,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No such user: {0}")]
    UnknownUser(i32),

    #[error("Book {0} is not available for borrowing")]
    BookUnavailable(i32),

    #[error("Category {category_id} still has {book_count} book(s)")]
    CategoryHasBooks { category_id: i32, book_count: usize },

    #[error("Book {0} is currently borrowed")]
    BookBorrowed(i32),

    #[error("Borrow record {0} has already been returned")]
    AlreadyReturned(i32),

    #[error("Malformed QR payload: {0}")]
    MalformedPayload(String),

    #[error("QR payload has expired")]
    ExpiredPayload,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Preference storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Authentication(msg) => {
                (StatusCode::UNAUTHORIZED, ErrorCode::NotAuthorized, msg.clone())
            }
            AppError::Authorization(msg) => {
                (StatusCode::FORBIDDEN, ErrorCode::NotAuthorized, msg.clone())
            }
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, ErrorCode::NoSuchBook, msg.clone())
            }
            AppError::UnknownUser(_) => {
                (StatusCode::NOT_FOUND, ErrorCode::NoSuchUser, self.to_string())
            }
            AppError::BookUnavailable(_) => {
                (StatusCode::CONFLICT, ErrorCode::BookUnavailable, self.to_string())
            }
            AppError::CategoryHasBooks { .. } => {
                (StatusCode::CONFLICT, ErrorCode::CategoryHasBooks, self.to_string())
            }
            AppError::BookBorrowed(_) => {
                (StatusCode::CONFLICT, ErrorCode::BookBorrowed, self.to_string())
            }
            AppError::AlreadyReturned(_) => {
                (StatusCode::CONFLICT, ErrorCode::AlreadyReturned, self.to_string())
            }
            AppError::MalformedPayload(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::QrMalformed, msg.clone())
            }
            AppError::ExpiredPayload => {
                (StatusCode::BAD_REQUEST, ErrorCode::QrExpired, self.to_string())
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
            AppError::Conflict(msg) => {
                (StatusCode::CONFLICT, ErrorCode::Duplicate, msg.clone())
            }
            AppError::Storage(msg) => {
                tracing::error!("Preference storage error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::StorageFailure,
                    "Preference storage error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
