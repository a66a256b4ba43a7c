//! Forum Error Types
//!
//! Question/answer error variants that integrate with the unified
//! `kernel::error::AppError` system.

use auth::AuthError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, conversions::classify_sqlx, kind::ErrorKind};
use thiserror::Error;

/// Forum-specific result type alias
pub type ForumResult<T> = Result<T, ForumError>;

/// Forum-specific error variants
#[derive(Debug, Error)]
pub enum ForumError {
    /// Absent, soft-deleted, or malformed id
    #[error("Question not found")]
    QuestionNotFound,

    #[error("Answer not found")]
    AnswerNotFound,

    /// Token subject has no user record
    #[error("User not found")]
    UserNotFound,

    /// Ownership or self-vote rule violated
    #[error("{0}")]
    Forbidden(&'static str),

    /// Unparseable list filter (author / user id)
    #[error("{0}")]
    InvalidFilter(&'static str),

    /// Request body failed validation
    #[error("{0}")]
    Validation(AppError),

    /// Author lookup failed
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ForumError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ForumError::QuestionNotFound | ForumError::AnswerNotFound | ForumError::UserNotFound => {
                ErrorKind::NotFound
            }
            ForumError::Forbidden(_) => ErrorKind::Forbidden,
            ForumError::InvalidFilter(_) => ErrorKind::BadRequest,
            ForumError::Validation(err) => err.kind(),
            ForumError::Auth(err) => err.kind(),
            ForumError::Database(e) => classify_sqlx(e).0,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            ForumError::Database(e) => {
                tracing::error!(error = %e, "Forum database error");
            }
            ForumError::Forbidden(reason) => {
                tracing::warn!(reason = %reason, "Forbidden forum action");
            }
            ForumError::Auth(err) => {
                tracing::error!(error = %err, "Author lookup failed");
            }
            _ => {
                tracing::debug!(error = %self, "Forum error");
            }
        }
    }
}

impl From<ForumError> for AppError {
    fn from(err: ForumError) -> Self {
        match err {
            ForumError::Validation(inner) => inner,
            ForumError::Auth(inner) => AppError::from(inner),
            ForumError::Database(e) => AppError::from(e),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }
}

impl IntoResponse for ForumError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}

impl From<AppError> for ForumError {
    fn from(err: AppError) -> Self {
        ForumError::Validation(err)
    }
}
