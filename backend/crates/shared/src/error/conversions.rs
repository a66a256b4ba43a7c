//! Error conversions - From implementations for common error types
//!
//! Provides automatic conversion from common error types to [`AppError`]
//! and the HTTP rendering of [`AppError`].

use super::app_error::AppError;
#[cfg(feature = "sqlx")]
use super::kind::ErrorKind;

// ============================================================================
// SQLx conversions (feature-gated)
// ============================================================================

/// Kind and public message for a database failure
///
/// Pool exhaustion and connection loss are `ServiceUnavailable`; anything
/// without a known SQLSTATE is a plain 500.
#[cfg(feature = "sqlx")]
pub fn classify_sqlx(err: &sqlx::Error) -> (ErrorKind, &'static str) {
    match err {
        sqlx::Error::RowNotFound => (ErrorKind::NotFound, "Record not found"),
        sqlx::Error::PoolTimedOut => (
            ErrorKind::ServiceUnavailable,
            "Database connection pool exhausted",
        ),
        sqlx::Error::Io(_) => (ErrorKind::ServiceUnavailable, "Database connection error"),
        // https://www.postgresql.org/docs/current/errcodes-appendix.html
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some("23502") => (ErrorKind::BadRequest, "Required field is null"),
            Some("23503") => (ErrorKind::Conflict, "Foreign key violation"),
            Some("23505") => (ErrorKind::Conflict, "Duplicate key value"),
            Some("23514") => (ErrorKind::BadRequest, "Check constraint violation"),
            Some("53000" | "53100" | "53200" | "53300") => {
                (ErrorKind::ServiceUnavailable, "Database resource exhausted")
            }
            Some("57000" | "57014" | "57P01" | "57P02" | "57P03") => {
                (ErrorKind::ServiceUnavailable, "Database unavailable")
            }
            _ => (ErrorKind::InternalServerError, "Internal server error"),
        },
        _ => (ErrorKind::InternalServerError, "Internal server error"),
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        let (kind, message) = classify_sqlx(&err);
        AppError::new(kind, message).with_source(err)
    }
}

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
mod http_response {
    use axum::Json;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use serde::Serialize;

    use super::AppError;
    use crate::validation::FieldError;

    /// Failure half of the `{success, message, data, errors}` envelope
    #[derive(Serialize)]
    struct ErrorBody<'a> {
        success: bool,
        message: &'a str,
        #[serde(skip_serializing_if = "no_field_errors")]
        errors: &'a [FieldError],
    }

    fn no_field_errors(errors: &&[FieldError]) -> bool {
        errors.is_empty()
    }

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            let status = StatusCode::from_u16(self.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

            let body = ErrorBody {
                success: false,
                message: self.message(),
                errors: self.field_errors(),
            };

            (status, Json(body)).into_response()
        }
    }
}


#[cfg(all(test, feature = "axum"))]
mod tests {
    use axum::body::to_bytes;
    use axum::response::IntoResponse;

    use super::*;
    use crate::validation::FieldError;

    #[tokio::test]
    async fn test_validation_error_envelope() {
        let err = AppError::validation(vec![FieldError::new(
            "title",
            "Title must be at least 5 characters long",
        )]);
        let response = err.into_response();
        assert_eq!(response.status().as_u16(), 400);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Validation failed");
        assert_eq!(body["errors"][0]["field"], "title");
    }

    #[tokio::test]
    async fn test_plain_error_has_no_errors_key() {
        let response = AppError::not_found("Question not found").into_response();
        assert_eq!(response.status().as_u16(), 404);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Question not found");
        assert!(body.get("errors").is_none());
    }
}
