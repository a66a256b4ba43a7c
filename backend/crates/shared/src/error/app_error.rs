//! Application Error
//!
//! [`AppError`] is what every handler ultimately renders: a kind, a
//! client-safe message, optional per-field messages and a hidden source.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use super::kind::ErrorKind;
use crate::validation::FieldError;

type BoxedSource = Box<dyn Error + Send + Sync + 'static>;

/// ワイヤ上のエラー
///
/// `message` と `errors` だけがクライアントに返ります。`source` は
/// ログ用で、レスポンスには含まれません。
///
/// ## Examples
/// ```rust
/// use kernel::error::{app_error::AppError, kind::ErrorKind};
///
/// let err = AppError::new(ErrorKind::NotFound, "Question not found");
/// assert_eq!(err.status_code(), 404);
/// ```
pub struct AppError {
    kind: ErrorKind,
    message: Cow<'static, str>,
    /// 検証失敗時のみ非空
    errors: Vec<FieldError>,
    source: Option<BoxedSource>,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            errors: Vec::new(),
            source: None,
        }
    }

    /// 400、フィールドエラーなし（不正な JSON、ID 形式など）
    #[inline]
    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    /// 400 `"Validation failed"`、失敗したフィールドをすべて列挙
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::app_error::AppError;
    /// use kernel::validation::FieldError;
    ///
    /// let err = AppError::validation(vec![FieldError::new("title", "Title is required")]);
    /// assert_eq!(err.message(), "Validation failed");
    /// assert_eq!(err.field_errors().len(), 1);
    /// ```
    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self {
            errors,
            ..Self::new(ErrorKind::BadRequest, "Validation failed")
        }
    }

    #[inline]
    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// 500。詳細は `with_source` 側に載せ、メッセージは汎用のままにする
    #[inline]
    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InternalServerError, message)
    }

    pub fn with_source<E>(self, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            source: Some(Box::new(source)),
            ..self
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn field_errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn is_server_error(&self) -> bool {
        self.kind.is_server_error()
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("AppError");
        out.field("kind", &self.kind).field("message", &self.message);
        if !self.errors.is_empty() {
            out.field("errors", &self.errors);
        }
        if let Some(source) = &self.source {
            out.field("source", source);
        }
        out.finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        self.errors
            .iter()
            .try_for_each(|e| write!(f, "; {}: {}", e.field, e.message))
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.source {
            Some(source) => Some(source.as_ref()),
            None => None,
        }
    }
}
