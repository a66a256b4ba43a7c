//! Request Validation
//!
//! Value objects validate themselves and return [`AppResult`]. Request DTOs run
//! every field through a [`FieldErrors`] collector so a single response can
//! report all failing fields at once:
//!
//! ```rust
//! use kernel::error::app_error::{AppError, AppResult};
//! use kernel::validation::FieldErrors;
//!
//! fn title(raw: &str) -> AppResult<String> {
//!     if raw.len() < 5 {
//!         return Err(AppError::bad_request("Title must be at least 5 characters long"));
//!     }
//!     Ok(raw.to_string())
//! }
//!
//! let mut errors = FieldErrors::new();
//! let parsed = errors.check("title", title("Hi"));
//! assert!(parsed.is_none());
//! assert_eq!(errors.into_error().field_errors()[0].field, "title");
//! ```

use std::borrow::Cow;

use serde::Serialize;

use crate::error::app_error::{AppError, AppResult};

/// A single failing field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Cow<'static, str>,
    pub message: Cow<'static, str>,
}

impl FieldError {
    pub fn new(field: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Collects per-field failures while a request is being parsed
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure directly
    pub fn push(&mut self, field: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) {
        self.0.push(FieldError::new(field, message));
    }

    /// Keep the value on success, record the message under `field` on failure
    pub fn check<T>(&mut self, field: &'static str, result: AppResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.push(field, err.message().to_string());
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Ok(())` when nothing failed, otherwise the combined validation error
    pub fn into_result(self) -> AppResult<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self.into_error())
        }
    }

    pub fn into_error(self) -> AppError {
        AppError::validation(self.0)
    }
}

/// Turn a missing field into the standard "`<Label>` is required" error
pub fn required<T>(label: &'static str, value: Option<T>) -> AppResult<T> {
    value.ok_or_else(|| AppError::bad_request(format!("{label} is required")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_collects_all_failures() {
        let mut errors = FieldErrors::new();
        let a: Option<u8> = errors.check("a", Err(AppError::bad_request("bad a")));
        let b = errors.check("b", Ok(7u8));
        let c: Option<u8> = errors.check("c", Err(AppError::bad_request("bad c")));

        assert!(a.is_none());
        assert_eq!(b, Some(7));
        assert!(c.is_none());

        let err = errors.into_error();
        let fields: Vec<_> = err.field_errors().iter().map(|e| e.field.as_ref()).collect();
        assert_eq!(fields, vec!["a", "c"]);
    }

    #[test]
    fn test_into_result_ok_when_empty() {
        assert!(FieldErrors::new().into_result().is_ok());

        let mut errors = FieldErrors::new();
        errors.push("confirmPassword", "Passwords don't match");
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_required_message() {
        let err = required::<String>("Email", None).unwrap_err();
        assert_eq!(err.message(), "Email is required");
        assert_eq!(required("Email", Some(1)).unwrap(), 1);
    }
}
