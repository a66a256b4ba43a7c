//! Full Name Value Object

use kernel::error::app_error::{AppError, AppResult};
use serde::Serialize;
use std::fmt;

pub const FULL_NAME_MIN_LENGTH: usize = 2;
pub const FULL_NAME_MAX_LENGTH: usize = 50;

/// Display name: letters and spaces only, trimmed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FullName(String);

impl FullName {
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let name = raw.as_ref().trim();
        let length = name.chars().count();

        if length < FULL_NAME_MIN_LENGTH {
            return Err(AppError::bad_request(
                "Full name must be at least 2 characters long",
            ));
        }
        if length > FULL_NAME_MAX_LENGTH {
            return Err(AppError::bad_request("Full name cannot exceed 50 characters"));
        }
        if !name.chars().all(|c| c.is_alphabetic() || c == ' ') {
            return Err(AppError::bad_request(
                "Full name can only contain letters and spaces",
            ));
        }

        Ok(Self(name.to_string()))
    }

    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        assert_eq!(FullName::new("  Ada Lovelace ").unwrap().as_str(), "Ada Lovelace");
        assert!(FullName::new("José Núñez").is_ok());

        assert_eq!(
            FullName::new("A").unwrap_err().message(),
            "Full name must be at least 2 characters long"
        );
        assert_eq!(
            FullName::new("x".repeat(51)).unwrap_err().message(),
            "Full name cannot exceed 50 characters"
        );
        assert_eq!(
            FullName::new("R2 D2").unwrap_err().message(),
            "Full name can only contain letters and spaces"
        );
    }
}
