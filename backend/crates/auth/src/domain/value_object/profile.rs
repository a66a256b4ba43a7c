//! Profile Value Objects
//!
//! Optional, user-editable profile fields.

use kernel::error::app_error::{AppError, AppResult};
use serde::Serialize;
use url::Url;

pub const BIO_MAX_LENGTH: usize = 500;

/// Free-text biography
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Bio(String);

impl Bio {
    pub fn new(raw: impl Into<String>) -> AppResult<Self> {
        let bio = raw.into();
        if bio.chars().count() > BIO_MAX_LENGTH {
            return Err(AppError::bad_request("Bio cannot exceed 500 characters"));
        }
        Ok(Self(bio))
    }

    pub fn from_db(bio: impl Into<String>) -> Self {
        Self(bio.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Absolute http(s) URL of the avatar image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProfilePicture(String);

impl ProfilePicture {
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let invalid = || AppError::bad_request("Profile picture must be a valid URL");

        let url = Url::parse(raw.as_ref().trim()).map_err(|_| invalid())?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(invalid());
        }

        Ok(Self(url.into()))
    }

    pub fn from_db(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bio_length() {
        assert!(Bio::new("").is_ok());
        assert!(Bio::new("x".repeat(500)).is_ok());
        assert_eq!(
            Bio::new("x".repeat(501)).unwrap_err().message(),
            "Bio cannot exceed 500 characters"
        );
    }

    #[test]
    fn test_profile_picture() {
        let pic = ProfilePicture::new("https://cdn.example.com/a.png").unwrap();
        assert_eq!(pic.as_str(), "https://cdn.example.com/a.png");

        for bad in ["", "not a url", "ftp://example.com/a.png", "javascript:alert(1)"] {
            assert!(ProfilePicture::new(bad).is_err(), "{bad}");
        }
    }
}
