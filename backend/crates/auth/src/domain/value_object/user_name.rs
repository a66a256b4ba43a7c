//! User Name Value Object
//!
//! ユーザー名は、ユーザーを識別するための**公開識別子（ハンドル）**。
//! 質問・回答の投稿者名として表示される。
//!
//! ## 設計方針
//! - ASCII英数字と `_` のみ許可
//! - 大文字入力は受け付けるが、canonical（正規形）は小文字
//! - NFKC正規化 → trim → 検証 → 小文字化 の順で処理
//!
//! ## 不変条件
//! - 長さ: 3〜20文字（正規化後）
//! - 一意性は canonical で判定（大文字小文字を区別しない）

use kernel::error::app_error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

// ============================================================================
// Constants
// ============================================================================

/// Minimum length for user name (in characters)
pub const USER_NAME_MIN_LENGTH: usize = 3;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 20;

// ============================================================================
// Error Types
// ============================================================================

/// Error returned when user name validation fails
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserNameError {
    #[error("Username must be at least 3 characters long")]
    TooShort { length: usize },

    #[error("Username cannot exceed 20 characters")]
    TooLong { length: usize },

    #[error("Username can only contain letters, numbers, and underscores")]
    InvalidCharacter { char: char, position: usize },
}

impl From<UserNameError> for AppError {
    fn from(err: UserNameError) -> Self {
        AppError::bad_request(err.to_string())
    }
}

// ============================================================================
// UserName Value Object
// ============================================================================

/// Validated, normalized user name
///
/// # Storage
/// - `original`: The user's input (trimmed, NFKC normalized, preserves case)
/// - `canonical`: Lowercase form for uniqueness checks
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName {
    /// Original user input (preserves case)
    original: String,
    /// Canonical form (lowercase) for uniqueness
    canonical: String,
}

impl UserName {
    /// Create a new UserName with validation
    pub fn new(input: impl AsRef<str>) -> Result<Self, UserNameError> {
        let original = Self::normalize_original(input.as_ref());
        Self::validate(&original)?;
        let canonical = original.to_ascii_lowercase();
        Ok(Self {
            original,
            canonical,
        })
    }

    /// Get the original user name (preserves case)
    #[inline]
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Get the canonical (lowercase) user name
    #[inline]
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Create from database values (assumes already validated)
    pub fn from_db(original: &str) -> Self {
        Self {
            original: original.to_string(),
            canonical: original.to_ascii_lowercase(),
        }
    }

    /// Normalize input string (NFKC and trim, preserve case)
    fn normalize_original(input: &str) -> String {
        input.nfkc().collect::<String>().trim().to_string()
    }

    fn validate(name: &str) -> Result<(), UserNameError> {
        let length = name.chars().count();
        if length < USER_NAME_MIN_LENGTH {
            return Err(UserNameError::TooShort { length });
        }
        if length > USER_NAME_MAX_LENGTH {
            return Err(UserNameError::TooLong { length });
        }

        if let Some((position, char)) = name
            .chars()
            .enumerate()
            .find(|&(_, c)| !(c.is_ascii_alphanumeric() || c == '_'))
        {
            return Err(UserNameError::InvalidCharacter { char, position });
        }

        Ok(())
    }
}

impl fmt::Debug for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserName")
            .field("original", &self.original)
            .field("canonical", &self.canonical)
            .finish()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}

impl TryFrom<String> for UserName {
    type Error = UserNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.original
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_user_names() {
        for name in ["abc", "John_Doe", "user123", "_x_", "a".repeat(20).as_str()] {
            assert!(UserName::new(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_canonical_is_lowercase() {
        let name = UserName::new("  JohnDoe ").unwrap();
        assert_eq!(name.original(), "JohnDoe");
        assert_eq!(name.canonical(), "johndoe");
        assert_eq!(name.to_string(), "JohnDoe");
    }

    #[test]
    fn test_length_bounds() {
        assert_eq!(
            UserName::new("ab").unwrap_err(),
            UserNameError::TooShort { length: 2 }
        );
        assert_eq!(
            UserName::new("a".repeat(21)).unwrap_err(),
            UserNameError::TooLong { length: 21 }
        );
    }

    #[test]
    fn test_invalid_characters() {
        let err = UserName::new("john.doe").unwrap_err();
        assert_eq!(
            err,
            UserNameError::InvalidCharacter {
                char: '.',
                position: 4
            }
        );
        assert_eq!(
            err.to_string(),
            "Username can only contain letters, numbers, and underscores"
        );
        assert!(UserName::new("john doe").is_err());
        assert!(UserName::new("jöhn").is_err());
    }

    #[test]
    fn test_fullwidth_input_is_normalized() {
        // NFKC folds fullwidth ASCII into plain ASCII
        let name = UserName::new("ＡＢＣ").unwrap();
        assert_eq!(name.canonical(), "abc");
    }

    #[test]
    fn test_serde_validates() {
        let ok: Result<UserName, _> = serde_json::from_str(r#""Alice_1""#);
        assert!(ok.is_ok());
        let bad: Result<UserName, _> = serde_json::from_str(r#""a""#);
        assert!(bad.is_err());
    }
}
