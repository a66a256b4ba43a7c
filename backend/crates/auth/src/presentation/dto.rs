//! API DTOs (Data Transfer Objects)
//!
//! Request fields are `Option` so that a missing field reports
//! "<Field> is required" through the same field-error list as a bad value.

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::validation::{FieldErrors, required};
use serde::{Deserialize, Serialize};

use crate::application::{SignInInput, SignUpInput};
use crate::domain::entity::user::{ProfileUpdate, User};
use crate::domain::value_object::{
    email::Email,
    full_name::FullName,
    profile::{Bio, ProfilePicture},
    user_name::UserName,
    user_password::RawPassword,
};

// ============================================================================
// Sign Up
// ============================================================================

/// Sign up request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub full_name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

impl SignUpRequest {
    pub fn validate(self) -> AppResult<SignUpInput> {
        let mut errors = FieldErrors::new();

        let full_name = errors.check(
            "fullName",
            required("Full name", self.full_name).and_then(FullName::new),
        );
        let user_name = errors.check(
            "username",
            required("Username", self.username)
                .and_then(|raw| UserName::new(raw).map_err(AppError::from)),
        );
        let email = errors.check("email", required("Email", self.email).and_then(Email::new));

        let password_text = errors.check("password", required("Password", self.password));
        let confirm = errors.check(
            "confirmPassword",
            required("Confirm password", self.confirm_password),
        );
        if matches!((&password_text, &confirm), (Some(p), Some(c)) if p != c) {
            errors.push("confirmPassword", "Passwords don't match");
        }
        let password = password_text.and_then(|raw| errors.check("password", RawPassword::new(raw)));

        match (full_name, user_name, email, password) {
            (Some(full_name), Some(user_name), Some(email), Some(password)) if errors.is_empty() => {
                Ok(SignUpInput {
                    full_name,
                    user_name,
                    email,
                    password,
                })
            }
            _ => Err(errors.into_error()),
        }
    }
}

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn validate(self) -> AppResult<SignInInput> {
        let mut errors = FieldErrors::new();

        let email = errors.check("email", required("Email", self.email).and_then(Email::new));
        let password = errors.check(
            "password",
            required("Password", self.password.filter(|p| !p.is_empty())),
        );

        match (email, password) {
            (Some(email), Some(password)) => Ok(SignInInput {
                email: email.as_str().to_owned(),
                password,
            }),
            _ => Err(errors.into_error()),
        }
    }
}

// ============================================================================
// Username Availability
// ============================================================================

/// Username availability request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckUsernameRequest {
    pub username: Option<String>,
}

impl CheckUsernameRequest {
    pub fn validate(self) -> AppResult<UserName> {
        let mut errors = FieldErrors::new();
        let user_name = errors.check(
            "username",
            required("Username", self.username)
                .and_then(|raw| UserName::new(raw).map_err(AppError::from)),
        );
        user_name.ok_or_else(|| errors.into_error())
    }
}

/// Username availability response
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityResponse {
    pub username: String,
    pub available: bool,
}

// ============================================================================
// Profile Update
// ============================================================================

/// Partial profile update; unknown fields are ignored
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
}

impl UpdateProfileRequest {
    pub fn into_update(self) -> AppResult<ProfileUpdate> {
        let mut errors = FieldErrors::new();

        let full_name = self
            .full_name
            .and_then(|raw| errors.check("fullName", FullName::new(raw)));
        let bio = self.bio.and_then(|raw| errors.check("bio", Bio::new(raw)));
        let profile_picture = self
            .profile_picture
            .and_then(|raw| errors.check("profilePicture", ProfilePicture::new(raw)));

        errors.into_result()?;

        Ok(ProfileUpdate {
            full_name,
            bio,
            profile_picture,
        })
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Public view of a user; never carries the password hash
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub is_email_verified: bool,
    pub profile_picture: Option<String>,
    pub bio: Option<String>,
    pub reputation: i32,
    pub joined_date: DateTime<Utc>,
    pub last_login_date: Option<DateTime<Utc>>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.user_id.to_string(),
            full_name: user.full_name.as_str().to_owned(),
            username: user.user_name.original().to_owned(),
            email: user.email.as_str().to_owned(),
            is_email_verified: user.is_email_verified,
            profile_picture: user
                .profile_picture
                .as_ref()
                .map(|p| p.as_str().to_owned()),
            bio: user.bio.as_ref().map(|b| b.as_str().to_owned()),
            reputation: user.reputation,
            joined_date: user.joined_at,
            last_login_date: user.last_login_at,
        }
    }
}

/// Signup / login payload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub user: UserResponse,
    pub access_token: String,
}

/// `{ user }` wrapper for profile reads and updates
#[derive(Debug, Clone, Serialize)]
pub struct UserEnvelope {
    pub user: UserResponse,
}
