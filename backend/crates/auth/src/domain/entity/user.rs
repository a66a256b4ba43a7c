//! User Entity
//!
//! A forum member: public profile plus the password hash.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::value_object::{
    email::Email,
    full_name::FullName,
    profile::{Bio, ProfilePicture},
    user_name::UserName,
    user_password::UserPassword,
};

/// User entity
///
/// Created at signup and never deleted. `password_hash` must not leave the
/// server; response DTOs copy the public fields only.
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub full_name: FullName,
    /// Unique, case-insensitive handle
    pub user_name: UserName,
    /// Unique, lowercase
    pub email: Email,
    pub password_hash: UserPassword,
    pub is_email_verified: bool,
    pub profile_picture: Option<ProfilePicture>,
    pub bio: Option<Bio>,
    pub reputation: i32,
    pub joined_at: DateTime<Utc>,
    /// Last successful login time
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial profile change; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub full_name: Option<FullName>,
    pub bio: Option<Bio>,
    pub profile_picture: Option<ProfilePicture>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.bio.is_none() && self.profile_picture.is_none()
    }
}

impl User {
    /// Create a new user
    pub fn new(
        full_name: FullName,
        user_name: UserName,
        email: Email,
        password_hash: UserPassword,
    ) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            full_name,
            user_name,
            email,
            password_hash,
            is_email_verified: false,
            profile_picture: None,
            bio: None,
            reputation: 0,
            joined_at: now,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record successful login
    pub fn record_login(&mut self) {
        let now = Utc::now();
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    /// Apply the present fields of a profile update
    pub fn apply_profile(&mut self, update: ProfileUpdate) {
        if update.is_empty() {
            return;
        }
        if let Some(full_name) = update.full_name {
            self.full_name = full_name;
        }
        if let Some(bio) = update.bio {
            self.bio = Some(bio);
        }
        if let Some(profile_picture) = update.profile_picture {
            self.profile_picture = Some(profile_picture);
        }
        self.updated_at = Utc::now();
    }
}
