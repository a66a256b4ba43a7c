//! Update Profile Use Case

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::entity::user::{ProfileUpdate, User};
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

/// Applies a partial profile change
pub struct UpdateProfileUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> UpdateProfileUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, user_id: &UserId, update: ProfileUpdate) -> AuthResult<User> {
        let mut user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if update.is_empty() {
            return Ok(user);
        }

        user.apply_profile(update);
        self.user_repo.update(&user).await?;

        tracing::info!(user_id = %user.user_id, "Profile updated");

        Ok(user)
    }
}
