//! Check User Name Availability Use Case

use std::sync::Arc;

use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_name::UserName;
use crate::error::{AuthError, AuthResult};

pub struct CheckUserNameUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> CheckUserNameUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    /// `Ok(())` when free; `UserNameTaken` otherwise (compared by canonical form)
    pub async fn execute(&self, user_name: &UserName) -> AuthResult<()> {
        if self.user_repo.exists_by_user_name(user_name).await? {
            return Err(AuthError::UserNameTaken);
        }
        Ok(())
    }
}
