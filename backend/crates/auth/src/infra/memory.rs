//! In-Process Repository Implementations
//!
//! Used by router tests and by local runs without `DATABASE_URL`.

use std::collections::HashMap;
use std::sync::Arc;

use kernel::id::UserId;
use tokio::sync::RwLock;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_name::UserName};
use crate::error::{AuthError, AuthResult};

/// User store guarded by a single lock
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.write().await;

        // Same unique keys as the users table
        if users.values().any(|u| u.email == user.email) {
            return Err(AuthError::EmailTaken);
        }
        if users
            .values()
            .any(|u| u.user_name.canonical() == user.user_name.canonical())
        {
            return Err(AuthError::UserNameTaken);
        }

        users.insert(user.user_id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| &u.email == email).cloned())
    }

    async fn find_many_by_ids(&self, user_ids: &[UserId]) -> AuthResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(user_ids
            .iter()
            .filter_map(|id| users.get(id).cloned())
            .collect())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let users = self.users.read().await;
        Ok(users.values().any(|u| &u.email == email))
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .any(|u| u.user_name.canonical() == user_name.canonical()))
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.write().await;
        match users.get_mut(&user.user_id) {
            Some(stored) => {
                *stored = user.clone();
                Ok(())
            }
            None => Err(AuthError::UserNotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio_test::block_on;

    use super::*;
    use crate::domain::value_object::{
        full_name::FullName,
        user_password::{RawPassword, UserPassword},
    };

    fn user(user_name: &str, email: &str) -> User {
        let raw = RawPassword::new("Password1".to_owned()).unwrap();
        User::new(
            FullName::new("Test Member").unwrap(),
            UserName::new(user_name).unwrap(),
            Email::new(email).unwrap(),
            UserPassword::from_raw(&raw, None).unwrap(),
        )
    }

    #[test]
    fn test_unique_keys_enforced() {
        let repo = InMemoryUserRepository::new();
        block_on(repo.create(&user("grace", "grace@example.com"))).unwrap();

        let err = block_on(repo.create(&user("other", "GRACE@example.com"))).unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));

        let err = block_on(repo.create(&user("Grace", "other@example.com"))).unwrap_err();
        assert!(matches!(err, AuthError::UserNameTaken));
    }

    #[test]
    fn test_find_many_skips_unknown_ids() {
        let repo = InMemoryUserRepository::new();
        let grace = user("grace", "grace@example.com");
        block_on(repo.create(&grace)).unwrap();

        let found = block_on(repo.find_many_by_ids(&[grace.user_id, UserId::new()])).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].user_id, grace.user_id);
    }

    #[test]
    fn test_update_unknown_user() {
        let repo = InMemoryUserRepository::new();
        let err = block_on(repo.update(&user("grace", "grace@example.com"))).unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
    }
}
