//! Author Population
//!
//! Questions and answers carry only the author's id and a username copy;
//! responses also show the author's public profile, loaded in one batch.

use std::collections::HashMap;

use auth::{User, UserRepository};
use kernel::id::UserId;

use crate::error::ForumResult;

/// Authors keyed by id; deleted users are simply absent
#[derive(Debug, Clone, Default)]
pub struct Authors(HashMap<UserId, User>);

impl Authors {
    pub async fn load<U>(users: &U, ids: impl IntoIterator<Item = UserId>) -> ForumResult<Self>
    where
        U: UserRepository,
    {
        let mut unique: Vec<UserId> = Vec::new();
        for id in ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }

        let found = users.find_many_by_ids(&unique).await?;
        Ok(Self(found.into_iter().map(|u| (u.user_id, u)).collect()))
    }

    pub fn single(user: User) -> Self {
        Self(HashMap::from([(user.user_id, user)]))
    }

    pub fn get(&self, id: &UserId) -> Option<&User> {
        self.0.get(id)
    }
}

/// A use case result together with the authors it mentions
#[derive(Debug, Clone)]
pub struct WithAuthors<T> {
    pub item: T,
    pub authors: Authors,
}
