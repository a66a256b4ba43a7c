//! Manage Answer Use Case
//!
//! Author-only edit and soft delete.

use std::sync::Arc;

use auth::UserRepository;
use kernel::id::{AnswerId, UserId};

use crate::application::authors::{Authors, WithAuthors};
use crate::domain::entities::Answer;
use crate::domain::repository::{AnswerRepository, ForumUnitOfWork};
use crate::domain::value_objects::AnswerContent;
use crate::error::{ForumError, ForumResult};

pub struct ManageAnswerUseCase<A, W, U>
where
    A: AnswerRepository,
    W: ForumUnitOfWork,
    U: UserRepository,
{
    answer_repo: Arc<A>,
    unit_of_work: Arc<W>,
    user_repo: Arc<U>,
}

impl<A, W, U> ManageAnswerUseCase<A, W, U>
where
    A: AnswerRepository,
    W: ForumUnitOfWork,
    U: UserRepository,
{
    pub fn new(answer_repo: Arc<A>, unit_of_work: Arc<W>, user_repo: Arc<U>) -> Self {
        Self {
            answer_repo,
            unit_of_work,
            user_repo,
        }
    }

    pub async fn update(
        &self,
        actor: UserId,
        id: &AnswerId,
        content: AnswerContent,
    ) -> ForumResult<WithAuthors<Answer>> {
        let mut answer = self.load(id).await?;
        if !answer.is_authored_by(&actor) {
            return Err(ForumError::Forbidden("You can only edit your own answers"));
        }

        answer.edit(content);
        self.answer_repo.save(&answer).await?;

        tracing::info!(answer_id = %answer.id, "Answer updated");

        let authors = Authors::load(self.user_repo.as_ref(), [answer.author]).await?;
        Ok(WithAuthors {
            item: answer,
            authors,
        })
    }

    /// Soft-delete and unlink from the parent question
    pub async fn delete(&self, actor: UserId, id: &AnswerId) -> ForumResult<()> {
        let answer = self.load(id).await?;
        if !answer.is_authored_by(&actor) {
            return Err(ForumError::Forbidden("You can only delete your own answers"));
        }

        self.unit_of_work.delete_answer(&answer).await?;

        tracing::info!(
            answer_id = %answer.id,
            question_id = %answer.question_id,
            "Answer deleted"
        );
        Ok(())
    }

    async fn load(&self, id: &AnswerId) -> ForumResult<Answer> {
        self.answer_repo
            .find_active(id)
            .await?
            .ok_or(ForumError::AnswerNotFound)
    }
}
