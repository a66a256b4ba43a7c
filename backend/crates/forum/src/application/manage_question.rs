//! Manage Question Use Case
//!
//! Author-only edit and soft delete.

use std::sync::Arc;

use auth::UserRepository;
use kernel::id::{QuestionId, UserId};

use crate::application::authors::{Authors, WithAuthors};
use crate::domain::entities::{Question, QuestionEdit};
use crate::domain::repository::QuestionRepository;
use crate::error::{ForumError, ForumResult};

pub struct ManageQuestionUseCase<Q, U>
where
    Q: QuestionRepository,
    U: UserRepository,
{
    question_repo: Arc<Q>,
    user_repo: Arc<U>,
}

impl<Q, U> ManageQuestionUseCase<Q, U>
where
    Q: QuestionRepository,
    U: UserRepository,
{
    pub fn new(question_repo: Arc<Q>, user_repo: Arc<U>) -> Self {
        Self {
            question_repo,
            user_repo,
        }
    }

    pub async fn update(
        &self,
        actor: UserId,
        id: &QuestionId,
        edit: QuestionEdit,
    ) -> ForumResult<WithAuthors<Question>> {
        let mut question = self.load(id).await?;
        if !question.is_authored_by(&actor) {
            return Err(ForumError::Forbidden("You can only edit your own questions"));
        }

        question.apply_edit(edit);
        self.question_repo.save(&question).await?;

        tracing::info!(question_id = %question.id, "Question updated");

        let authors = Authors::load(self.user_repo.as_ref(), [question.author]).await?;
        Ok(WithAuthors {
            item: question,
            authors,
        })
    }

    pub async fn delete(&self, actor: UserId, id: &QuestionId) -> ForumResult<()> {
        let mut question = self.load(id).await?;
        if !question.is_authored_by(&actor) {
            return Err(ForumError::Forbidden("You can only delete your own questions"));
        }

        question.soft_delete();
        self.question_repo.save(&question).await?;

        tracing::info!(question_id = %question.id, "Question deleted");
        Ok(())
    }

    async fn load(&self, id: &QuestionId) -> ForumResult<Question> {
        self.question_repo
            .find_active(id)
            .await?
            .ok_or(ForumError::QuestionNotFound)
    }
}
