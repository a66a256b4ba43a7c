//! Post Answer Use Case

use std::sync::Arc;

use auth::UserRepository;
use kernel::id::{QuestionId, UserId};

use crate::application::authors::{Authors, WithAuthors};
use crate::domain::entities::Answer;
use crate::domain::repository::{ForumUnitOfWork, QuestionRepository};
use crate::domain::value_objects::AnswerContent;
use crate::error::{ForumError, ForumResult};

/// Validated answer fields
#[derive(Debug, Clone)]
pub struct PostAnswerInput {
    pub question_id: QuestionId,
    pub content: AnswerContent,
}

pub struct PostAnswerUseCase<Q, W, U>
where
    Q: QuestionRepository,
    W: ForumUnitOfWork,
    U: UserRepository,
{
    question_repo: Arc<Q>,
    unit_of_work: Arc<W>,
    user_repo: Arc<U>,
}

impl<Q, W, U> PostAnswerUseCase<Q, W, U>
where
    Q: QuestionRepository,
    W: ForumUnitOfWork,
    U: UserRepository,
{
    pub fn new(question_repo: Arc<Q>, unit_of_work: Arc<W>, user_repo: Arc<U>) -> Self {
        Self {
            question_repo,
            unit_of_work,
            user_repo,
        }
    }

    pub async fn execute(
        &self,
        author: UserId,
        input: PostAnswerInput,
    ) -> ForumResult<WithAuthors<Answer>> {
        self.question_repo
            .find_active(&input.question_id)
            .await?
            .ok_or(ForumError::QuestionNotFound)?;

        let user = self
            .user_repo
            .find_by_id(&author)
            .await?
            .ok_or(ForumError::UserNotFound)?;

        let answer = Answer::new(
            input.content,
            input.question_id,
            author,
            user.user_name.original(),
        );
        // Re-checks the parent inside the transaction
        self.unit_of_work.create_answer(&answer).await?;

        tracing::info!(
            answer_id = %answer.id,
            question_id = %answer.question_id,
            author = %author,
            "Answer created"
        );

        Ok(WithAuthors {
            item: answer,
            authors: Authors::single(user),
        })
    }
}
