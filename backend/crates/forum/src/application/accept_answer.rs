//! Accept Answer Use Case

use std::sync::Arc;

use auth::UserRepository;
use kernel::id::{AnswerId, UserId};

use crate::application::authors::{Authors, WithAuthors};
use crate::domain::entities::Answer;
use crate::domain::repository::{AnswerRepository, ForumUnitOfWork, QuestionRepository};
use crate::error::{ForumError, ForumResult};

pub struct AcceptAnswerUseCase<Q, A, W, U>
where
    Q: QuestionRepository,
    A: AnswerRepository,
    W: ForumUnitOfWork,
    U: UserRepository,
{
    question_repo: Arc<Q>,
    answer_repo: Arc<A>,
    unit_of_work: Arc<W>,
    user_repo: Arc<U>,
}

impl<Q, A, W, U> AcceptAnswerUseCase<Q, A, W, U>
where
    Q: QuestionRepository,
    A: AnswerRepository,
    W: ForumUnitOfWork,
    U: UserRepository,
{
    pub fn new(
        question_repo: Arc<Q>,
        answer_repo: Arc<A>,
        unit_of_work: Arc<W>,
        user_repo: Arc<U>,
    ) -> Self {
        Self {
            question_repo,
            answer_repo,
            unit_of_work,
            user_repo,
        }
    }

    /// Only the parent question's author may accept
    pub async fn execute(&self, actor: UserId, id: &AnswerId) -> ForumResult<WithAuthors<Answer>> {
        let answer = self
            .answer_repo
            .find_active(id)
            .await?
            .ok_or(ForumError::AnswerNotFound)?;

        let question = self
            .question_repo
            .find_active(&answer.question_id)
            .await?
            .ok_or(ForumError::QuestionNotFound)?;

        if !question.is_authored_by(&actor) {
            return Err(ForumError::Forbidden(
                "Only the question author can accept answers",
            ));
        }

        let accepted = self.unit_of_work.accept_answer(&answer).await?;

        tracing::info!(
            answer_id = %accepted.id,
            question_id = %question.id,
            "Answer accepted"
        );

        let authors = Authors::load(self.user_repo.as_ref(), [accepted.author]).await?;
        Ok(WithAuthors {
            item: accepted,
            authors,
        })
    }
}
