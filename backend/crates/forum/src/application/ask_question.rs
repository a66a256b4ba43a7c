//! Ask Question Use Case

use std::sync::Arc;

use auth::UserRepository;
use kernel::id::UserId;

use crate::domain::entities::Question;
use crate::domain::repository::QuestionRepository;
use crate::domain::value_objects::{Description, Tags, Title};
use crate::error::{ForumError, ForumResult};

/// Validated question fields
#[derive(Debug, Clone)]
pub struct AskQuestionInput {
    pub title: Title,
    pub description: Description,
    pub tags: Tags,
}

pub struct AskQuestionUseCase<Q, U>
where
    Q: QuestionRepository,
    U: UserRepository,
{
    question_repo: Arc<Q>,
    user_repo: Arc<U>,
}

impl<Q, U> AskQuestionUseCase<Q, U>
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

    pub async fn execute(&self, author: UserId, input: AskQuestionInput) -> ForumResult<Question> {
        let user = self
            .user_repo
            .find_by_id(&author)
            .await?
            .ok_or(ForumError::UserNotFound)?;

        let question = Question::new(
            input.title,
            input.description,
            input.tags,
            author,
            user.user_name.original(),
        );
        self.question_repo.insert(&question).await?;

        tracing::info!(
            question_id = %question.id,
            author = %author,
            "Question created"
        );

        Ok(question)
    }
}
