//! Browse Answers Use Case

use std::sync::Arc;

use auth::UserRepository;
use kernel::id::QuestionId;
use kernel::pagination::{Page, PageRequest};

use crate::application::authors::{Authors, WithAuthors};
use crate::domain::entities::Answer;
use crate::domain::repository::AnswerRepository;
use crate::domain::value_objects::AnswerSort;
use crate::error::ForumResult;

pub struct BrowseAnswersUseCase<A, U>
where
    A: AnswerRepository,
    U: UserRepository,
{
    answer_repo: Arc<A>,
    user_repo: Arc<U>,
}

impl<A, U> BrowseAnswersUseCase<A, U>
where
    A: AnswerRepository,
    U: UserRepository,
{
    pub fn new(answer_repo: Arc<A>, user_repo: Arc<U>) -> Self {
        Self {
            answer_repo,
            user_repo,
        }
    }

    /// Active answers of a question; an unknown question yields an empty page
    pub async fn list(
        &self,
        question_id: &QuestionId,
        sort: AnswerSort,
        page: PageRequest,
    ) -> ForumResult<WithAuthors<Page<Answer>>> {
        let answers = self
            .answer_repo
            .list_by_question(question_id, sort, page)
            .await?;
        let authors = Authors::load(
            self.user_repo.as_ref(),
            answers.items.iter().map(|a| a.author),
        )
        .await?;

        Ok(WithAuthors {
            item: answers,
            authors,
        })
    }
}
