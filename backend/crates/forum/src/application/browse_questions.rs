//! Browse Questions Use Case
//!
//! Listing, per-author listing and the question detail view.

use std::sync::Arc;

use auth::UserRepository;
use kernel::id::{QuestionId, UserId};
use kernel::pagination::{Page, PageRequest};

use crate::application::authors::{Authors, WithAuthors};
use crate::domain::entities::{Answer, Question};
use crate::domain::repository::{AnswerRepository, QuestionFilter, QuestionRepository};
use crate::domain::value_objects::QuestionSort;
use crate::error::{ForumError, ForumResult};

/// A question with its active answers
#[derive(Debug, Clone)]
pub struct QuestionThread {
    pub question: Question,
    pub answers: Vec<Answer>,
}

pub struct BrowseQuestionsUseCase<Q, A, U>
where
    Q: QuestionRepository,
    A: AnswerRepository,
    U: UserRepository,
{
    question_repo: Arc<Q>,
    answer_repo: Arc<A>,
    user_repo: Arc<U>,
}

impl<Q, A, U> BrowseQuestionsUseCase<Q, A, U>
where
    Q: QuestionRepository,
    A: AnswerRepository,
    U: UserRepository,
{
    pub fn new(question_repo: Arc<Q>, answer_repo: Arc<A>, user_repo: Arc<U>) -> Self {
        Self {
            question_repo,
            answer_repo,
            user_repo,
        }
    }

    pub async fn list(
        &self,
        filter: &QuestionFilter,
        page: PageRequest,
    ) -> ForumResult<WithAuthors<Page<Question>>> {
        let questions = self.question_repo.list(filter, page).await?;
        let authors = Authors::load(
            self.user_repo.as_ref(),
            questions.items.iter().map(|q| q.author),
        )
        .await?;

        Ok(WithAuthors {
            item: questions,
            authors,
        })
    }

    /// Active questions of one author, newest first
    pub async fn by_author(
        &self,
        author: UserId,
        page: PageRequest,
    ) -> ForumResult<WithAuthors<Page<Question>>> {
        let filter = QuestionFilter {
            author: Some(author),
            sort: QuestionSort::Recent,
            ..Default::default()
        };
        self.list(&filter, page).await
    }

    /// Load a question with its answers; every call counts as a view
    pub async fn detail(&self, id: &QuestionId) -> ForumResult<WithAuthors<QuestionThread>> {
        let mut question = self
            .question_repo
            .find_active(id)
            .await?
            .ok_or(ForumError::QuestionNotFound)?;

        question.views = self
            .question_repo
            .increment_views(id)
            .await?
            .ok_or(ForumError::QuestionNotFound)?;

        let answers = self.answer_repo.active_for_question(id).await?;

        let author_ids = std::iter::once(question.author).chain(answers.iter().map(|a| a.author));
        let authors = Authors::load(self.user_repo.as_ref(), author_ids).await?;

        Ok(WithAuthors {
            item: QuestionThread { question, answers },
            authors,
        })
    }
}
