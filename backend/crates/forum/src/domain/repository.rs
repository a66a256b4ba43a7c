//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::{AnswerId, QuestionId, UserId};
use kernel::pagination::{Page, PageRequest};

use crate::domain::entities::{Answer, Question};
use crate::domain::value_objects::{AnswerSort, QuestionSort};
use crate::error::ForumResult;

/// Question list filter; only active questions are ever listed
#[derive(Debug, Clone, Default)]
pub struct QuestionFilter {
    /// Lowercase tags, any-of
    pub tags: Vec<String>,
    /// Free text over title and description
    pub search: Option<String>,
    pub author: Option<UserId>,
    pub sort: QuestionSort,
}

/// Question repository trait
#[trait_variant::make(QuestionRepository: Send)]
pub trait LocalQuestionRepository {
    async fn insert(&self, question: &Question) -> ForumResult<()>;

    /// Active question by id
    async fn find_active(&self, id: &QuestionId) -> ForumResult<Option<Question>>;

    async fn list(&self, filter: &QuestionFilter, page: PageRequest) -> ForumResult<Page<Question>>;

    /// Persist title, description, tags, votes and the active flag
    async fn save(&self, question: &Question) -> ForumResult<()>;

    /// Add one view; returns the new count, `None` when not active
    async fn increment_views(&self, id: &QuestionId) -> ForumResult<Option<i64>>;
}

/// Answer repository trait
#[trait_variant::make(AnswerRepository: Send)]
pub trait LocalAnswerRepository {
    /// Active answer by id
    async fn find_active(&self, id: &AnswerId) -> ForumResult<Option<Answer>>;

    async fn list_by_question(
        &self,
        question_id: &QuestionId,
        sort: AnswerSort,
        page: PageRequest,
    ) -> ForumResult<Page<Answer>>;

    /// Every active answer of a question, oldest first
    async fn active_for_question(&self, question_id: &QuestionId) -> ForumResult<Vec<Answer>>;

    /// Persist content and votes
    async fn save(&self, answer: &Answer) -> ForumResult<()>;
}

/// Multi-record changes that must land together
#[trait_variant::make(ForumUnitOfWork: Send)]
pub trait LocalForumUnitOfWork {
    /// Insert the answer and append it to its active parent's answer list.
    /// Fails with `QuestionNotFound` when the parent is absent or inactive.
    async fn create_answer(&self, answer: &Answer) -> ForumResult<()>;

    /// Soft-delete the answer and unlink it from its parent
    async fn delete_answer(&self, answer: &Answer) -> ForumResult<()>;

    /// Make `answer` the only accepted answer of its question and resolve
    /// the question. Returns the updated answer.
    async fn accept_answer(&self, answer: &Answer) -> ForumResult<Answer>;
}
