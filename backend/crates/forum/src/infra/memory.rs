//! In-Process Repository Implementations
//!
//! One lock over both collections, so every unit-of-work method is a single
//! critical section. Used by router tests and by local runs without
//! `DATABASE_URL`.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

use kernel::id::{AnswerId, QuestionId};
use kernel::pagination::{Page, PageRequest};
use tokio::sync::RwLock;

use crate::domain::entities::{Answer, Question};
use crate::domain::repository::{
    AnswerRepository, ForumUnitOfWork, QuestionFilter, QuestionRepository,
};
use crate::domain::services::matches_search;
use crate::domain::value_objects::{AnswerSort, QuestionSort};
use crate::error::{ForumError, ForumResult};

#[derive(Default)]
struct ForumState {
    questions: HashMap<QuestionId, Question>,
    answers: HashMap<AnswerId, Answer>,
}

/// Question and answer store guarded by a single lock
#[derive(Clone, Default)]
pub struct InMemoryForumStore {
    state: Arc<RwLock<ForumState>>,
}

impl InMemoryForumStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored question regardless of the active flag
    pub async fn raw_question(&self, id: &QuestionId) -> Option<Question> {
        self.state.read().await.questions.get(id).cloned()
    }

    /// Stored answer regardless of the active flag
    pub async fn raw_answer(&self, id: &AnswerId) -> Option<Answer> {
        self.state.read().await.answers.get(id).cloned()
    }
}

// ============================================================================
// Question Repository Implementation
// ============================================================================

impl QuestionRepository for InMemoryForumStore {
    async fn insert(&self, question: &Question) -> ForumResult<()> {
        self.state
            .write()
            .await
            .questions
            .insert(question.id, question.clone());
        Ok(())
    }

    async fn find_active(&self, id: &QuestionId) -> ForumResult<Option<Question>> {
        let state = self.state.read().await;
        Ok(state.questions.get(id).filter(|q| q.is_active).cloned())
    }

    async fn list(&self, filter: &QuestionFilter, page: PageRequest) -> ForumResult<Page<Question>> {
        let state = self.state.read().await;

        let mut matching: Vec<Question> = state
            .questions
            .values()
            .filter(|q| q.is_active)
            .filter(|q| filter.tags.is_empty() || q.tags.contains_any(&filter.tags))
            .filter(|q| filter.author.is_none_or(|author| q.author == author))
            .filter(|q| {
                filter.search.as_deref().is_none_or(|search| {
                    matches_search(&[q.title.as_str(), q.description.as_str()], search)
                })
            })
            .cloned()
            .collect();

        // Newest first breaks every tie
        matching.sort_by_key(|q| Reverse(q.created_at));
        match filter.sort {
            QuestionSort::Recent => {}
            QuestionSort::Popular => matching.sort_by_key(|q| Reverse((q.votes, q.views))),
            QuestionSort::Views => matching.sort_by_key(|q| Reverse(q.views)),
            QuestionSort::Votes => matching.sort_by_key(|q| Reverse(q.votes)),
        }

        Ok(Page::from_sorted(matching, page))
    }

    async fn save(&self, question: &Question) -> ForumResult<()> {
        let mut state = self.state.write().await;
        let stored = state
            .questions
            .get_mut(&question.id)
            .ok_or(ForumError::QuestionNotFound)?;

        // The answer list belongs to the unit-of-work methods
        stored.title = question.title.clone();
        stored.description = question.description.clone();
        stored.tags = question.tags.clone();
        stored.votes = question.votes;
        stored.voted_by = question.voted_by.clone();
        stored.is_active = question.is_active;
        stored.updated_at = question.updated_at;
        Ok(())
    }

    async fn increment_views(&self, id: &QuestionId) -> ForumResult<Option<i64>> {
        let mut state = self.state.write().await;
        Ok(state
            .questions
            .get_mut(id)
            .filter(|q| q.is_active)
            .map(|q| {
                q.views += 1;
                q.views
            }))
    }
}

// ============================================================================
// Answer Repository Implementation
// ============================================================================

impl AnswerRepository for InMemoryForumStore {
    async fn find_active(&self, id: &AnswerId) -> ForumResult<Option<Answer>> {
        let state = self.state.read().await;
        Ok(state.answers.get(id).filter(|a| a.is_active).cloned())
    }

    async fn list_by_question(
        &self,
        question_id: &QuestionId,
        sort: AnswerSort,
        page: PageRequest,
    ) -> ForumResult<Page<Answer>> {
        let mut answers = active_answers(&*self.state.read().await, question_id);

        answers.sort_by_key(|a| Reverse(a.created_at));
        match sort {
            AnswerSort::Recent => {}
            AnswerSort::Votes => answers.sort_by_key(|a| Reverse(a.votes)),
            AnswerSort::Accepted => answers.sort_by_key(|a| Reverse((a.is_accepted, a.votes))),
        }

        Ok(Page::from_sorted(answers, page))
    }

    async fn active_for_question(&self, question_id: &QuestionId) -> ForumResult<Vec<Answer>> {
        let mut answers = active_answers(&*self.state.read().await, question_id);
        answers.sort_by_key(|a| a.created_at);
        Ok(answers)
    }

    async fn save(&self, answer: &Answer) -> ForumResult<()> {
        let mut state = self.state.write().await;
        let stored = state
            .answers
            .get_mut(&answer.id)
            .ok_or(ForumError::AnswerNotFound)?;

        stored.content = answer.content.clone();
        stored.votes = answer.votes;
        stored.voted_by = answer.voted_by.clone();
        stored.updated_at = answer.updated_at;
        Ok(())
    }
}

fn active_answers(state: &ForumState, question_id: &QuestionId) -> Vec<Answer> {
    state
        .answers
        .values()
        .filter(|a| a.is_active && &a.question_id == question_id)
        .cloned()
        .collect()
}

// ============================================================================
// Unit of Work Implementation
// ============================================================================

impl ForumUnitOfWork for InMemoryForumStore {
    async fn create_answer(&self, answer: &Answer) -> ForumResult<()> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let question = state
            .questions
            .get_mut(&answer.question_id)
            .filter(|q| q.is_active)
            .ok_or(ForumError::QuestionNotFound)?;

        question.attach_answer(answer.id);
        state.answers.insert(answer.id, answer.clone());
        Ok(())
    }

    async fn delete_answer(&self, answer: &Answer) -> ForumResult<()> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let stored = state
            .answers
            .get_mut(&answer.id)
            .ok_or(ForumError::AnswerNotFound)?;
        stored.soft_delete();

        if let Some(question) = state.questions.get_mut(&answer.question_id) {
            question.detach_answer(&answer.id);
        }
        Ok(())
    }

    async fn accept_answer(&self, answer: &Answer) -> ForumResult<Answer> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        if !state.answers.contains_key(&answer.id) {
            return Err(ForumError::AnswerNotFound);
        }

        for sibling in state
            .answers
            .values_mut()
            .filter(|a| a.question_id == answer.question_id)
        {
            sibling.set_accepted(sibling.id == answer.id);
        }

        if let Some(question) = state.questions.get_mut(&answer.question_id) {
            question.mark_resolved(answer.id);
        }

        state
            .answers
            .get(&answer.id)
            .cloned()
            .ok_or(ForumError::AnswerNotFound)
    }
}

#[cfg(test)]
mod tests {
    use kernel::id::UserId;
    use tokio_test::block_on;

    use super::*;
    use crate::domain::value_objects::{AnswerContent, Description, Tags, Title};

    fn question() -> Question {
        Question::new(
            Title::new("How to join columns").unwrap(),
            Description::new("I need to join two tables in SQL").unwrap(),
            Tags::new(["sql"]).unwrap(),
            UserId::new(),
            "asker",
        )
    }

    fn answer(question: &Question) -> Answer {
        Answer::new(
            AnswerContent::new("Use an INNER JOIN on the key").unwrap(),
            question.id,
            UserId::new(),
            "helper",
        )
    }

    #[test]
    fn test_create_answer_requires_active_parent() {
        let store = InMemoryForumStore::new();
        let mut q = question();
        block_on(QuestionRepository::insert(&store, &q)).unwrap();

        let first = answer(&q);
        block_on(store.create_answer(&first)).unwrap();
        let stored = block_on(store.raw_question(&q.id)).unwrap();
        assert_eq!(stored.answers, vec![first.id]);
        assert_eq!(stored.answers_count, 1);

        q.soft_delete();
        block_on(QuestionRepository::save(&store, &q)).unwrap();
        let err = block_on(store.create_answer(&answer(&q))).unwrap_err();
        assert!(matches!(err, ForumError::QuestionNotFound));
    }

    #[test]
    fn test_save_keeps_answer_list() {
        let store = InMemoryForumStore::new();
        let q = question();
        block_on(QuestionRepository::insert(&store, &q)).unwrap();
        block_on(store.create_answer(&answer(&q))).unwrap();

        // `q` is stale: it still has no answers
        block_on(QuestionRepository::save(&store, &q)).unwrap();
        let stored = block_on(store.raw_question(&q.id)).unwrap();
        assert_eq!(stored.answers_count, 1);
    }

    #[test]
    fn test_accept_answer_is_exclusive() {
        let store = InMemoryForumStore::new();
        let q = question();
        block_on(QuestionRepository::insert(&store, &q)).unwrap();
        let a = answer(&q);
        let b = answer(&q);
        block_on(store.create_answer(&a)).unwrap();
        block_on(store.create_answer(&b)).unwrap();

        block_on(store.accept_answer(&a)).unwrap();
        let accepted = block_on(store.accept_answer(&b)).unwrap();
        assert!(accepted.is_accepted);
        assert!(!block_on(store.raw_answer(&a.id)).unwrap().is_accepted);

        let stored = block_on(store.raw_question(&q.id)).unwrap();
        assert_eq!(stored.accepted_answer, Some(b.id));
        assert!(stored.is_resolved);
    }

    #[test]
    fn test_delete_answer_unlinks() {
        let store = InMemoryForumStore::new();
        let q = question();
        block_on(QuestionRepository::insert(&store, &q)).unwrap();
        let a = answer(&q);
        block_on(store.create_answer(&a)).unwrap();

        block_on(store.delete_answer(&a)).unwrap();
        assert!(block_on(AnswerRepository::find_active(&store, &a.id)).unwrap().is_none());
        assert!(!block_on(store.raw_answer(&a.id)).unwrap().is_active);
        assert_eq!(block_on(store.raw_question(&q.id)).unwrap().answers_count, 0);
    }
}
