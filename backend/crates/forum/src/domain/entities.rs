//! Domain Entities
//!
//! Questions and answers. Both keep `votes` equal to the tally of their
//! vote ledger, and both are soft-deleted through `is_active`.

use chrono::{DateTime, Utc};
use kernel::id::{AnswerId, QuestionId, UserId};

use crate::domain::services::slugify;
use crate::domain::value_objects::{
    AnswerContent, Description, Tags, Title, VoteLedger, VoteType,
};

// ============================================================================
// Question
// ============================================================================

/// Question entity
#[derive(Debug, Clone)]
pub struct Question {
    pub id: QuestionId,
    pub title: Title,
    pub description: Description,
    pub tags: Tags,
    pub author: UserId,
    /// Copied at creation, never re-synced
    pub author_username: String,
    pub votes: i32,
    pub views: i64,
    /// Active answers, in creation order
    pub answers: Vec<AnswerId>,
    pub answers_count: i32,
    pub is_resolved: bool,
    pub accepted_answer: Option<AnswerId>,
    pub voted_by: VoteLedger,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial question edit; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct QuestionEdit {
    pub title: Option<Title>,
    pub description: Option<Description>,
    pub tags: Option<Tags>,
}

impl Question {
    pub fn new(
        title: Title,
        description: Description,
        tags: Tags,
        author: UserId,
        author_username: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: QuestionId::new(),
            title,
            description,
            tags,
            author,
            author_username: author_username.into(),
            votes: 0,
            views: 0,
            answers: Vec::new(),
            answers_count: 0,
            is_resolved: false,
            accepted_answer: None,
            voted_by: VoteLedger::default(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn slug(&self) -> String {
        slugify(self.title.as_str())
    }

    pub fn is_authored_by(&self, user: &UserId) -> bool {
        &self.author == user
    }

    pub fn apply_edit(&mut self, edit: QuestionEdit) {
        if let Some(title) = edit.title {
            self.title = title;
        }
        if let Some(description) = edit.description {
            self.description = description;
        }
        if let Some(tags) = edit.tags {
            self.tags = tags;
        }
        self.updated_at = Utc::now();
    }

    /// Toggle vote; returns the user's resulting vote
    pub fn vote(&mut self, user: UserId, vote_type: VoteType) -> Option<VoteType> {
        let result = self.voted_by.toggle(user, vote_type);
        self.votes = self.voted_by.tally();
        self.updated_at = Utc::now();
        result
    }

    pub fn attach_answer(&mut self, answer: AnswerId) {
        self.answers.push(answer);
        self.sync_answers_count();
    }

    pub fn detach_answer(&mut self, answer: &AnswerId) {
        self.answers.retain(|id| id != answer);
        self.sync_answers_count();
    }

    pub fn mark_resolved(&mut self, answer: AnswerId) {
        self.accepted_answer = Some(answer);
        self.is_resolved = true;
        self.updated_at = Utc::now();
    }

    pub fn soft_delete(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }

    fn sync_answers_count(&mut self) {
        self.answers_count = i32::try_from(self.answers.len()).unwrap_or(i32::MAX);
        self.updated_at = Utc::now();
    }
}

// ============================================================================
// Answer
// ============================================================================

/// Answer entity
#[derive(Debug, Clone)]
pub struct Answer {
    pub id: AnswerId,
    pub content: AnswerContent,
    pub question_id: QuestionId,
    pub author: UserId,
    pub author_username: String,
    pub votes: i32,
    pub voted_by: VoteLedger,
    pub is_accepted: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Answer {
    pub fn new(
        content: AnswerContent,
        question_id: QuestionId,
        author: UserId,
        author_username: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: AnswerId::new(),
            content,
            question_id,
            author,
            author_username: author_username.into(),
            votes: 0,
            voted_by: VoteLedger::default(),
            is_accepted: false,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_authored_by(&self, user: &UserId) -> bool {
        &self.author == user
    }

    pub fn edit(&mut self, content: AnswerContent) {
        self.content = content;
        self.updated_at = Utc::now();
    }

    /// Replace the user's vote (set, not toggle); returns the stored vote
    pub fn vote(&mut self, user: UserId, vote_type: Option<VoteType>) -> Option<VoteType> {
        let result = self.voted_by.set(user, vote_type);
        self.votes = self.voted_by.tally();
        self.updated_at = Utc::now();
        result
    }

    pub fn set_accepted(&mut self, accepted: bool) {
        if self.is_accepted != accepted {
            self.is_accepted = accepted;
            self.updated_at = Utc::now();
        }
    }

    pub fn soft_delete(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(author: UserId) -> Question {
        Question::new(
            Title::new("How to join columns").unwrap(),
            Description::new("I need to join two tables in SQL").unwrap(),
            Tags::new(["sql"]).unwrap(),
            author,
            "asker",
        )
    }

    fn answer(question: &Question, author: UserId) -> Answer {
        Answer::new(
            AnswerContent::new("Use an INNER JOIN on the key").unwrap(),
            question.id,
            author,
            "helper",
        )
    }

    #[test]
    fn test_question_vote_keeps_tally_in_sync() {
        let author = UserId::new();
        let voter = UserId::new();
        let mut q = question(author);

        q.vote(voter, VoteType::Up);
        q.vote(author, VoteType::Up);
        assert_eq!(q.votes, 2);

        assert_eq!(q.vote(voter, VoteType::Up), None);
        assert_eq!(q.votes, 1);
        assert_eq!(q.votes, q.voted_by.tally());
    }

    #[test]
    fn test_answer_list_and_count() {
        let mut q = question(UserId::new());
        let a = answer(&q, UserId::new());
        let b = answer(&q, UserId::new());

        q.attach_answer(a.id);
        q.attach_answer(b.id);
        assert_eq!(q.answers_count, 2);

        q.detach_answer(&a.id);
        assert_eq!(q.answers, vec![b.id]);
        assert_eq!(q.answers_count, 1);
    }

    #[test]
    fn test_answer_vote_is_set_semantics() {
        let q = question(UserId::new());
        let voter = UserId::new();
        let mut a = answer(&q, UserId::new());

        a.vote(voter, Some(VoteType::Up));
        a.vote(voter, Some(VoteType::Up));
        assert_eq!(a.votes, 1);

        a.vote(voter, None);
        assert_eq!(a.votes, 0);
    }

    #[test]
    fn test_slug_from_title() {
        let q = question(UserId::new());
        assert_eq!(q.slug(), "how-to-join-columns");
    }

    #[test]
    fn test_mark_resolved() {
        let mut q = question(UserId::new());
        let a = answer(&q, UserId::new());
        q.mark_resolved(a.id);
        assert!(q.is_resolved);
        assert_eq!(q.accepted_answer, Some(a.id));
    }
}
