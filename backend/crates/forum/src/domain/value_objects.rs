//! Domain Value Objects
//!
//! Validated question/answer text, tags, votes and list orderings.

use derive_more::Display;
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::UserId;
use serde::{Deserialize, Serialize};

pub const TITLE_MIN_LENGTH: usize = 5;
pub const TITLE_MAX_LENGTH: usize = 200;
pub const BODY_MIN_LENGTH: usize = 10;
pub const BODY_MAX_LENGTH: usize = 10_000;
pub const TAG_MAX_LENGTH: usize = 30;
pub const MAX_TAGS: usize = 5;

// ============================================================================
// Text
// ============================================================================

/// Question title, stored trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title(String);

impl Title {
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let title = raw.as_ref().trim();
        let length = title.chars().count();

        if length < TITLE_MIN_LENGTH {
            return Err(AppError::bad_request("Title must be at least 5 characters long"));
        }
        if length > TITLE_MAX_LENGTH {
            return Err(AppError::bad_request("Title cannot exceed 200 characters"));
        }
        Ok(Self(title.to_owned()))
    }

    pub fn from_db(title: impl Into<String>) -> Self {
        Self(title.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Question body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description(String);

impl Description {
    pub fn new(raw: impl Into<String>) -> AppResult<Self> {
        let description = raw.into();
        let length = description.chars().count();

        if length < BODY_MIN_LENGTH {
            return Err(AppError::bad_request(
                "Description must be at least 10 characters long",
            ));
        }
        if length > BODY_MAX_LENGTH {
            return Err(AppError::bad_request(
                "Description cannot exceed 10000 characters",
            ));
        }
        Ok(Self(description))
    }

    pub fn from_db(description: impl Into<String>) -> Self {
        Self(description.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Answer body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerContent(String);

impl AnswerContent {
    pub fn new(raw: impl Into<String>) -> AppResult<Self> {
        let content = raw.into();
        let length = content.chars().count();

        if length < BODY_MIN_LENGTH {
            return Err(AppError::bad_request("Answer must be at least 10 characters long"));
        }
        if length > BODY_MAX_LENGTH {
            return Err(AppError::bad_request("Answer cannot exceed 10000 characters"));
        }
        Ok(Self(content))
    }

    pub fn from_db(content: impl Into<String>) -> Self {
        Self(content.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Tags
// ============================================================================

/// Ordered, lowercase, de-duplicated tag list (at most five)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags(Vec<String>);

impl Tags {
    pub fn new<I, S>(raw: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tags: Vec<String> = Vec::new();

        for tag in raw {
            let tag = tag.as_ref().trim().to_lowercase();
            if tag.is_empty() || tags.contains(&tag) {
                continue;
            }
            if tag.chars().count() > TAG_MAX_LENGTH {
                return Err(AppError::bad_request("Tag cannot exceed 30 characters"));
            }
            tags.push(tag);
        }

        if tags.len() > MAX_TAGS {
            return Err(AppError::bad_request("A question can have at most 5 tags"));
        }
        Ok(Self(tags))
    }

    pub fn from_db(tags: Vec<String>) -> Self {
        Self(tags)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Any-of membership against already-normalized tags
    pub fn contains_any(&self, wanted: &[String]) -> bool {
        wanted.iter().any(|w| self.0.contains(w))
    }
}

// ============================================================================
// Votes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    #[display("up")]
    Up,
    #[display("down")]
    Down,
}

impl VoteType {
    /// Contribution to the tally
    pub fn weight(self) -> i32 {
        match self {
            VoteType::Up => 1,
            VoteType::Down => -1,
        }
    }

    pub fn parse(raw: &str) -> AppResult<Self> {
        match raw {
            "up" => Ok(VoteType::Up),
            "down" => Ok(VoteType::Down),
            _ => Err(AppError::bad_request("Vote type must be 'up' or 'down'")),
        }
    }
}

/// One user's vote, stored as `{user, voteType}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRecord {
    pub user: UserId,
    pub vote_type: VoteType,
}

/// Per-user vote records; the tally is always recomputed from these
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoteLedger(Vec<VoteRecord>);

impl VoteLedger {
    pub fn from_records(records: Vec<VoteRecord>) -> Self {
        Self(records)
    }

    pub fn records(&self) -> &[VoteRecord] {
        &self.0
    }

    pub fn vote_of(&self, user: &UserId) -> Option<VoteType> {
        self.0.iter().find(|r| &r.user == user).map(|r| r.vote_type)
    }

    /// Same type again removes the vote, the opposite type flips it.
    /// Returns the user's vote after the change.
    pub fn toggle(&mut self, user: UserId, vote_type: VoteType) -> Option<VoteType> {
        match self.0.iter().position(|r| r.user == user) {
            Some(index) if self.0[index].vote_type == vote_type => {
                self.0.remove(index);
                None
            }
            Some(index) => {
                self.0[index].vote_type = vote_type;
                Some(vote_type)
            }
            None => {
                self.0.push(VoteRecord { user, vote_type });
                Some(vote_type)
            }
        }
    }

    /// Drop any existing vote by `user`, then record `vote_type` if present
    pub fn set(&mut self, user: UserId, vote_type: Option<VoteType>) -> Option<VoteType> {
        self.0.retain(|r| r.user != user);
        if let Some(vote_type) = vote_type {
            self.0.push(VoteRecord { user, vote_type });
        }
        vote_type
    }

    pub fn tally(&self) -> i32 {
        self.0.iter().map(|r| r.vote_type.weight()).sum()
    }
}

// ============================================================================
// Orderings
// ============================================================================

/// Question list ordering; unknown values fall back to `Recent`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuestionSort {
    #[default]
    Recent,
    /// Votes, then views
    Popular,
    Views,
    Votes,
}

impl QuestionSort {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("popular") => QuestionSort::Popular,
            Some("views") => QuestionSort::Views,
            Some("votes") => QuestionSort::Votes,
            _ => QuestionSort::Recent,
        }
    }
}

/// Answer list ordering; unknown values fall back to `Votes`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnswerSort {
    /// Votes, newest first on ties
    #[default]
    Votes,
    Recent,
    /// Accepted first, then votes
    Accepted,
}

impl AnswerSort {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("recent") => AnswerSort::Recent,
            Some("accepted") => AnswerSort::Accepted,
            _ => AnswerSort::Votes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_bounds() {
        assert_eq!(Title::new("  How to join columns  ").unwrap().as_str(), "How to join columns");
        assert_eq!(
            Title::new("Hi").unwrap_err().message(),
            "Title must be at least 5 characters long"
        );
        assert!(Title::new("x".repeat(201)).is_err());
        assert!(Title::new("x".repeat(200)).is_ok());
    }

    #[test]
    fn test_description_and_answer_bounds() {
        assert!(Description::new("short").is_err());
        assert!(Description::new("long enough body").is_ok());
        assert_eq!(
            AnswerContent::new("too short").unwrap_err().message(),
            "Answer must be at least 10 characters long"
        );
        assert!(AnswerContent::new("y".repeat(10_001)).is_err());
    }

    #[test]
    fn test_tags_normalized() {
        let tags = Tags::new([" Rust ", "", "SQL", "rust", "  "]).unwrap();
        assert_eq!(tags.as_slice(), ["rust", "sql"]);
    }

    #[test]
    fn test_tags_limits() {
        let too_many = Tags::new(["a", "b", "c", "d", "e", "f"]).unwrap_err();
        assert_eq!(too_many.message(), "A question can have at most 5 tags");

        let too_long = Tags::new(["t".repeat(31)]).unwrap_err();
        assert_eq!(too_long.message(), "Tag cannot exceed 30 characters");
    }

    #[test]
    fn test_toggle_same_type_removes() {
        let user = UserId::new();
        let mut ledger = VoteLedger::default();

        assert_eq!(ledger.toggle(user, VoteType::Up), Some(VoteType::Up));
        assert_eq!(ledger.tally(), 1);
        assert_eq!(ledger.toggle(user, VoteType::Up), None);
        assert_eq!(ledger.tally(), 0);
    }

    #[test]
    fn test_toggle_opposite_type_flips() {
        let user = UserId::new();
        let other = UserId::new();
        let mut ledger = VoteLedger::default();
        ledger.toggle(other, VoteType::Up);

        ledger.toggle(user, VoteType::Up);
        let single = ledger.tally();
        ledger.toggle(user, VoteType::Down);

        assert_eq!(single - ledger.tally(), 2);
        assert_eq!(ledger.vote_of(&user), Some(VoteType::Down));
        assert_eq!(ledger.records().len(), 2);
    }

    #[test]
    fn test_set_replaces_and_clears() {
        let user = UserId::new();
        let mut ledger = VoteLedger::default();

        ledger.set(user, Some(VoteType::Down));
        ledger.set(user, Some(VoteType::Down));
        assert_eq!(ledger.tally(), -1);

        ledger.set(user, None);
        assert_eq!(ledger.tally(), 0);
        assert!(ledger.records().is_empty());
    }

    #[test]
    fn test_vote_record_wire_shape() {
        let user = UserId::new();
        let json = serde_json::to_value(VoteRecord {
            user,
            vote_type: VoteType::Down,
        })
        .unwrap();
        assert_eq!(json["voteType"], "down");
        assert_eq!(json["user"], user.to_string());
        assert_eq!(VoteType::Up.to_string(), "up");
    }

    #[test]
    fn test_sort_fallbacks() {
        assert_eq!(QuestionSort::parse(Some("popular")), QuestionSort::Popular);
        assert_eq!(QuestionSort::parse(Some("bogus")), QuestionSort::Recent);
        assert_eq!(AnswerSort::parse(None), AnswerSort::Votes);
        assert_eq!(AnswerSort::parse(Some("accepted")), AnswerSort::Accepted);
    }
}
