//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::{QuestionId, UserId};
use kernel::pagination::{PageInfo, PageRequest};
use kernel::validation::{FieldErrors, required};
use serde::{Deserialize, Serialize};

use auth::User;

use crate::application::{AskQuestionInput, Authors, PostAnswerInput, QuestionThread};
use crate::domain::entities::{Answer, Question, QuestionEdit};
use crate::domain::repository::QuestionFilter;
use crate::domain::value_objects::{
    AnswerContent, AnswerSort, Description, QuestionSort, Tags, Title, VoteRecord, VoteType,
};
use crate::error::{ForumError, ForumResult};

// ============================================================================
// Question Requests
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateQuestionRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl CreateQuestionRequest {
    pub fn validate(self) -> AppResult<AskQuestionInput> {
        let mut errors = FieldErrors::new();

        let title = errors.check("title", required("Title", self.title).and_then(Title::new));
        let description = errors.check(
            "description",
            required("Description", self.description).and_then(Description::new),
        );
        let tags = errors.check("tags", Tags::new(self.tags.unwrap_or_default()));

        match (title, description, tags) {
            (Some(title), Some(description), Some(tags)) => Ok(AskQuestionInput {
                title,
                description,
                tags,
            }),
            _ => Err(errors.into_error()),
        }
    }
}

/// Partial question edit; unknown fields are ignored
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateQuestionRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl UpdateQuestionRequest {
    pub fn validate(self) -> AppResult<QuestionEdit> {
        let mut errors = FieldErrors::new();

        let title = self.title.and_then(|raw| errors.check("title", Title::new(raw)));
        let description = self
            .description
            .and_then(|raw| errors.check("description", Description::new(raw)));
        let tags = self.tags.and_then(|raw| errors.check("tags", Tags::new(raw)));

        errors.into_result()?;
        Ok(QuestionEdit {
            title,
            description,
            tags,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionVoteRequest {
    pub vote_type: Option<String>,
}

impl QuestionVoteRequest {
    pub fn validate(self) -> AppResult<VoteType> {
        let mut errors = FieldErrors::new();
        let vote_type = errors.check(
            "voteType",
            required("Vote type", self.vote_type).and_then(|raw| VoteType::parse(&raw)),
        );
        vote_type.ok_or_else(|| errors.into_error())
    }
}

// ============================================================================
// Answer Requests
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnswerRequest {
    pub content: Option<String>,
    pub question_id: Option<String>,
}

impl CreateAnswerRequest {
    /// A well-formed but unparseable question id reads as a missing question
    pub fn validate(self) -> ForumResult<PostAnswerInput> {
        let mut errors = FieldErrors::new();

        let content = errors.check(
            "content",
            required("Answer content", self.content).and_then(AnswerContent::new),
        );
        let question_id = errors.check(
            "questionId",
            required("Question ID", self.question_id.filter(|id| !id.trim().is_empty())),
        );

        match (content, question_id) {
            (Some(content), Some(raw_id)) => {
                let question_id = raw_id
                    .trim()
                    .parse::<QuestionId>()
                    .map_err(|_| ForumError::QuestionNotFound)?;
                Ok(PostAnswerInput {
                    question_id,
                    content,
                })
            }
            _ => Err(errors.into_error().into()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAnswerRequest {
    pub content: Option<String>,
}

impl UpdateAnswerRequest {
    pub fn validate(self) -> AppResult<AnswerContent> {
        let mut errors = FieldErrors::new();
        let content = errors.check(
            "content",
            required("Answer content", self.content).and_then(AnswerContent::new),
        );
        content.ok_or_else(|| errors.into_error())
    }
}

/// `voteType` must be present; `"up"`, `"down"` or `null` (clears the vote)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerVoteRequest {
    /// Outer `None`: field absent. `Some(None)`: explicit `null`.
    #[serde(default, deserialize_with = "present")]
    pub vote_type: Option<Option<String>>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl AnswerVoteRequest {
    pub fn validate(self) -> AppResult<Option<VoteType>> {
        let mut errors = FieldErrors::new();
        let vote_type = match self.vote_type {
            None => errors.check("voteType", required("Vote type", None)),
            Some(None) => return Ok(None),
            Some(Some(raw)) => errors.check("voteType", VoteType::parse(&raw)),
        };
        vote_type.map(Some).ok_or_else(|| errors.into_error())
    }
}

// ============================================================================
// Query Strings
// ============================================================================

/// `GET /api/questions` query; `tags` may repeat or be comma-separated
#[derive(Debug, Clone, Default)]
pub struct QuestionListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
    pub tags: Vec<String>,
    pub search: Option<String>,
    pub author: Option<String>,
}

impl QuestionListQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "page" => query.page = Some(value),
                "limit" => query.limit = Some(value),
                "sort" => query.sort = Some(value),
                "search" => query.search = Some(value),
                "author" => query.author = Some(value),
                "tags" | "tags[]" => query.tags.extend(
                    value
                        .split(',')
                        .map(|tag| tag.trim().to_lowercase())
                        .filter(|tag| !tag.is_empty()),
                ),
                _ => {}
            }
        }
        query
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_query(self.page.as_deref(), self.limit.as_deref())
    }

    pub fn into_filter(self) -> ForumResult<QuestionFilter> {
        let author = match self.author.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<UserId>()
                    .map_err(|_| ForumError::InvalidFilter("Invalid author id"))?,
            ),
        };

        Ok(QuestionFilter {
            tags: self.tags,
            search: self.search.filter(|s| !s.trim().is_empty()),
            author,
            sort: QuestionSort::parse(self.sort.as_deref()),
        })
    }
}

/// Paging-only query (`page`, `limit`, optional `sort`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
}

impl PageQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_query(self.page.as_deref(), self.limit.as_deref())
    }

    pub fn answer_sort(&self) -> AnswerSort {
        AnswerSort::parse(self.sort.as_deref())
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Public author fields shown next to questions and answers
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub id: String,
    pub full_name: String,
    pub username: String,
    pub profile_picture: Option<String>,
    pub joined_date: DateTime<Utc>,
    pub reputation: i32,
}

impl From<&User> for AuthorSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.user_id.to_string(),
            full_name: user.full_name.as_str().to_owned(),
            username: user.user_name.original().to_owned(),
            profile_picture: user
                .profile_picture
                .as_ref()
                .map(|p| p.as_str().to_owned()),
            joined_date: user.joined_at,
            reputation: user.reputation,
        }
    }
}

/// Fields common to every question rendering
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionCore {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub tags: Vec<String>,
    /// `null` when the author record is gone
    pub author: Option<AuthorSummary>,
    pub author_username: String,
    pub votes: i32,
    pub views: i64,
    pub answers_count: i32,
    pub is_resolved: bool,
    pub accepted_answer: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuestionCore {
    fn new(question: &Question, authors: &Authors) -> Self {
        Self {
            id: question.id.to_string(),
            title: question.title.as_str().to_owned(),
            slug: question.slug(),
            description: question.description.as_str().to_owned(),
            tags: question.tags.as_slice().to_vec(),
            author: authors.get(&question.author).map(AuthorSummary::from),
            author_username: question.author_username.clone(),
            votes: question.votes,
            views: question.views,
            answers_count: question.answers_count,
            is_resolved: question.is_resolved,
            accepted_answer: question.accepted_answer.map(|id| id.to_string()),
            created_at: question.created_at,
            updated_at: question.updated_at,
        }
    }
}

/// List rendering: answer ids only, no vote records
#[derive(Debug, Clone, Serialize)]
pub struct QuestionSummary {
    #[serde(flatten)]
    pub core: QuestionCore,
    pub answers: Vec<String>,
}

impl QuestionSummary {
    pub fn new(question: &Question, authors: &Authors) -> Self {
        Self {
            core: QuestionCore::new(question, authors),
            answers: question.answers.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Detail rendering: populated answers and vote records
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDetail {
    #[serde(flatten)]
    pub core: QuestionCore,
    pub answers: Vec<AnswerResponse>,
    pub voted_by: Vec<VoteRecord>,
}

impl QuestionDetail {
    pub fn new(thread: &QuestionThread, authors: &Authors) -> Self {
        Self {
            core: QuestionCore::new(&thread.question, authors),
            answers: thread
                .answers
                .iter()
                .map(|a| AnswerResponse::with_votes(a, authors))
                .collect(),
            voted_by: thread.question.voted_by.records().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResponse {
    pub id: String,
    pub content: String,
    /// Parent question id
    pub question: String,
    pub author: Option<AuthorSummary>,
    pub author_username: String,
    pub votes: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voted_by: Option<Vec<VoteRecord>>,
    pub is_accepted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AnswerResponse {
    /// List rendering without vote records
    pub fn summary(answer: &Answer, authors: &Authors) -> Self {
        Self {
            id: answer.id.to_string(),
            content: answer.content.as_str().to_owned(),
            question: answer.question_id.to_string(),
            author: authors.get(&answer.author).map(AuthorSummary::from),
            author_username: answer.author_username.clone(),
            votes: answer.votes,
            voted_by: None,
            is_accepted: answer.is_accepted,
            created_at: answer.created_at,
            updated_at: answer.updated_at,
        }
    }

    pub fn with_votes(answer: &Answer, authors: &Authors) -> Self {
        Self {
            voted_by: Some(answer.voted_by.records().to_vec()),
            ..Self::summary(answer, authors)
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPagination {
    pub current_page: u32,
    pub total_pages: u64,
    pub total_questions: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl From<PageInfo> for QuestionPagination {
    fn from(info: PageInfo) -> Self {
        Self {
            current_page: info.current_page,
            total_pages: info.total_pages,
            total_questions: info.total_items,
            has_next_page: info.has_next_page,
            has_prev_page: info.has_prev_page,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerPagination {
    pub current_page: u32,
    pub total_pages: u64,
    pub total_answers: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl From<PageInfo> for AnswerPagination {
    fn from(info: PageInfo) -> Self {
        Self {
            current_page: info.current_page,
            total_pages: info.total_pages,
            total_answers: info.total_items,
            has_next_page: info.has_next_page,
            has_prev_page: info.has_prev_page,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionListResponse {
    pub questions: Vec<QuestionSummary>,
    pub pagination: QuestionPagination,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerListResponse {
    pub answers: Vec<AnswerResponse>,
    pub pagination: AnswerPagination,
}

/// Minimal reference returned on creation
#[derive(Debug, Clone, Serialize)]
pub struct QuestionRef {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionEnvelope<T> {
    pub question: T,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerEnvelope {
    pub answer: AnswerResponse,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub votes: i32,
    pub user_vote: Option<VoteType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_tags_repeated_and_comma_separated() {
        let query = QuestionListQuery::from_pairs(pairs(&[
            ("tags", "Rust, SQL"),
            ("tags", "postgres"),
            ("tags", " "),
        ]));
        assert_eq!(query.tags, vec!["rust", "sql", "postgres"]);
    }

    #[test]
    fn test_invalid_author_filter() {
        let query = QuestionListQuery::from_pairs(pairs(&[("author", "not-a-uuid")]));
        let err = query.into_filter().unwrap_err();
        assert!(matches!(err, ForumError::InvalidFilter(_)));
    }

    #[test]
    fn test_unknown_sort_defaults_to_recent() {
        let query = QuestionListQuery::from_pairs(pairs(&[("sort", "hot")]));
        assert_eq!(query.into_filter().unwrap().sort, QuestionSort::Recent);
    }

    #[test]
    fn test_create_question_field_errors() {
        let err = CreateQuestionRequest {
            title: Some("Hi".into()),
            description: Some("A long enough description".into()),
            tags: None,
        }
        .validate()
        .unwrap_err();

        assert_eq!(err.field_errors().len(), 1);
        assert_eq!(err.field_errors()[0].field, "title");
    }

    #[test]
    fn test_answer_vote_accepts_null() {
        assert_eq!(
            AnswerVoteRequest {
                vote_type: Some(None)
            }
            .validate()
            .unwrap(),
            None
        );
        assert_eq!(
            AnswerVoteRequest {
                vote_type: Some(Some("down".into()))
            }
            .validate()
            .unwrap(),
            Some(VoteType::Down)
        );
        assert!(
            AnswerVoteRequest {
                vote_type: Some(Some("sideways".into()))
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn test_answer_vote_distinguishes_null_from_missing() {
        let null: AnswerVoteRequest = serde_json::from_str(r#"{"voteType":null}"#).unwrap();
        assert_eq!(null.validate().unwrap(), None);

        let missing: AnswerVoteRequest = serde_json::from_str("{}").unwrap();
        let err = missing.validate().unwrap_err();
        assert_eq!(err.field_errors()[0].field, "voteType");
        assert_eq!(err.field_errors()[0].message, "Vote type is required");
    }

    #[test]
    fn test_question_vote_rejects_missing_type() {
        let err = QuestionVoteRequest::default().validate().unwrap_err();
        assert_eq!(err.field_errors()[0].field, "voteType");
    }

    #[test]
    fn test_malformed_question_id_reads_as_missing() {
        let err = CreateAnswerRequest {
            content: Some("A thorough explanation".into()),
            question_id: Some("123".into()),
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, ForumError::QuestionNotFound));
    }
}
