//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::{AnswerId, QuestionId, UserId};
use kernel::pagination::{Page, PageRequest};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::domain::entities::{Answer, Question};
use crate::domain::repository::{
    AnswerRepository, ForumUnitOfWork, QuestionFilter, QuestionRepository,
};
use crate::domain::services::search_terms;
use crate::domain::value_objects::{
    AnswerContent, AnswerSort, Description, QuestionSort, Tags, Title, VoteLedger, VoteRecord,
};
use crate::error::{ForumError, ForumResult};

const QUESTION_COLUMNS: &str = r#"
    question_id,
    title,
    description,
    tags,
    author_id,
    author_username,
    votes,
    views,
    answers,
    answers_count,
    is_resolved,
    accepted_answer_id,
    voted_by,
    is_active,
    created_at,
    updated_at
"#;

const ANSWER_COLUMNS: &str = r#"
    answer_id,
    question_id,
    content,
    author_id,
    author_username,
    votes,
    voted_by,
    is_accepted,
    is_active,
    created_at,
    updated_at
"#;

/// Shared WHERE clause for question listing; `NULL` / empty parameters
/// switch a condition off.
const QUESTION_FILTER: &str = r#"
    WHERE is_active
      AND (cardinality($1::text[]) = 0 OR tags && $1::text[])
      AND ($2::text IS NULL OR search_vector @@ websearch_to_tsquery('english', $2))
      AND ($3::uuid IS NULL OR author_id = $3)
"#;

/// PostgreSQL-backed forum repository
#[derive(Clone)]
pub struct PgForumRepository {
    pool: PgPool,
}

impl PgForumRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `websearch_to_tsquery` input matching any of the search words
fn any_term_query(search: &str) -> Option<String> {
    let terms: Vec<String> = search_terms(search)
        .into_iter()
        .filter(|term| term != "or")
        .collect();
    (!terms.is_empty()).then(|| terms.join(" or "))
}

fn question_order(sort: QuestionSort) -> &'static str {
    match sort {
        QuestionSort::Recent => "created_at DESC",
        QuestionSort::Popular => "votes DESC, views DESC, created_at DESC",
        QuestionSort::Views => "views DESC, created_at DESC",
        QuestionSort::Votes => "votes DESC, created_at DESC",
    }
}

fn answer_order(sort: AnswerSort) -> &'static str {
    match sort {
        AnswerSort::Votes => "votes DESC, created_at DESC",
        AnswerSort::Recent => "created_at DESC",
        AnswerSort::Accepted => "is_accepted DESC, votes DESC, created_at DESC",
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

// ============================================================================
// Question Repository Implementation
// ============================================================================

impl QuestionRepository for PgForumRepository {
    async fn insert(&self, question: &Question) -> ForumResult<()> {
        let answers: Vec<Uuid> = question.answers.iter().map(|id| id.into_uuid()).collect();

        sqlx::query(
            r#"
            INSERT INTO questions (
                question_id,
                title,
                description,
                tags,
                author_id,
                author_username,
                votes,
                views,
                answers,
                answers_count,
                is_resolved,
                accepted_answer_id,
                voted_by,
                is_active,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(question.id.as_uuid())
        .bind(question.title.as_str())
        .bind(question.description.as_str())
        .bind(question.tags.as_slice())
        .bind(question.author.as_uuid())
        .bind(&question.author_username)
        .bind(question.votes)
        .bind(question.views)
        .bind(&answers)
        .bind(question.answers_count)
        .bind(question.is_resolved)
        .bind(question.accepted_answer.map(|id| id.into_uuid()))
        .bind(Json(&question.voted_by))
        .bind(question.is_active)
        .bind(question.created_at)
        .bind(question.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_active(&self, id: &QuestionId) -> ForumResult<Option<Question>> {
        let sql = format!("SELECT {QUESTION_COLUMNS} FROM questions WHERE question_id = $1 AND is_active");
        let row = sqlx::query_as::<_, QuestionRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(QuestionRow::into_question))
    }

    async fn list(&self, filter: &QuestionFilter, page: PageRequest) -> ForumResult<Page<Question>> {
        let author = filter.author.map(|id| id.into_uuid());
        let search = filter.search.as_deref().and_then(any_term_query);

        let sql = format!(
            "SELECT {QUESTION_COLUMNS} FROM questions {QUESTION_FILTER} ORDER BY {} LIMIT $4 OFFSET $5",
            question_order(filter.sort)
        );
        let rows = sqlx::query_as::<_, QuestionRow>(&sql)
            .bind(&filter.tags)
            .bind(&search)
            .bind(author)
            .bind(i64::from(page.limit()))
            .bind(to_i64(page.offset()))
            .fetch_all(&self.pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) FROM questions {QUESTION_FILTER}");
        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(&filter.tags)
            .bind(search)
            .bind(author)
            .fetch_one(&self.pool)
            .await?;

        Ok(Page::new(
            rows.into_iter().map(QuestionRow::into_question).collect(),
            u64::try_from(total).unwrap_or_default(),
        ))
    }

    async fn save(&self, question: &Question) -> ForumResult<()> {
        // answers / answers_count / acceptance are owned by the unit of work
        sqlx::query(
            r#"
            UPDATE questions SET
                title = $2,
                description = $3,
                tags = $4,
                votes = $5,
                voted_by = $6,
                is_active = $7,
                updated_at = $8
            WHERE question_id = $1
            "#,
        )
        .bind(question.id.as_uuid())
        .bind(question.title.as_str())
        .bind(question.description.as_str())
        .bind(question.tags.as_slice())
        .bind(question.votes)
        .bind(Json(&question.voted_by))
        .bind(question.is_active)
        .bind(question.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn increment_views(&self, id: &QuestionId) -> ForumResult<Option<i64>> {
        let views = sqlx::query_scalar::<_, i64>(
            "UPDATE questions SET views = views + 1 WHERE question_id = $1 AND is_active RETURNING views",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(views)
    }
}

// ============================================================================
// Answer Repository Implementation
// ============================================================================

impl AnswerRepository for PgForumRepository {
    async fn find_active(&self, id: &AnswerId) -> ForumResult<Option<Answer>> {
        let sql = format!("SELECT {ANSWER_COLUMNS} FROM answers WHERE answer_id = $1 AND is_active");
        let row = sqlx::query_as::<_, AnswerRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(AnswerRow::into_answer))
    }

    async fn list_by_question(
        &self,
        question_id: &QuestionId,
        sort: AnswerSort,
        page: PageRequest,
    ) -> ForumResult<Page<Answer>> {
        let sql = format!(
            "SELECT {ANSWER_COLUMNS} FROM answers WHERE question_id = $1 AND is_active ORDER BY {} LIMIT $2 OFFSET $3",
            answer_order(sort)
        );
        let rows = sqlx::query_as::<_, AnswerRow>(&sql)
            .bind(question_id.as_uuid())
            .bind(i64::from(page.limit()))
            .bind(to_i64(page.offset()))
            .fetch_all(&self.pool)
            .await?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM answers WHERE question_id = $1 AND is_active",
        )
        .bind(question_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(Page::new(
            rows.into_iter().map(AnswerRow::into_answer).collect(),
            u64::try_from(total).unwrap_or_default(),
        ))
    }

    async fn active_for_question(&self, question_id: &QuestionId) -> ForumResult<Vec<Answer>> {
        let sql = format!(
            "SELECT {ANSWER_COLUMNS} FROM answers WHERE question_id = $1 AND is_active ORDER BY created_at ASC"
        );
        let rows = sqlx::query_as::<_, AnswerRow>(&sql)
            .bind(question_id.as_uuid())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(AnswerRow::into_answer).collect())
    }

    async fn save(&self, answer: &Answer) -> ForumResult<()> {
        sqlx::query(
            r#"
            UPDATE answers SET
                content = $2,
                votes = $3,
                voted_by = $4,
                updated_at = $5
            WHERE answer_id = $1
            "#,
        )
        .bind(answer.id.as_uuid())
        .bind(answer.content.as_str())
        .bind(answer.votes)
        .bind(Json(&answer.voted_by))
        .bind(answer.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Unit of Work Implementation
// ============================================================================

impl ForumUnitOfWork for PgForumRepository {
    async fn create_answer(&self, answer: &Answer) -> ForumResult<()> {
        let mut tx = self.pool.begin().await?;

        // Appending in place keeps concurrent siblings; the row lock orders them
        let linked = sqlx::query(
            r#"
            UPDATE questions SET
                answers = array_append(answers, $2),
                answers_count = cardinality(answers) + 1,
                updated_at = now()
            WHERE question_id = $1 AND is_active
            "#,
        )
        .bind(answer.question_id.as_uuid())
        .bind(answer.id.as_uuid())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if linked == 0 {
            return Err(ForumError::QuestionNotFound);
        }

        sqlx::query(
            r#"
            INSERT INTO answers (
                answer_id,
                question_id,
                content,
                author_id,
                author_username,
                votes,
                voted_by,
                is_accepted,
                is_active,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(answer.id.as_uuid())
        .bind(answer.question_id.as_uuid())
        .bind(answer.content.as_str())
        .bind(answer.author.as_uuid())
        .bind(&answer.author_username)
        .bind(answer.votes)
        .bind(Json(&answer.voted_by))
        .bind(answer.is_accepted)
        .bind(answer.is_active)
        .bind(answer.created_at)
        .bind(answer.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn delete_answer(&self, answer: &Answer) -> ForumResult<()> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query(
            "UPDATE answers SET is_active = FALSE, updated_at = now() WHERE answer_id = $1 AND is_active",
        )
        .bind(answer.id.as_uuid())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if deleted == 0 {
            return Err(ForumError::AnswerNotFound);
        }

        sqlx::query(
            r#"
            UPDATE questions SET
                answers = array_remove(answers, $2),
                answers_count = cardinality(array_remove(answers, $2)),
                updated_at = now()
            WHERE question_id = $1
            "#,
        )
        .bind(answer.question_id.as_uuid())
        .bind(answer.id.as_uuid())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn accept_answer(&self, answer: &Answer) -> ForumResult<Answer> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE answers SET
                is_accepted = (answer_id = $2),
                updated_at = now()
            WHERE question_id = $1 AND (is_accepted OR answer_id = $2)
            "#,
        )
        .bind(answer.question_id.as_uuid())
        .bind(answer.id.as_uuid())
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE questions SET
                accepted_answer_id = $2,
                is_resolved = TRUE,
                updated_at = now()
            WHERE question_id = $1
            "#,
        )
        .bind(answer.question_id.as_uuid())
        .bind(answer.id.as_uuid())
        .execute(&mut *tx)
        .await?;

        let sql = format!("SELECT {ANSWER_COLUMNS} FROM answers WHERE answer_id = $1");
        let row = sqlx::query_as::<_, AnswerRow>(&sql)
            .bind(answer.id.as_uuid())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(ForumError::AnswerNotFound)?;

        tx.commit().await?;
        Ok(row.into_answer())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct QuestionRow {
    question_id: Uuid,
    title: String,
    description: String,
    tags: Vec<String>,
    author_id: Uuid,
    author_username: String,
    votes: i32,
    views: i64,
    answers: Vec<Uuid>,
    answers_count: i32,
    is_resolved: bool,
    accepted_answer_id: Option<Uuid>,
    voted_by: Json<Vec<VoteRecord>>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl QuestionRow {
    fn into_question(self) -> Question {
        Question {
            id: QuestionId::from_uuid(self.question_id),
            title: Title::from_db(self.title),
            description: Description::from_db(self.description),
            tags: Tags::from_db(self.tags),
            author: UserId::from_uuid(self.author_id),
            author_username: self.author_username,
            votes: self.votes,
            views: self.views,
            answers: self.answers.into_iter().map(AnswerId::from_uuid).collect(),
            answers_count: self.answers_count,
            is_resolved: self.is_resolved,
            accepted_answer: self.accepted_answer_id.map(AnswerId::from_uuid),
            voted_by: VoteLedger::from_records(self.voted_by.0),
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AnswerRow {
    answer_id: Uuid,
    question_id: Uuid,
    content: String,
    author_id: Uuid,
    author_username: String,
    votes: i32,
    voted_by: Json<Vec<VoteRecord>>,
    is_accepted: bool,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AnswerRow {
    fn into_answer(self) -> Answer {
        Answer {
            id: AnswerId::from_uuid(self.answer_id),
            content: AnswerContent::from_db(self.content),
            question_id: QuestionId::from_uuid(self.question_id),
            author: UserId::from_uuid(self.author_id),
            author_username: self.author_username,
            votes: self.votes,
            voted_by: VoteLedger::from_records(self.voted_by.0),
            is_accepted: self.is_accepted,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_term_query() {
        assert_eq!(any_term_query("mysql join").as_deref(), Some("mysql or join"));
        assert_eq!(any_term_query("this OR that").as_deref(), Some("this or that"));
        assert_eq!(any_term_query("-drop \"table\"").as_deref(), Some("drop or table"));
        assert_eq!(any_term_query("  "), None);
    }
}
