//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    full_name::FullName,
    profile::{Bio, ProfilePicture},
    user_name::UserName,
    user_password::UserPassword,
};
use crate::error::{AuthError, AuthResult};

/// Unique constraint names from the `users` table
const EMAIL_UNIQUE: &str = "users_email_key";
const USER_NAME_UNIQUE: &str = "users_user_name_canonical_key";

const USER_COLUMNS: &str = r#"
    user_id,
    full_name,
    user_name,
    email,
    password_hash,
    is_email_verified,
    profile_picture,
    bio,
    reputation,
    joined_at,
    last_login_at,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                full_name,
                user_name,
                user_name_canonical,
                email,
                password_hash,
                is_email_verified,
                profile_picture,
                bio,
                reputation,
                joined_at,
                last_login_at,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.full_name.as_str())
        .bind(user.user_name.original())
        .bind(user.user_name.canonical())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_phc_string())
        .bind(user.is_email_verified)
        .bind(user.profile_picture.as_ref().map(ProfilePicture::as_str))
        .bind(user.bio.as_ref().map(Bio::as_str))
        .bind(user.reputation)
        .bind(user.joined_at)
        .bind(user.last_login_at)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_many_by_ids(&self, user_ids: &[UserId]) -> AuthResult<Vec<User>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = user_ids.iter().map(|id| id.into_uuid()).collect();
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ANY($1)");
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(&ids)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE user_name_canonical = $1)",
        )
        .bind(user_name.canonical())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                full_name = $2,
                profile_picture = $3,
                bio = $4,
                reputation = $5,
                is_email_verified = $6,
                last_login_at = $7,
                updated_at = $8
            WHERE user_id = $1
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.full_name.as_str())
        .bind(user.profile_picture.as_ref().map(ProfilePicture::as_str))
        .bind(user.bio.as_ref().map(Bio::as_str))
        .bind(user.reputation)
        .bind(user.is_email_verified)
        .bind(user.last_login_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Report a unique-key collision as the matching duplicate error
fn map_unique_violation(err: sqlx::Error) -> AuthError {
    let duplicate = match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            match db_err.constraint() {
                Some(EMAIL_UNIQUE) => Some(AuthError::EmailTaken),
                Some(USER_NAME_UNIQUE) => Some(AuthError::UserNameTaken),
                _ => None,
            }
        }
        _ => None,
    };
    duplicate.unwrap_or(AuthError::Database(err))
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    full_name: String,
    user_name: String,
    email: String,
    password_hash: String,
    is_email_verified: bool,
    profile_picture: Option<String>,
    bio: Option<String>,
    reputation: i32,
    joined_at: DateTime<Utc>,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            full_name: FullName::from_db(self.full_name),
            user_name: UserName::from_db(&self.user_name),
            email: Email::from_db(self.email),
            password_hash: UserPassword::from_phc_string(self.password_hash)?,
            is_email_verified: self.is_email_verified,
            profile_picture: self.profile_picture.map(ProfilePicture::from_db),
            bio: self.bio.map(Bio::from_db),
            reputation: self.reputation,
            joined_at: self.joined_at,
            last_login_at: self.last_login_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
