//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - User entity, value objects, repository trait
//! - `application/` - Use cases and application services
//! - `infra/` - PostgreSQL and in-process repositories
//! - `presentation/` - HTTP handlers, DTOs, router, `AuthUser` extractor
//!
//! ## Features
//! - Signup with full name, username, email and password
//! - Login by email and password
//! - Current user profile and partial profile update
//! - Case-insensitive username availability
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (optional application pepper)
//! - Stateless HS256 bearer tokens with a fixed lifetime
//! - Unknown email and wrong password are reported identically

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use domain::entity::user::User;
pub use domain::repository::UserRepository;
pub use error::{AuthError, AuthResult};
pub use infra::{InMemoryUserRepository, PgUserRepository};
pub use presentation::dto::UserResponse;
pub use presentation::{AuthAppState, AuthUser, auth_router};
