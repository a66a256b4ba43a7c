//! Forum (Questions & Answers) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Question and answer entities, value objects, repository traits
//! - `application/` - One use case per forum operation
//! - `infra/` - PostgreSQL and in-process stores
//! - `presentation/` - HTTP handlers, DTOs, routers
//!
//! ## Features
//! - Questions with tags, full-text search, sorting and pagination
//! - Answers with sorting, editing and soft deletion
//! - Toggle voting on questions, set-style voting on answers
//! - A single accepted answer per question, chosen by its author
//!
//! Mutations require the bearer token issued by the `auth` crate.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use error::{ForumError, ForumResult};
pub use infra::{InMemoryForumStore, PgForumRepository};
pub use presentation::{ForumAppState, ForumStore, answer_router, question_router};
