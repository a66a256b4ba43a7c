//! Infrastructure Layer
//!
//! Repository implementations: PostgreSQL and in-process.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryForumStore;
pub use postgres::PgForumRepository;
