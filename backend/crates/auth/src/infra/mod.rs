//! Infrastructure Layer
//!
//! Repository implementations: PostgreSQL and in-process.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryUserRepository;
pub use postgres::PgUserRepository;
