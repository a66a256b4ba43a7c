//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (Question, Answer)
//! - Domain value objects (Title, Tags, VoteLedger, sort orders)
//! - Domain services (slug, text search)
//! - Repository traits (interfaces)

pub mod entities;
pub mod repository;
pub mod services;
pub mod value_objects;
