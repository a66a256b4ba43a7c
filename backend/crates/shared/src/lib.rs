//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of domain vocabulary:
//! - Common error types, result aliases and per-field validation errors
//! - The uniform JSON response envelope
//! - Typed ID wrappers shared by users, questions and answers
//! - Page/limit pagination primitives
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all domains.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
#[cfg(feature = "axum")]
pub mod extract;
pub mod id;
pub mod pagination;
pub mod response;
pub mod validation;
