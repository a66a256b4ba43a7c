//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and the bearer-token extractor.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::AuthUser;
pub use router::auth_router;
