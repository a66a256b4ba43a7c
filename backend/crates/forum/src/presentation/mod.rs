//! Presentation Layer
//!
//! HTTP handlers, DTOs and the question/answer routers.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::{ForumAppState, ForumStore};
pub use router::{answer_router, question_router};
