//! Application Layer
//!
//! One use case per forum operation.

pub mod accept_answer;
pub mod ask_question;
pub mod authors;
pub mod browse_answers;
pub mod browse_questions;
pub mod manage_answer;
pub mod manage_question;
pub mod post_answer;
pub mod vote;

// Re-exports
pub use accept_answer::AcceptAnswerUseCase;
pub use ask_question::{AskQuestionInput, AskQuestionUseCase};
pub use authors::{Authors, WithAuthors};
pub use browse_answers::BrowseAnswersUseCase;
pub use browse_questions::{BrowseQuestionsUseCase, QuestionThread};
pub use manage_answer::ManageAnswerUseCase;
pub use manage_question::ManageQuestionUseCase;
pub use post_answer::{PostAnswerInput, PostAnswerUseCase};
pub use vote::{VoteOutcome, VoteUseCase};
