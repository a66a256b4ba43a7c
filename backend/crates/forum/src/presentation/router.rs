//! Forum Routers

use axum::{
    Router,
    routing::{get, post, put},
};

use auth::UserRepository;

use crate::presentation::handlers::{self, ForumAppState, ForumStore};

/// Routes mounted under `/api/questions`
pub fn question_router<F, U>(state: ForumAppState<F, U>) -> Router
where
    F: ForumStore,
    U: UserRepository + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/",
            get(handlers::list_questions::<F, U>).post(handlers::create_question::<F, U>),
        )
        .route("/user/{user_id}", get(handlers::list_user_questions::<F, U>))
        .route(
            "/{id}",
            get(handlers::get_question::<F, U>)
                .put(handlers::update_question::<F, U>)
                .delete(handlers::delete_question::<F, U>),
        )
        .route("/{id}/vote", post(handlers::vote_question::<F, U>))
        .with_state(state)
}

/// Routes mounted under `/api/answers`
pub fn answer_router<F, U>(state: ForumAppState<F, U>) -> Router
where
    F: ForumStore,
    U: UserRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/", post(handlers::create_answer::<F, U>))
        .route("/question/{question_id}", get(handlers::list_answers::<F, U>))
        .route(
            "/{id}",
            put(handlers::update_answer::<F, U>).delete(handlers::delete_answer::<F, U>),
        )
        .route("/{id}/vote", post(handlers::vote_answer::<F, U>))
        .route("/{id}/accept", post(handlers::accept_answer::<F, U>))
        .with_state(state)
}
