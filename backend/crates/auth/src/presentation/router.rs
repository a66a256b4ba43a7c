//! Auth Router

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::domain::repository::UserRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the Auth router for any user repository implementation
pub fn auth_router<R>(state: AuthAppState<R>) -> Router
where
    R: UserRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/signup", post(handlers::sign_up::<R>))
        .route("/login", post(handlers::sign_in::<R>))
        .route("/check-username", post(handlers::check_user_name::<R>))
        .route("/me", get(handlers::current_user::<R>))
        .route("/profile", put(handlers::update_profile::<R>))
        .with_state(state)
}
