//! Router Assembly
//!
//! Mounts the feature routers under `/api`, plus health and a JSON 404.

use std::sync::Arc;

use auth::{AuthAppState, AuthConfig, UserRepository, auth_router};
use axum::extract::OriginalUri;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use forum::{ForumAppState, ForumStore, answer_router, question_router};
use kernel::error::app_error::AppError;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct HealthResponse {
    success: bool,
    message: &'static str,
    timestamp: DateTime<Utc>,
}

/// GET /api/health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "StackIt API is running successfully!",
        timestamp: Utc::now(),
    })
}

async fn route_not_found(OriginalUri(uri): OriginalUri) -> AppError {
    AppError::not_found(format!("Route {} not found", uri.path()))
}

/// Build the API router over one user store and one forum store
pub fn api_router<F, U>(forum: Arc<F>, users: Arc<U>, auth_config: AuthConfig) -> Router
where
    F: ForumStore,
    U: UserRepository + Send + Sync + 'static,
{
    let auth_state = AuthAppState::new(users.clone(), Arc::new(auth_config));
    let forum_state = ForumAppState::new(forum, users, auth_state.tokens.clone());

    Router::new()
        .route("/api/health", get(health))
        .nest("/api/auth", auth_router(auth_state))
        .nest("/api/questions", question_router(forum_state.clone()))
        .nest("/api/answers", answer_router(forum_state))
        .fallback(route_not_found)
}

#[cfg(test)]
mod tests {
    use auth::InMemoryUserRepository;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use forum::InMemoryForumStore;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        api_router(
            Arc::new(InMemoryForumStore::new()),
            Arc::new(InMemoryUserRepository::new()),
            AuthConfig::with_random_secret(),
        )
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let response = app()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json("/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "StackIt API is running successfully!");
        assert!(body["timestamp"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let (status, body) = get_json("/api/nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Route /api/nowhere not found");
    }

    #[tokio::test]
    async fn test_feature_routers_are_mounted() {
        let (status, body) = get_json("/api/questions").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["questions"], Value::Array(Vec::new()));

        let (status, _) = get_json("/api/auth/me").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
