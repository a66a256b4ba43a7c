//! Router-level tests for the auth crate, run against the in-process store

mod support {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::application::config::AuthConfig;
    use crate::infra::memory::InMemoryUserRepository;
    use crate::presentation::{AuthAppState, auth_router};

    pub const SECRET: &[u8] = b"auth-router-test-secret";

    pub fn config() -> AuthConfig {
        AuthConfig {
            token_secret: SECRET.to_vec(),
            token_ttl: Duration::from_secs(3600),
            password_pepper: None,
        }
    }

    pub fn app() -> Router {
        let state = AuthAppState::new(Arc::new(InMemoryUserRepository::new()), Arc::new(config()));
        auth_router(state)
    }

    pub async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub fn sign_up_body(username: &str, email: &str) -> Value {
        json!({
            "fullName": "Grace Hopper",
            "username": username,
            "email": email,
            "password": "Compiler1",
            "confirmPassword": "Compiler1",
        })
    }

    /// Sign up and return the issued access token
    pub async fn register(app: &Router, username: &str, email: &str) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/signup",
            None,
            Some(sign_up_body(username, email)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["accessToken"].as_str().unwrap().to_owned()
    }
}

mod sign_up_tests {
    use axum::http::{Method, StatusCode};

    use super::support::*;

    #[tokio::test]
    async fn test_sign_up_returns_user_and_token() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/signup",
            None,
            Some(sign_up_body("grace", "Grace@Navy.mil")),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "User registered successfully");
        assert_eq!(body["data"]["user"]["email"], "grace@navy.mil");
        assert_eq!(body["data"]["user"]["username"], "grace");
        assert_eq!(body["data"]["user"]["reputation"], 0);
        assert!(body["data"]["user"].get("password").is_none());
        assert!(body["data"]["user"].get("passwordHash").is_none());
        assert!(body["data"]["accessToken"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_with_new_username() {
        let app = app();
        register(&app, "grace", "grace@navy.mil").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/signup",
            None,
            Some(sign_up_body("hopper", "grace@navy.mil")),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "User with this email already exists");
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected_with_new_email() {
        let app = app();
        register(&app, "grace", "grace@navy.mil").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/signup",
            None,
            Some(sign_up_body("GRACE", "other@navy.mil")),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Username is already taken");
    }

    #[tokio::test]
    async fn test_validation_errors_listed_per_field() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/signup",
            None,
            Some(serde_json::json!({
                "fullName": "G",
                "username": "grace",
                "email": "not-an-email",
                "password": "Compiler1",
                "confirmPassword": "Compiler2",
            })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Validation failed");
        let fields: Vec<&str> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["fullName", "email", "confirmPassword"]);
    }

    #[tokio::test]
    async fn test_malformed_json_body() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/signup",
            None,
            Some(serde_json::Value::String("{".into())),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid JSON body");
    }
}

mod login_tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use super::support::*;

    #[tokio::test]
    async fn test_login_success() {
        let app = app();
        register(&app, "grace", "grace@navy.mil").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/login",
            None,
            Some(json!({"email": "GRACE@navy.mil", "password": "Compiler1"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Login successful");
        assert!(body["data"]["user"]["lastLoginDate"].is_string());
        assert!(body["data"]["accessToken"].is_string());
    }

    #[tokio::test]
    async fn test_wrong_password_matches_unknown_email() {
        let app = app();
        register(&app, "grace", "grace@navy.mil").await;

        let (wrong_status, wrong_body) = send(
            &app,
            Method::POST,
            "/login",
            None,
            Some(json!({"email": "grace@navy.mil", "password": "Compiler2"})),
        )
        .await;
        let (unknown_status, unknown_body) = send(
            &app,
            Method::POST,
            "/login",
            None,
            Some(json!({"email": "nobody@navy.mil", "password": "Compiler1"})),
        )
        .await;

        assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_body["message"], "Invalid email or password");
        assert_eq!(wrong_body["message"], unknown_body["message"]);
    }
}

mod session_tests {
    use std::time::Duration;

    use axum::http::{Method, StatusCode};
    use platform::token::TokenService;
    use serde_json::json;
    use uuid::Uuid;

    use super::support::*;

    #[tokio::test]
    async fn test_me_requires_token() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/me", None, None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Access token is required");
    }

    #[tokio::test]
    async fn test_me_returns_profile() {
        let app = app();
        let token = register(&app, "grace", "grace@navy.mil").await;

        let (status, body) = send(&app, Method::GET, "/me", Some(&token), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["user"]["username"], "grace");
        assert_eq!(body["data"]["user"]["fullName"], "Grace Hopper");
        assert_eq!(body["data"]["user"]["isEmailVerified"], false);
    }

    #[tokio::test]
    async fn test_rejects_tampered_and_foreign_tokens() {
        let app = app();
        let token = register(&app, "grace", "grace@navy.mil").await;

        let mut tampered = token.clone();
        tampered.push('x');
        let (status, body) = send(&app, Method::GET, "/me", Some(&tampered), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid or expired token");

        let foreign = TokenService::new(b"some-other-secret".to_vec(), Duration::from_secs(60))
            .issue(Uuid::new_v4())
            .unwrap();
        let (status, _) = send(&app, Method::GET, "/me", Some(&foreign), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_rejects_expired_token() {
        let app = app();
        let tokens = TokenService::new(SECRET.to_vec(), Duration::from_secs(60));
        let issued_long_ago = chrono::Utc::now().timestamp() - 3600;
        let expired = tokens.issue_at(Uuid::new_v4(), issued_long_ago).unwrap();

        let (status, body) = send(&app, Method::GET, "/me", Some(&expired), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid or expired token");
    }

    #[tokio::test]
    async fn test_valid_token_for_missing_user() {
        let app = app();
        let orphan = TokenService::new(SECRET.to_vec(), Duration::from_secs(60))
            .issue(Uuid::new_v4())
            .unwrap();

        let (status, body) = send(&app, Method::GET, "/me", Some(&orphan), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "User not found");
    }

    #[tokio::test]
    async fn test_update_profile() {
        let app = app();
        let token = register(&app, "grace", "grace@navy.mil").await;

        let (status, body) = send(
            &app,
            Method::PUT,
            "/profile",
            Some(&token),
            Some(json!({
                "bio": "Invented the compiler",
                "profilePicture": "https://example.com/grace.png",
                "reputation": 9000,
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Profile updated successfully");
        assert_eq!(body["data"]["user"]["bio"], "Invented the compiler");
        assert_eq!(body["data"]["user"]["reputation"], 0);
        assert_eq!(body["data"]["user"]["fullName"], "Grace Hopper");

        let (status, body) = send(
            &app,
            Method::PUT,
            "/profile",
            Some(&token),
            Some(json!({"profilePicture": "ftp://example.com/grace.png"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["message"], "Profile picture must be a valid URL");
    }
}

mod availability_tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use super::support::*;

    #[tokio::test]
    async fn test_available_username() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/check-username",
            None,
            Some(json!({"username": "new_user"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["available"], true);
    }

    #[tokio::test]
    async fn test_taken_username_is_case_insensitive() {
        let app = app();
        register(&app, "Grace_H", "grace@navy.mil").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/check-username",
            None,
            Some(json!({"username": "grace_h"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Username is already taken");
    }

    #[tokio::test]
    async fn test_invalid_username_format() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/check-username",
            None,
            Some(json!({"username": "no spaces"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["errors"][0]["message"],
            "Username can only contain letters, numbers, and underscores"
        );
    }
}
