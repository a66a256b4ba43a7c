//! Auth Extractor
//!
//! Bearer-token verification for protected routes. Any router whose state
//! can hand out the `TokenService` can take `AuthUser` as a handler argument.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use kernel::id::UserId;
use platform::bearer::extract_bearer;
use platform::token::TokenService;

use crate::error::AuthError;

/// Identity of the caller, taken from a verified bearer token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub UserId);

impl AuthUser {
    pub fn user_id(&self) -> UserId {
        self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    Arc<TokenService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_bearer(&parts.headers).ok_or(AuthError::MissingToken)?;

        let tokens = Arc::<TokenService>::from_ref(state);
        let claims = tokens.verify(token).map_err(AuthError::InvalidToken)?;

        Ok(Self(UserId::from_uuid(claims.user_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, header};
    use std::time::Duration;
    use uuid::Uuid;

    fn tokens() -> Arc<TokenService> {
        Arc::new(TokenService::new(b"middleware-test-secret".to_vec(), Duration::from_secs(60)))
    }

    async fn extract(state: &Arc<TokenService>, auth: Option<&str>) -> Result<AuthUser, AuthError> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        AuthUser::from_request_parts(&mut parts, state).await
    }

    #[tokio::test]
    async fn test_valid_token() {
        let state = tokens();
        let user_id = Uuid::new_v4();
        let token = state.issue(user_id).unwrap();

        let user = extract(&state, Some(&format!("Bearer {token}"))).await.unwrap();
        assert_eq!(user.user_id().into_uuid(), user_id);
    }

    #[tokio::test]
    async fn test_missing_header() {
        let err = extract(&tokens(), None).await.unwrap_err();
        assert!(matches!(err, AuthError::MissingToken));
    }

    #[tokio::test]
    async fn test_foreign_secret_rejected() {
        let other = TokenService::new(b"another-secret".to_vec(), Duration::from_secs(60));
        let token = other.issue(Uuid::new_v4()).unwrap();

        let err = extract(&tokens(), Some(&format!("Bearer {token}"))).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }
}
