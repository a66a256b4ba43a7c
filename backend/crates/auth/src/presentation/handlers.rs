//! HTTP Handlers

use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use std::sync::Arc;

use kernel::extract::ApiJson;
use kernel::response::ApiResponse;
use platform::token::TokenService;

use crate::application::config::AuthConfig;
use crate::application::{
    CheckUserNameUseCase, CurrentUserUseCase, SignInUseCase, SignUpUseCase, UpdateProfileUseCase,
};
use crate::domain::repository::UserRepository;
use crate::error::AuthResult;
use crate::presentation::dto::{
    AuthPayload, AvailabilityResponse, CheckUsernameRequest, LoginRequest, SignUpRequest,
    UpdateProfileRequest, UserEnvelope, UserResponse,
};
use crate::presentation::middleware::AuthUser;

/// Shared state for auth handlers
pub struct AuthAppState<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub tokens: Arc<TokenService>,
}

impl<R> AuthAppState<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        let tokens = Arc::new(config.token_service());
        Self {
            repo,
            config,
            tokens,
        }
    }
}

// Manual impl: `R` itself need not be Clone behind the Arc
impl<R> Clone for AuthAppState<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
            tokens: self.tokens.clone(),
        }
    }
}

impl<R> FromRef<AuthAppState<R>> for Arc<TokenService>
where
    R: UserRepository + Send + Sync + 'static,
{
    fn from_ref(state: &AuthAppState<R>) -> Self {
        state.tokens.clone()
    }
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /api/auth/signup
pub async fn sign_up<R>(
    State(state): State<AuthAppState<R>>,
    ApiJson(req): ApiJson<SignUpRequest>,
) -> AuthResult<(StatusCode, ApiResponse<AuthPayload>)>
where
    R: UserRepository + Send + Sync + 'static,
{
    let input = req.validate()?;

    let use_case = SignUpUseCase::new(state.repo.clone(), state.config.clone(), state.tokens.clone());
    let output = use_case.execute(input).await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::data(AuthPayload {
            user: UserResponse::from(&output.user),
            access_token: output.access_token,
        })
        .with_message("User registered successfully"),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn sign_in<R>(
    State(state): State<AuthAppState<R>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> AuthResult<ApiResponse<AuthPayload>>
where
    R: UserRepository + Send + Sync + 'static,
{
    let input = req.validate()?;

    let use_case = SignInUseCase::new(state.repo.clone(), state.config.clone(), state.tokens.clone());
    let output = use_case.execute(input).await?;

    Ok(ApiResponse::data(AuthPayload {
        user: UserResponse::from(&output.user),
        access_token: output.access_token,
    })
    .with_message("Login successful"))
}

// ============================================================================
// Username Availability
// ============================================================================

/// POST /api/auth/check-username
pub async fn check_user_name<R>(
    State(state): State<AuthAppState<R>>,
    ApiJson(req): ApiJson<CheckUsernameRequest>,
) -> AuthResult<ApiResponse<AvailabilityResponse>>
where
    R: UserRepository + Send + Sync + 'static,
{
    let user_name = req.validate()?;

    CheckUserNameUseCase::new(state.repo.clone())
        .execute(&user_name)
        .await?;

    Ok(ApiResponse::data(AvailabilityResponse {
        username: user_name.original().to_owned(),
        available: true,
    })
    .with_message("Username is available"))
}

// ============================================================================
// Current User
// ============================================================================

/// GET /api/auth/me
pub async fn current_user<R>(
    State(state): State<AuthAppState<R>>,
    auth: AuthUser,
) -> AuthResult<ApiResponse<UserEnvelope>>
where
    R: UserRepository + Send + Sync + 'static,
{
    let user = CurrentUserUseCase::new(state.repo.clone())
        .execute(&auth.user_id())
        .await?;

    Ok(ApiResponse::data(UserEnvelope {
        user: UserResponse::from(&user),
    }))
}

// ============================================================================
// Profile Update
// ============================================================================

/// PUT /api/auth/profile
pub async fn update_profile<R>(
    State(state): State<AuthAppState<R>>,
    auth: AuthUser,
    ApiJson(req): ApiJson<UpdateProfileRequest>,
) -> AuthResult<ApiResponse<UserEnvelope>>
where
    R: UserRepository + Send + Sync + 'static,
{
    let update = req.into_update()?;

    let user = UpdateProfileUseCase::new(state.repo.clone())
        .execute(&auth.user_id(), update)
        .await?;

    Ok(ApiResponse::data(UserEnvelope {
        user: UserResponse::from(&user),
    })
    .with_message("Profile updated successfully"))
}
