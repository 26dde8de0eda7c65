//! Session lifecycle handlers, forwarded to the backend through the
//! restricted gateway. Backend errors pass through with their message.

use appgen_core::error::CoreError;
use appgen_gateway::models::{AuthUser as BackendUser, Session, SignUpResponse};
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::error::{AppJson, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct SignUpResult {
    pub success: bool,
    pub user: BackendUser,
    /// Present when the backend confirmed the address immediately.
    pub session: Option<Session>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub success: bool,
    pub session: Session,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub success: bool,
    pub user: BackendUser,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

fn require_credentials(email: &str, password: &str) -> Result<(), CoreError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(CoreError::Validation(
            "Email and password are required".into(),
        ));
    }
    Ok(())
}

/// POST /api/v1/auth/signup
pub async fn sign_up(
    State(state): State<AppState>,
    AppJson(input): AppJson<SignUpRequest>,
) -> AppResult<AppJson<SignUpResult>> {
    require_credentials(&input.email, &input.password)?;

    let result = state
        .public
        .sign_up(
            input.email.trim(),
            &input.password,
            input.full_name.as_deref(),
        )
        .await?;

    let (user, session) = match result {
        SignUpResponse::Session(session) => (session.user.clone(), Some(session)),
        SignUpResponse::User(user) => (user, None),
    };
    tracing::info!(user_id = %user.id, confirmed = session.is_some(), "User signed up");

    Ok(AppJson(SignUpResult {
        success: true,
        user,
        session,
    }))
}

/// POST /api/v1/auth/signin
pub async fn sign_in(
    State(state): State<AppState>,
    AppJson(input): AppJson<SignInRequest>,
) -> AppResult<AppJson<SessionResponse>> {
    require_credentials(&input.email, &input.password)?;

    let session = state
        .public
        .sign_in(input.email.trim(), &input.password)
        .await?;
    tracing::info!(user_id = %session.user.id, "User signed in");

    Ok(AppJson(SessionResponse {
        success: true,
        session,
    }))
}

/// POST /api/v1/auth/signout
pub async fn sign_out(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<AppJson<MessageResponse>> {
    state.public.sign_out(&user.access_token).await?;
    tracing::info!(user_id = %user.id(), "User signed out");

    Ok(AppJson(MessageResponse {
        success: true,
        message: "Signed out",
    }))
}

/// POST /api/v1/auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    AppJson(input): AppJson<ResetPasswordRequest>,
) -> AppResult<AppJson<MessageResponse>> {
    let email = input.email.trim();
    if email.is_empty() {
        return Err(CoreError::Validation("Email is required".into()).into());
    }

    state
        .public
        .reset_password(email, &state.config.password_reset_redirect())
        .await?;

    Ok(AppJson(MessageResponse {
        success: true,
        message: "Password reset email sent",
    }))
}

/// GET /api/v1/auth/user
pub async fn current_user(user: AuthUser) -> AppJson<UserResponse> {
    AppJson(UserResponse {
        success: true,
        user: user.user,
    })
}
