//! Handler for the caller's profile.

use appgen_core::error::CoreError;
use appgen_db::models::user_profile::UserProfile;
use axum::extract::State;
use serde::Serialize;

use crate::error::{AppJson, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub profile: UserProfile,
}

/// GET /api/v1/profile
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<AppJson<ProfileResponse>> {
    let profile = state
        .store
        .find_profile(user.id())
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Profile",
            id: user.id(),
        })?;
    Ok(AppJson(ProfileResponse {
        success: true,
        profile,
    }))
}
