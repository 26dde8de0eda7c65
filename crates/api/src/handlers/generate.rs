//! Handler for app generation.

use appgen_db::models::project::Project;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::error::{AppJson, AppResult};
use crate::lifecycle::generate_project;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: String,
    /// Overrides the name derived from the prompt.
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub project: Project,
}

/// POST /api/v1/generate
pub async fn generate(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(input): AppJson<GenerateRequest>,
) -> AppResult<AppJson<GenerateResponse>> {
    let project = generate_project(&state, user.id(), &input.prompt, input.name.as_deref()).await?;
    Ok(AppJson(GenerateResponse {
        success: true,
        project,
    }))
}
