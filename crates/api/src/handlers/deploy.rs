//! Handler for deploying a generated project.

use appgen_db::models::project::Project;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::error::{AppJson, AppResult};
use crate::lifecycle::deploy_project;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DeployRequest {
    #[serde(default)]
    pub project_id: String,
}

#[derive(Debug, Serialize)]
pub struct DeployResponse {
    pub success: bool,
    pub deploy_url: String,
    pub project: Project,
}

/// POST /api/v1/deploy
pub async fn deploy(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(input): AppJson<DeployRequest>,
) -> AppResult<AppJson<DeployResponse>> {
    let (deploy_url, project) = deploy_project(&state, user.id(), &input.project_id).await?;
    Ok(AppJson(DeployResponse {
        success: true,
        deploy_url,
        project,
    }))
}
