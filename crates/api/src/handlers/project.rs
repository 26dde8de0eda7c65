//! Handlers for the `/projects` resource.
//!
//! Every read and write is scoped to the caller's own projects.

use appgen_core::error::CoreError;
use appgen_core::types::DbId;
use appgen_db::models::deployment_log::DeploymentLog;
use appgen_db::models::project::Project;
use axum::extract::{Path, State};
use serde::Serialize;

use crate::error::{AppError, AppJson, AppResult};
use crate::lifecycle::parse_project_id;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    pub success: bool,
    pub projects: Vec<Project>,
}

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub success: bool,
    pub project: Project,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DeploymentLogsResponse {
    pub success: bool,
    pub deployments: Vec<DeploymentLog>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Project",
        id,
    })
}

/// GET /api/v1/projects
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<AppJson<ProjectListResponse>> {
    let projects = state.store.list_projects(user.id()).await?;
    Ok(AppJson(ProjectListResponse {
        success: true,
        projects,
    }))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<AppJson<ProjectResponse>> {
    let id = parse_project_id(&id)?;
    let project = state
        .store
        .find_project(id, user.id())
        .await?
        .filter(|p| !p.status.is_deleted())
        .ok_or_else(|| not_found(id))?;
    Ok(AppJson(ProjectResponse {
        success: true,
        project,
    }))
}

/// DELETE /api/v1/projects/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<AppJson<DeleteResponse>> {
    let id = parse_project_id(&id)?;
    if !state.store.soft_delete(id, user.id()).await? {
        return Err(not_found(id));
    }
    tracing::info!(project_id = %id, user_id = %user.id(), "Project deleted");
    Ok(AppJson(DeleteResponse {
        success: true,
        message: "Project deleted successfully",
    }))
}

/// GET /api/v1/projects/{id}/deployments
pub async fn list_deployments(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<AppJson<DeploymentLogsResponse>> {
    let id = parse_project_id(&id)?;
    state
        .store
        .find_project(id, user.id())
        .await?
        .filter(|p| !p.status.is_deleted())
        .ok_or_else(|| not_found(id))?;
    let deployments = state.store.list_deployment_logs(id, user.id()).await?;
    Ok(AppJson(DeploymentLogsResponse {
        success: true,
        deployments,
    }))
}
