//! Handler for reading a deployment's status from the hosting provider.

use appgen_deploy::{validate_deployment_id, DeployError};
use axum::extract::{Path, State};
use serde::Serialize;

use crate::error::{AppError, AppJson, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DeploymentStatusResponse {
    pub success: bool,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// GET /api/v1/deployments/{deployment_id}
///
/// A single status read; does not wait for the deployment to settle.
pub async fn status(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(deployment_id): Path<String>,
) -> AppResult<AppJson<DeploymentStatusResponse>> {
    validate_deployment_id(&deployment_id)?;

    let status = state
        .deployer
        .status(&deployment_id)
        .await
        .map_err(|e| match e {
            e @ (DeployError::Configuration(_) | DeployError::InvalidDeploymentId) => {
                AppError::Deploy(e)
            }
            other => AppError::InternalError(format!(
                "Failed to get status of deployment {deployment_id}: {other}"
            )),
        })?;

    Ok(AppJson(DeploymentStatusResponse {
        success: true,
        status: status.state.as_str(),
        url: status.url,
    }))
}
