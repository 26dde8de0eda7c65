//! Deployment log model and DTOs.

use appgen_core::status::DeploymentStatus;
use appgen_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `deployment_logs` table: one deployment attempt.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DeploymentLog {
    pub id: DbId,
    pub project_id: DbId,
    pub user_id: DbId,
    #[sqlx(try_from = "String")]
    pub status: DeploymentStatus,
    pub deploy_url: Option<String>,
    pub error_message: Option<String>,
    pub deployment_provider: String,
    /// Build time in milliseconds, set on success.
    pub build_time: Option<i64>,
    pub created_at: Timestamp,
}

/// DTO for opening a deployment attempt in `pending` state.
#[derive(Debug, Clone)]
pub struct CreateDeploymentLog {
    pub project_id: DbId,
    pub user_id: DbId,
    pub deployment_provider: String,
}

/// Terminal outcome written once to a pending deployment log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentOutcome {
    Success { deploy_url: String, build_time_ms: i64 },
    Failed { error_message: String },
}

impl DeploymentOutcome {
    pub fn status(&self) -> DeploymentStatus {
        match self {
            DeploymentOutcome::Success { .. } => DeploymentStatus::Success,
            DeploymentOutcome::Failed { .. } => DeploymentStatus::Failed,
        }
    }
}
