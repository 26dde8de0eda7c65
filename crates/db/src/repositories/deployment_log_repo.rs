//! Repository for the `deployment_logs` table.

use appgen_core::status::DeploymentStatus;
use appgen_core::types::DbId;
use sqlx::PgPool;

use crate::models::deployment_log::{CreateDeploymentLog, DeploymentLog, DeploymentOutcome};

const COLUMNS: &str = "id, project_id, user_id, status, deploy_url, error_message, \
                       deployment_provider, build_time, created_at";

pub struct DeploymentLogRepo;

impl DeploymentLogRepo {
    /// Open a deployment attempt in `pending` state.
    pub async fn create_pending(
        pool: &PgPool,
        input: &CreateDeploymentLog,
    ) -> Result<DeploymentLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO deployment_logs (project_id, user_id, status, deployment_provider)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DeploymentLog>(&query)
            .bind(input.project_id)
            .bind(input.user_id)
            .bind(DeploymentStatus::Pending.as_str())
            .bind(&input.deployment_provider)
            .fetch_one(pool)
            .await
    }

    /// Write the terminal outcome of a pending attempt.
    ///
    /// Only rows still in `pending` are updated, so each log is finalized at
    /// most once. Returns `true` if a row was updated.
    pub async fn finish(
        pool: &PgPool,
        id: DbId,
        outcome: &DeploymentOutcome,
    ) -> Result<bool, sqlx::Error> {
        let (deploy_url, error_message, build_time) = match outcome {
            DeploymentOutcome::Success {
                deploy_url,
                build_time_ms,
            } => (Some(deploy_url.as_str()), None, Some(*build_time_ms)),
            DeploymentOutcome::Failed { error_message } => {
                (None, Some(error_message.as_str()), None)
            }
        };

        let result = sqlx::query(
            "UPDATE deployment_logs
             SET status = $2, deploy_url = $3, error_message = $4, build_time = $5
             WHERE id = $1 AND status = $6",
        )
        .bind(id)
        .bind(outcome.status().as_str())
        .bind(deploy_url)
        .bind(error_message)
        .bind(build_time)
        .bind(DeploymentStatus::Pending.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List attempts for one of the user's projects, newest first.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<Vec<DeploymentLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM deployment_logs
             WHERE project_id = $1 AND user_id = $2
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, DeploymentLog>(&query)
            .bind(project_id)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
