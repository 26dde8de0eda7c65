//! Repository for the `projects` table.

use appgen_core::artifact::Artifact;
use appgen_core::status::ProjectStatus;
use appgen_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, name, description, code, preview_url, deploy_url, status, \
                       ai_model, generation_time, created_at, updated_at";

/// Provides lifecycle operations for projects.
///
/// Reads are always scoped to the owning user. Status writes go through the
/// named transition methods rather than a generic setter.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project in `generating` state with an empty artifact.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (user_id, name, description, code, status, ai_model)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(input.user_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(Json(Artifact::empty()))
            .bind(ProjectStatus::Generating.as_str())
            .bind(&input.ai_model)
            .fetch_one(pool)
            .await
    }

    /// Find a project owned by `user_id`, including soft-deleted rows.
    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's projects, newest first. Excludes soft-deleted rows.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE user_id = $1 AND status <> $2
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(user_id)
            .bind(ProjectStatus::Deleted.as_str())
            .fetch_all(pool)
            .await
    }

    /// Store generated code and move an owned `generating` project to
    /// `ready`.
    ///
    /// Returns `None` if the row is missing, not owned by `user_id`, or has
    /// left `generating` (e.g. it was deleted while the model was running).
    pub async fn complete_generation(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        code: &Artifact,
        generation_time_ms: i64,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET code = $3, status = $4, generation_time = $5
             WHERE id = $1 AND user_id = $2 AND status = $6
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(user_id)
            .bind(Json(code))
            .bind(ProjectStatus::Ready.as_str())
            .bind(generation_time_ms)
            .bind(ProjectStatus::Generating.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Move an owned `generating` project to `failed`. Returns `true` if a
    /// row was updated.
    pub async fn mark_failed(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects SET status = $3 WHERE id = $1 AND user_id = $2 AND status = $4",
        )
        .bind(id)
        .bind(user_id)
        .bind(ProjectStatus::Failed.as_str())
        .bind(ProjectStatus::Generating.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record a deploy URL and move an owned `ready` or `deployed` project
    /// to `deployed`.
    ///
    /// Returns `None` if the row is missing, not owned by `user_id`, or is
    /// no longer deployable (e.g. it was deleted during the deployment).
    pub async fn mark_deployed(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        deploy_url: &str,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET deploy_url = $3, status = $4
             WHERE id = $1 AND user_id = $2 AND status IN ($5, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(user_id)
            .bind(deploy_url)
            .bind(ProjectStatus::Deployed.as_str())
            .bind(ProjectStatus::Ready.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a project owned by `user_id`.
    ///
    /// Idempotent: returns `true` whenever the owned row exists, including
    /// when it was already deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE projects SET status = $3 WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .bind(ProjectStatus::Deleted.as_str())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
