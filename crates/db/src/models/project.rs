//! Project entity model and DTOs.

use appgen_core::artifact::Artifact;
use appgen_core::status::ProjectStatus;
use appgen_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    /// The prompt the project was generated from.
    pub description: String,
    #[sqlx(json)]
    pub code: Artifact,
    pub preview_url: Option<String>,
    pub deploy_url: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: ProjectStatus,
    pub ai_model: String,
    /// Wall-clock generation time in milliseconds.
    pub generation_time: Option<i64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a project. New rows always start in `generating`
/// with an empty artifact.
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub user_id: DbId,
    pub name: String,
    pub description: String,
    pub ai_model: String,
}
