use appgen_core::artifact::Artifact;
use appgen_core::types::DbId;
use appgen_db::models::deployment_log::{CreateDeploymentLog, DeploymentLog, DeploymentOutcome};
use appgen_db::models::project::{CreateProject, Project};
use appgen_db::models::user_profile::UserProfile;
use appgen_db::repositories::{DeploymentLogRepo, ProjectRepo, UserProfileRepo};
use appgen_gateway::ServiceGateway;

/// Record storage used by the lifecycle coordinator.
///
/// Every method that touches user-owned rows takes the owner's id; the
/// implementation must filter on it.
#[async_trait::async_trait]
pub trait ProjectStore: Send + Sync {
    async fn create_project(&self, input: &CreateProject) -> Result<Project, sqlx::Error>;

    /// Owned project by id, including soft-deleted ones.
    async fn find_project(&self, id: DbId, user_id: DbId) -> Result<Option<Project>, sqlx::Error>;

    /// Owned, non-deleted projects, newest first.
    async fn list_projects(&self, user_id: DbId) -> Result<Vec<Project>, sqlx::Error>;

    /// `generating` to `ready` with the artifact and duration. `None` when
    /// the owned project is no longer `generating`.
    async fn complete_generation(
        &self,
        id: DbId,
        user_id: DbId,
        code: &Artifact,
        generation_time_ms: i64,
    ) -> Result<Option<Project>, sqlx::Error>;

    /// `generating` to `failed`. False when nothing was updated.
    async fn mark_failed(&self, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error>;

    /// `ready` or `deployed` to `deployed` with the URL. `None` when the
    /// owned project is no longer deployable.
    async fn mark_deployed(
        &self,
        id: DbId,
        user_id: DbId,
        deploy_url: &str,
    ) -> Result<Option<Project>, sqlx::Error>;

    /// Soft delete. False when the caller owns no such project.
    async fn soft_delete(&self, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error>;

    async fn open_deployment_log(
        &self,
        input: &CreateDeploymentLog,
    ) -> Result<DeploymentLog, sqlx::Error>;

    /// Write the terminal outcome. False when the log was already final.
    async fn finish_deployment_log(
        &self,
        id: DbId,
        outcome: &DeploymentOutcome,
    ) -> Result<bool, sqlx::Error>;

    async fn list_deployment_logs(
        &self,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<Vec<DeploymentLog>, sqlx::Error>;

    /// Bump the generation counter. False when the user has no profile.
    async fn increment_generations(&self, user_id: DbId) -> Result<bool, sqlx::Error>;

    async fn find_profile(&self, user_id: DbId) -> Result<Option<UserProfile>, sqlx::Error>;

    async fn health_check(&self) -> Result<(), sqlx::Error>;
}

/// [`ProjectStore`] over the privileged gateway's Postgres pool.
#[derive(Clone)]
pub struct PgProjectStore {
    gateway: ServiceGateway,
}

impl PgProjectStore {
    pub fn new(gateway: ServiceGateway) -> Self {
        Self { gateway }
    }
}

#[async_trait::async_trait]
impl ProjectStore for PgProjectStore {
    async fn create_project(&self, input: &CreateProject) -> Result<Project, sqlx::Error> {
        ProjectRepo::create(self.gateway.pool(), input).await
    }

    async fn find_project(&self, id: DbId, user_id: DbId) -> Result<Option<Project>, sqlx::Error> {
        ProjectRepo::find_owned(self.gateway.pool(), id, user_id).await
    }

    async fn list_projects(&self, user_id: DbId) -> Result<Vec<Project>, sqlx::Error> {
        ProjectRepo::list_for_user(self.gateway.pool(), user_id).await
    }

    async fn complete_generation(
        &self,
        id: DbId,
        user_id: DbId,
        code: &Artifact,
        generation_time_ms: i64,
    ) -> Result<Option<Project>, sqlx::Error> {
        ProjectRepo::complete_generation(self.gateway.pool(), id, user_id, code, generation_time_ms)
            .await
    }

    async fn mark_failed(&self, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        ProjectRepo::mark_failed(self.gateway.pool(), id, user_id).await
    }

    async fn mark_deployed(
        &self,
        id: DbId,
        user_id: DbId,
        deploy_url: &str,
    ) -> Result<Option<Project>, sqlx::Error> {
        ProjectRepo::mark_deployed(self.gateway.pool(), id, user_id, deploy_url).await
    }

    async fn soft_delete(&self, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        ProjectRepo::soft_delete(self.gateway.pool(), id, user_id).await
    }

    async fn open_deployment_log(
        &self,
        input: &CreateDeploymentLog,
    ) -> Result<DeploymentLog, sqlx::Error> {
        DeploymentLogRepo::create_pending(self.gateway.pool(), input).await
    }

    async fn finish_deployment_log(
        &self,
        id: DbId,
        outcome: &DeploymentOutcome,
    ) -> Result<bool, sqlx::Error> {
        DeploymentLogRepo::finish(self.gateway.pool(), id, outcome).await
    }

    async fn list_deployment_logs(
        &self,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<Vec<DeploymentLog>, sqlx::Error> {
        DeploymentLogRepo::list_for_project(self.gateway.pool(), project_id, user_id).await
    }

    async fn increment_generations(&self, user_id: DbId) -> Result<bool, sqlx::Error> {
        UserProfileRepo::increment_generations(self.gateway.pool(), user_id).await
    }

    async fn find_profile(&self, user_id: DbId) -> Result<Option<UserProfile>, sqlx::Error> {
        UserProfileRepo::find_by_id(self.gateway.pool(), user_id).await
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        appgen_db::health_check(self.gateway.pool()).await
    }
}
