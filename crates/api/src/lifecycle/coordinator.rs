//! The two state-changing entry points: generate and deploy.
//!
//! ```text
//! generate:  (new) -> generating -> ready          (artifact persisted)
//!                               \-> failed         (persistence failed)
//! deploy:    ready | deployed -> deployed          (provider succeeded)
//!            ready | deployed -> unchanged         (provider failed)
//! ```
//!
//! The status check before calling a provider reads a snapshot. The write
//! afterwards is conditional on the status still allowing the transition,
//! so a project deleted mid-flight stays deleted.

use std::time::Instant;

use appgen_core::error::CoreError;
use appgen_core::naming::extract_project_name;
use appgen_core::status::LifecycleEvent;
use appgen_core::types::DbId;
use appgen_db::models::deployment_log::{CreateDeploymentLog, DeploymentOutcome};
use appgen_db::models::project::{CreateProject, Project};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Parse a caller-supplied project id. Anything that is not a UUID cannot
/// name an existing project, so it is reported as not found.
pub fn parse_project_id(raw: &str) -> AppResult<DbId> {
    raw.trim()
        .parse::<DbId>()
        .map_err(|_| AppError::NotFound("Project"))
}

/// Create a project for `prompt`, generate its artifact, and persist it.
///
/// Generation itself cannot fail. If persisting the result fails the
/// project is moved to `failed` and the persistence error is returned.
/// The user's generation counter is bumped on a best-effort basis.
pub async fn generate_project(
    state: &AppState,
    user_id: DbId,
    prompt: &str,
    name: Option<&str>,
) -> AppResult<Project> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(CoreError::Validation("Prompt is required".into()).into());
    }

    let name = name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| extract_project_name(prompt));

    let project = state
        .store
        .create_project(&CreateProject {
            user_id,
            name,
            description: prompt.to_string(),
            ai_model: state.generator.model_tag().to_string(),
        })
        .await?;
    tracing::info!(project_id = %project.id, %user_id, "Generating project");

    let started = Instant::now();
    let artifact = state.generator.generate(prompt).await;
    let elapsed_ms = started.elapsed().as_millis() as i64;

    project.status.apply(LifecycleEvent::GenerationSucceeded)?;
    let updated = match state
        .store
        .complete_generation(project.id, user_id, &artifact, elapsed_ms)
        .await
    {
        Ok(Some(updated)) => updated,
        Ok(None) => {
            tracing::warn!(
                project_id = %project.id,
                "Project left generating before the artifact was stored",
            );
            return Err(CoreError::InvalidState("Project is no longer generating".into()).into());
        }
        Err(e) => {
            mark_failed(state, project.id, user_id).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        project_id = %updated.id,
        file_count = artifact.file_count(),
        elapsed_ms,
        "Project generated",
    );

    match state.store.increment_generations(user_id).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::warn!(%user_id, "No profile to count generation against");
        }
        Err(e) => {
            tracing::warn!(%user_id, error = %e, "Failed to increment generation counter");
        }
    }

    Ok(updated)
}

async fn mark_failed(state: &AppState, project_id: DbId, user_id: DbId) {
    if let Err(e) = state.store.mark_failed(project_id, user_id).await {
        tracing::error!(%project_id, error = %e, "Failed to mark project as failed");
    }
}

/// Deploy an owned project and record the attempt.
///
/// The attempt is logged as `pending` before the provider is called and
/// finalized exactly once. A provider failure leaves the project status
/// unchanged and is returned to the caller. A project that stopped being
/// deployable while the provider ran (e.g. it was deleted) keeps its status
/// and the attempt is logged as failed.
pub async fn deploy_project(
    state: &AppState,
    user_id: DbId,
    project_id: &str,
) -> AppResult<(String, Project)> {
    if project_id.trim().is_empty() {
        return Err(CoreError::Validation("Project ID is required".into()).into());
    }
    let project_id = parse_project_id(project_id)?;

    let project = state
        .store
        .find_project(project_id, user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        })?;
    project.status.apply(LifecycleEvent::Deployed)?;

    let log = state
        .store
        .open_deployment_log(&CreateDeploymentLog {
            project_id,
            user_id,
            deployment_provider: state.deployer.provider().to_string(),
        })
        .await?;
    tracing::info!(%project_id, deployment_log_id = %log.id, "Deploying project");

    let started = Instant::now();
    let deployment = match state.deployer.deploy(&project.name, &project.code).await {
        Ok(deployment) => deployment,
        Err(e) => {
            tracing::error!(%project_id, error = %e, "Deployment failed");
            finish_log(
                state,
                log.id,
                DeploymentOutcome::Failed {
                    error_message: e.to_string(),
                },
            )
            .await;
            return Err(e.into());
        }
    };
    let build_time_ms = started.elapsed().as_millis() as i64;

    let recorded = state
        .store
        .mark_deployed(project_id, user_id, &deployment.url)
        .await;
    let (error_message, err): (&str, AppError) = match recorded {
        Ok(Some(updated)) => {
            finish_log(
                state,
                log.id,
                DeploymentOutcome::Success {
                    deploy_url: deployment.url.clone(),
                    build_time_ms,
                },
            )
            .await;

            tracing::info!(
                %project_id,
                deployment_id = %deployment.deployment_id,
                url = %deployment.url,
                build_time_ms,
                "Project deployed",
            );
            return Ok((deployment.url, updated));
        }
        Ok(None) => {
            tracing::warn!(
                %project_id,
                deployment_id = %deployment.deployment_id,
                "Project stopped being deployable during deployment",
            );
            let message = "Project is no longer deployable";
            (message, CoreError::InvalidState(message.into()).into())
        }
        Err(e) => ("Failed to update project", AppError::Database(e)),
    };

    finish_log(
        state,
        log.id,
        DeploymentOutcome::Failed {
            error_message: error_message.to_string(),
        },
    )
    .await;
    Err(err)
}

async fn finish_log(state: &AppState, log_id: DbId, outcome: DeploymentOutcome) {
    match state.store.finish_deployment_log(log_id, &outcome).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::warn!(%log_id, "Deployment log was already finalized");
        }
        Err(e) => {
            tracing::error!(%log_id, error = %e, "Failed to finalize deployment log");
        }
    }
}
