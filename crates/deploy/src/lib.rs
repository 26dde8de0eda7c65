//! Deployment client.
//!
//! Pushes a generated [`Artifact`] to a static hosting provider and waits
//! for it to go live. [`VercelDeployer`] talks to the Vercel v13
//! deployments API; [`MockDeployer`] stands in for it when no token is
//! configured. Callers hold either one as `Arc<dyn Deployer>`, chosen once
//! by [`select_deployer`].

use std::sync::Arc;

use appgen_core::artifact::Artifact;
use serde::Serialize;

pub mod error;
pub mod mock;
pub mod poll;
pub mod vercel;

pub use error::DeployError;
pub use mock::MockDeployer;
pub use poll::{PollConfig, ReadyState};
pub use vercel::{VercelConfig, VercelDeployer};

/// A live deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deployment {
    /// Public `https://` URL.
    pub url: String,
    pub deployment_id: String,
}

/// A single status read for an existing deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderStatus {
    pub state: ReadyState,
    /// Public URL, present only once the deployment is ready.
    pub url: Option<String>,
}

/// A hosting provider that can publish an artifact.
#[async_trait::async_trait]
pub trait Deployer: Send + Sync {
    /// Provider tag recorded on deployment logs.
    fn provider(&self) -> &str;

    /// Publish `artifact` under a slug derived from `project_name` and wait
    /// until it is live.
    async fn deploy(
        &self,
        project_name: &str,
        artifact: &Artifact,
    ) -> Result<Deployment, DeployError>;

    /// Read the current state of a deployment once, without polling.
    async fn status(&self, deployment_id: &str) -> Result<ProviderStatus, DeployError>;
}

/// Reject deployment ids that could change the request path or query.
///
/// Provider ids are opaque tokens such as `dpl_3Kx9`; anything outside
/// `[A-Za-z0-9_-]` is refused before it reaches a URL.
pub fn validate_deployment_id(deployment_id: &str) -> Result<(), DeployError> {
    let valid = !deployment_id.is_empty()
        && deployment_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(DeployError::InvalidDeploymentId)
    }
}

/// Pick the real deployer when a token is configured, otherwise the mock.
pub fn select_deployer(vercel: Option<VercelConfig>) -> Result<Arc<dyn Deployer>, DeployError> {
    match vercel {
        Some(config) => {
            tracing::info!(team_scoped = config.team_id.is_some(), "Using Vercel deployer");
            Ok(Arc::new(VercelDeployer::new(config)?))
        }
        None => {
            tracing::info!("VERCEL_TOKEN not set, using mock deployer");
            Ok(Arc::new(MockDeployer::new()))
        }
    }
}
