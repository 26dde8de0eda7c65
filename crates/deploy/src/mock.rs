//! Offline stand-in for the hosting provider.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use appgen_core::artifact::Artifact;
use appgen_core::naming::sanitize_slug;

use crate::error::DeployError;
use crate::{Deployer, Deployment, ProviderStatus};

/// Simulated build time.
pub const DEFAULT_MOCK_DELAY: Duration = Duration::from_secs(2);

/// Deployer that never touches the network.
///
/// Sleeps for a fixed delay and returns
/// `https://{slug}-mock-{millis}.vercel.app`. It reports the `vercel`
/// provider tag because it substitutes for that provider.
#[derive(Debug, Clone)]
pub struct MockDeployer {
    delay: Duration,
}

impl MockDeployer {
    pub fn new() -> Self {
        Self::with_delay(DEFAULT_MOCK_DELAY)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for MockDeployer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Deployer for MockDeployer {
    fn provider(&self) -> &str {
        "vercel"
    }

    async fn deploy(
        &self,
        project_name: &str,
        artifact: &Artifact,
    ) -> Result<Deployment, DeployError> {
        tracing::info!(
            file_count = artifact.file_count(),
            "Using mock deployment (Vercel token not configured)",
        );
        tokio::time::sleep(self.delay).await;

        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let deployment_id = format!("mock-{millis}");
        let url = format!(
            "https://{}-{deployment_id}.vercel.app",
            sanitize_slug(project_name)
        );

        Ok(Deployment { url, deployment_id })
    }

    async fn status(&self, _deployment_id: &str) -> Result<ProviderStatus, DeployError> {
        Err(DeployError::not_configured())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appgen_core::artifact::CodeFile;
    use assert_matches::assert_matches;

    fn artifact() -> Artifact {
        Artifact {
            files: vec![CodeFile::new("index.html", "<p>hi</p>", "html")],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn synthesizes_url_from_slug() {
        let deployer = MockDeployer::with_delay(Duration::ZERO);
        let deployment = deployer.deploy("My Cool App!!", &artifact()).await.unwrap();

        assert!(deployment.deployment_id.starts_with("mock-"));
        assert_eq!(
            deployment.url,
            format!("https://my-cool-app-{}.vercel.app", deployment.deployment_id)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn waits_the_configured_delay() {
        let deployer = MockDeployer::new();
        let start = tokio::time::Instant::now();
        deployer.deploy("x", &artifact()).await.unwrap();
        assert!(start.elapsed() >= DEFAULT_MOCK_DELAY);
    }

    #[tokio::test]
    async fn status_requires_a_real_provider() {
        let deployer = MockDeployer::with_delay(Duration::ZERO);
        assert_matches!(
            deployer.status("mock-1").await,
            Err(DeployError::Configuration(_))
        );
    }
}
