//! REST client for the Vercel v13 deployments API.

use std::time::{Duration, Instant};

use appgen_core::artifact::Artifact;
use appgen_core::naming::sanitize_slug;
use serde::{Deserialize, Serialize};

use crate::error::DeployError;
use crate::poll::{evaluate, PollConfig, PollOutcome, ReadyState};
use crate::{validate_deployment_id, Deployer, Deployment, ProviderStatus};

pub const DEFAULT_API_URL: &str = "https://api.vercel.com";

/// Settings for [`VercelDeployer`].
#[derive(Debug, Clone)]
pub struct VercelConfig {
    pub token: String,
    /// Optional team scope, sent as `?teamId=`.
    pub team_id: Option<String>,
    /// Base URL without trailing slash.
    pub api_url: String,
    pub poll: PollConfig,
    /// Ceiling for each individual HTTP call.
    pub request_timeout: Duration,
}

impl VercelConfig {
    pub fn new(token: impl Into<String>, team_id: Option<String>) -> Self {
        Self {
            token: token.into(),
            team_id,
            api_url: DEFAULT_API_URL.to_string(),
            poll: PollConfig::default(),
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Longest a single `deploy` can take: the create call, the polling
    /// window, one more interval, and a status read started just before
    /// the window closed.
    pub fn worst_case(&self) -> Duration {
        self.request_timeout * 2 + self.poll.timeout + self.poll.interval
    }
}

pub struct VercelDeployer {
    client: reqwest::Client,
    config: VercelConfig,
}

#[derive(Serialize)]
struct CreateDeploymentBody<'a> {
    name: String,
    files: Vec<DeploymentFile<'a>>,
    #[serde(rename = "projectSettings")]
    project_settings: ProjectSettings,
    target: &'a str,
}

#[derive(Serialize)]
struct DeploymentFile<'a> {
    file: &'a str,
    data: &'a str,
}

/// Static site: no framework preset, no build step, files served as-is.
#[derive(Serialize)]
struct ProjectSettings {
    framework: Option<String>,
    #[serde(rename = "buildCommand")]
    build_command: Option<String>,
    #[serde(rename = "outputDirectory")]
    output_directory: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeploymentResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(rename = "readyState", default)]
    ready_state: Option<ReadyState>,
}

impl DeploymentResponse {
    fn state(&self) -> ReadyState {
        self.ready_state.unwrap_or(ReadyState::Unknown)
    }

    fn public_url(&self) -> Option<String> {
        self.url.as_deref().map(|host| format!("https://{host}"))
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl VercelDeployer {
    pub fn new(config: VercelConfig) -> Result<Self, DeployError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: VercelConfig) -> Self {
        Self { client, config }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{path}", self.config.api_url))
            .bearer_auth(&self.config.token);
        match &self.config.team_id {
            Some(team_id) => builder.query(&[("teamId", team_id)]),
            None => builder,
        }
    }

    /// Submit every artifact file verbatim and return the new deployment id.
    async fn create(&self, slug: String, artifact: &Artifact) -> Result<String, DeployError> {
        let body = CreateDeploymentBody {
            name: slug,
            files: artifact
                .files
                .iter()
                .map(|f| DeploymentFile {
                    file: &f.path,
                    data: &f.content,
                })
                .collect(),
            project_settings: ProjectSettings {
                framework: None,
                build_command: None,
                output_directory: None,
            },
            target: "production",
        };

        let response = self
            .request(reqwest::Method::POST, "/v13/deployments")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorEnvelope>()
                .await
                .ok()
                .and_then(|e| e.error)
                .and_then(|e| e.message)
                .unwrap_or_else(|| "Unknown error".to_string());
            tracing::error!(status = status.as_u16(), %message, "Vercel rejected deployment");
            return Err(DeployError::Provider(format!("Deployment failed: {message}")));
        }

        let created: DeploymentResponse = response.json().await?;
        Ok(created.id)
    }

    async fn fetch(&self, deployment_id: &str) -> Result<DeploymentResponse, DeployError> {
        validate_deployment_id(deployment_id)?;
        let response = self
            .request(
                reqwest::Method::GET,
                &format!("/v13/deployments/{deployment_id}"),
            )
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeployError::Provider(format!(
                "Failed to check deployment status ({})",
                status.as_u16()
            )));
        }
        Ok(response.json().await?)
    }

    /// Poll until the deployment is ready, failed, or the ceiling passes.
    async fn wait_until_ready(&self, deployment_id: &str) -> Result<String, DeployError> {
        let poll = &self.config.poll;
        let started = Instant::now();

        loop {
            let deployment = self.fetch(deployment_id).await?;
            let state = deployment.state();

            match evaluate(started.elapsed(), state, poll) {
                PollOutcome::Ready => {
                    return deployment.public_url().ok_or_else(|| {
                        DeployError::Provider("Deployment is ready but has no URL".to_string())
                    });
                }
                PollOutcome::Failed(state) => {
                    return Err(DeployError::Provider(format!(
                        "Deployment failed (state: {state})"
                    )));
                }
                PollOutcome::TimedOut => {
                    return Err(DeployError::Timeout {
                        secs: poll.timeout.as_secs(),
                    });
                }
                PollOutcome::Wait => {
                    tracing::debug!(deployment_id, %state, "Deployment not ready yet");
                    tokio::time::sleep(poll.interval).await;
                }
            }
        }
    }

    /// Remove a deployment. A deployment that no longer exists counts as
    /// removed.
    pub async fn delete(&self, deployment_id: &str) -> Result<(), DeployError> {
        validate_deployment_id(deployment_id)?;
        let response = self
            .request(
                reqwest::Method::DELETE,
                &format!("/v13/deployments/{deployment_id}"),
            )
            .send()
            .await?;

        let status = response.status();
        if status.is_success() || status == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        Err(DeployError::Provider(format!(
            "Failed to delete deployment ({})",
            status.as_u16()
        )))
    }
}

#[async_trait::async_trait]
impl Deployer for VercelDeployer {
    fn provider(&self) -> &str {
        "vercel"
    }

    async fn deploy(
        &self,
        project_name: &str,
        artifact: &Artifact,
    ) -> Result<Deployment, DeployError> {
        let slug = sanitize_slug(project_name);
        tracing::info!(%slug, file_count = artifact.file_count(), "Deploying to Vercel");

        let deployment_id = self.create(slug, artifact).await?;
        tracing::info!(%deployment_id, "Deployment created");

        let url = self.wait_until_ready(&deployment_id).await?;
        Ok(Deployment { url, deployment_id })
    }

    async fn status(&self, deployment_id: &str) -> Result<ProviderStatus, DeployError> {
        let deployment = self.fetch(deployment_id).await?;
        let state = deployment.state();
        let url = match state {
            ReadyState::Ready => deployment.public_url(),
            _ => None,
        };
        Ok(ProviderStatus { state, url })
    }
}
