/// Errors from the deployment client.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// No hosting credential is configured for this operation.
    #[error("{0}")]
    Configuration(String),

    /// The provider rejected a request or reported a failed deployment.
    #[error("{0}")]
    Provider(String),

    /// A deployment id with characters outside `[A-Za-z0-9_-]`.
    #[error("Invalid deployment ID")]
    InvalidDeploymentId,

    /// The deployment did not reach a terminal state in time.
    #[error("Deployment timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl DeployError {
    pub fn not_configured() -> Self {
        DeployError::Configuration("Vercel token not configured".to_string())
    }
}
