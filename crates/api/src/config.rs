use std::time::Duration;

use appgen_codegen::CodegenConfig;
use appgen_deploy::mock::DEFAULT_MOCK_DELAY;
use appgen_deploy::VercelConfig;
use appgen_gateway::GatewayConfig;

/// Server configuration loaded from environment variables.
///
/// Required backend settings panic at startup when missing; everything else
/// has a default suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `180`). Must exceed
    /// [`ServerConfig::slowest_operation`]; a request cut off mid-deploy
    /// would leave its deployment log `pending`.
    pub request_timeout_secs: u64,
    /// Privileged Postgres connection string.
    pub database_url: String,
    /// Public base URL of the web app, used for password-reset redirects.
    pub app_url: String,
    pub gateway: GatewayConfig,
    pub codegen: CodegenConfig,
    /// `None` when no hosting token is set; deployments then use the mock.
    pub vercel: Option<VercelConfig>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                      |
    /// |-----------------------------|------------------------------|
    /// | `HOST`                      | `0.0.0.0`                    |
    /// | `PORT`                      | `3000`                       |
    /// | `CORS_ORIGINS`              | `http://localhost:3000`      |
    /// | `REQUEST_TIMEOUT_SECS`      | `180`                        |
    /// | `DATABASE_URL`              | required                     |
    /// | `SUPABASE_URL`              | required                     |
    /// | `SUPABASE_ANON_KEY`         | required                     |
    /// | `SUPABASE_SERVICE_ROLE_KEY` | required                     |
    /// | `APP_URL`                   | `http://localhost:3000`      |
    /// | `ANTHROPIC_API_KEY`         | empty (fallback artifacts)   |
    /// | `ANTHROPIC_MODEL`           | `claude-sonnet-4-20250514`   |
    /// | `VERCEL_TOKEN`              | unset (mock deployer)        |
    /// | `VERCEL_TEAM_ID`            | unset                        |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "180".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let app_url = std::env::var("APP_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .trim_end_matches('/')
            .to_string();

        let gateway = GatewayConfig {
            url: std::env::var("SUPABASE_URL").expect("SUPABASE_URL must be set"),
            anon_key: std::env::var("SUPABASE_ANON_KEY").expect("SUPABASE_ANON_KEY must be set"),
            service_role_key: std::env::var("SUPABASE_SERVICE_ROLE_KEY")
                .expect("SUPABASE_SERVICE_ROLE_KEY must be set"),
        };

        let mut codegen = CodegenConfig {
            api_key: non_empty_var("ANTHROPIC_API_KEY"),
            ..Default::default()
        };
        if let Some(model) = non_empty_var("ANTHROPIC_MODEL") {
            codegen.model = model;
        }

        let vercel = vercel_config(non_empty_var("VERCEL_TOKEN"), non_empty_var("VERCEL_TEAM_ID"));

        let config = Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_url,
            app_url,
            gateway,
            codegen,
            vercel,
        };

        let slowest = config.slowest_operation();
        assert!(
            Duration::from_secs(config.request_timeout_secs) > slowest,
            "REQUEST_TIMEOUT_SECS ({}) must exceed the slowest generation or deployment ({}s)",
            config.request_timeout_secs,
            slowest.as_secs(),
        );
        config
    }

    /// Longest a single generation or deployment can run: the model request
    /// ceiling, or create plus polling plus a final status read.
    pub fn slowest_operation(&self) -> Duration {
        let deploy = self
            .vercel
            .as_ref()
            .map_or(DEFAULT_MOCK_DELAY, VercelConfig::worst_case);
        self.codegen.request_timeout.max(deploy)
    }

    /// Where password-reset emails send the user back to.
    pub fn password_reset_redirect(&self) -> String {
        format!("{}/reset-password", self.app_url)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    non_empty(std::env::var(key).ok())
}

/// Blank values count as unset.
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A hosting token selects the real provider; without one, deployments
/// use the mock.
fn vercel_config(token: Option<String>, team_id: Option<String>) -> Option<VercelConfig> {
    non_empty(token).map(|token| VercelConfig::new(token, non_empty(team_id)))
}
