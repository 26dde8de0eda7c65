use crate::api::{AuthApi, GatewayError};
use crate::models::{AuthUser, Session, SignUpResponse};
use crate::GatewayConfig;

/// Restricted, session-bound handle built on the anonymous key.
///
/// Safe to use on behalf of untrusted callers: the backend enforces its
/// row-level access policies for everything done through this handle.
#[derive(Clone)]
pub struct PublicGateway {
    auth: AuthApi,
}

impl PublicGateway {
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            auth: AuthApi::new(&config.url, &config.anon_key),
        }
    }

    pub fn from_api(auth: AuthApi) -> Self {
        Self { auth }
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<SignUpResponse, GatewayError> {
        self.auth.sign_up(email, password, full_name).await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, GatewayError> {
        self.auth.sign_in_with_password(email, password).await
    }

    pub async fn sign_out(&self, access_token: &str) -> Result<(), GatewayError> {
        self.auth.sign_out(access_token).await
    }

    /// Trigger a password-reset email whose link returns to `redirect_to`.
    pub async fn reset_password(&self, email: &str, redirect_to: &str) -> Result<(), GatewayError> {
        self.auth.recover(email, redirect_to).await
    }

    /// The user behind the caller's own session.
    pub async fn current_user(&self, access_token: &str) -> Result<AuthUser, GatewayError> {
        self.auth.get_user(access_token).await
    }
}
