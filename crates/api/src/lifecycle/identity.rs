use appgen_gateway::models::AuthUser;
use appgen_gateway::{GatewayError, ServiceGateway};

/// Resolves a bearer token to the user that owns it.
#[async_trait::async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, access_token: &str) -> Result<AuthUser, GatewayError>;
}

#[async_trait::async_trait]
impl IdentityResolver for ServiceGateway {
    async fn resolve(&self, access_token: &str) -> Result<AuthUser, GatewayError> {
        self.get_user(access_token).await
    }
}
