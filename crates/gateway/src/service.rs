use appgen_db::DbPool;

use crate::api::{AuthApi, GatewayError};
use crate::models::AuthUser;
use crate::GatewayConfig;

/// Privileged handle built on the service-role key.
///
/// Bypasses row-level access policies. Only trusted server-side code should
/// hold one; every record access made through [`ServiceGateway::pool`] must
/// filter on the caller's user id itself.
#[derive(Clone)]
pub struct ServiceGateway {
    auth: AuthApi,
    pool: DbPool,
}

impl ServiceGateway {
    pub fn new(config: &GatewayConfig, pool: DbPool) -> Self {
        Self {
            auth: AuthApi::new(&config.url, &config.service_role_key),
            pool,
        }
    }

    pub fn from_parts(auth: AuthApi, pool: DbPool) -> Self {
        Self { auth, pool }
    }

    /// Look up the user owning a bearer token.
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser, GatewayError> {
        let user = self.auth.get_user(access_token).await?;
        tracing::debug!(user_id = %user.id, "Resolved bearer token");
        Ok(user)
    }

    /// The privileged database pool.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}
