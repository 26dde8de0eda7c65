//! Bearer-token authentication extractor for Axum handlers.

use appgen_core::error::CoreError;
use appgen_core::types::DbId;
use appgen_gateway::models::AuthUser as BackendUser;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::state::AppState;

/// The caller, resolved from the `Authorization: Bearer <token>` header
/// through the privileged identity resolver.
///
/// Every failure (missing header, wrong scheme, rejected token) is a 401
/// with the same message. Transport failures reaching the backend are a 500.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: BackendUser,
    /// The raw access token, for calls made on the caller's behalf.
    pub access_token: String,
}

impl AuthUser {
    pub fn id(&self) -> DbId {
        self.user.id
    }
}

fn unauthorized() -> AppError {
    AppError::Core(CoreError::Unauthorized("Unauthorized".into()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(unauthorized)?;

        let user = state.identity.resolve(token).await.map_err(|e| {
            if e.is_rejection() {
                tracing::debug!(error = %e, "Rejected bearer token");
                unauthorized()
            } else {
                AppError::Gateway(e)
            }
        })?;

        Ok(AuthUser {
            user,
            access_token: token.to_string(),
        })
    }
}
