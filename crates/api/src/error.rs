use appgen_core::error::CoreError;
use appgen_deploy::DeployError;
use appgen_gateway::GatewayError;
use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Application-level error type for HTTP handlers.
///
/// Wraps the library error types and adds HTTP-specific variants. Every
/// variant renders as `{ "error": "..." }` with status 400, 401, 404, or 500.
/// 500 responses carry a generic message; the detail is logged.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `appgen_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An error from the backend's auth API.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// A failed deployment.
    #[error(transparent)]
    Deploy(#[from] DeployError),

    /// A resource addressed by an identifier that could not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound { .. } => (StatusCode::NOT_FOUND, core.to_string()),
                CoreError::Validation(msg) | CoreError::InvalidState(msg) => {
                    (StatusCode::BAD_REQUEST, msg.clone())
                }
                CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            AppError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                internal()
            }

            AppError::Gateway(err) => classify_gateway_error(err),

            AppError::Deploy(DeployError::Configuration(msg)) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::Deploy(err @ DeployError::InvalidDeploymentId) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            AppError::Deploy(err) => {
                tracing::error!(error = %err, "Deployment error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to deploy project".to_string(),
                )
            }

            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}

fn internal() -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
}

/// Backend rejections keep their message; credential rejections become 401,
/// other 4xx become 400. Transport failures and 5xx are sanitized.
fn classify_gateway_error(err: &GatewayError) -> (StatusCode, String) {
    match err {
        GatewayError::Api { status, message } if err.is_rejection() => {
            let code = match status {
                401 | 403 => StatusCode::UNAUTHORIZED,
                _ => StatusCode::BAD_REQUEST,
            };
            (code, message.clone())
        }
        other => {
            tracing::error!(error = %other, "Auth backend error");
            internal()
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// `Json` extractor and response whose rejection renders as [`AppError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl<T: Serialize> IntoResponse for AppJson<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}
