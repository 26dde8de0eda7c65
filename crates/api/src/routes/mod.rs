pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/signup                        sign up (public)
/// /auth/signin                        sign in (public)
/// /auth/signout                       sign out
/// /auth/reset-password                password reset email (public)
/// /auth/user                          current user
///
/// /generate                           generate a project (POST)
/// /deploy                             deploy a project (POST)
///
/// /projects                           list
/// /projects/{id}                      get, soft delete
/// /projects/{id}/deployments          deployment history
///
/// /deployments/{deployment_id}        provider status (single read)
///
/// /profile                            caller's profile
/// ```
pub fn api_routes() -> Router<AppState> {
    let auth = Router::new()
        .route("/signup", post(handlers::auth::sign_up))
        .route("/signin", post(handlers::auth::sign_in))
        .route("/signout", post(handlers::auth::sign_out))
        .route("/reset-password", post(handlers::auth::reset_password))
        .route("/user", get(handlers::auth::current_user));

    Router::new()
        .nest("/auth", auth)
        .route("/generate", post(handlers::generate::generate))
        .route("/deploy", post(handlers::deploy::deploy))
        .route("/projects", get(handlers::project::list))
        .route(
            "/projects/{id}",
            get(handlers::project::get_by_id).delete(handlers::project::delete),
        )
        .route(
            "/projects/{id}/deployments",
            get(handlers::project::list_deployments),
        )
        .route(
            "/deployments/{deployment_id}",
            get(handlers::deployment::status),
        )
        .route("/profile", get(handlers::profile::get_profile))
}
