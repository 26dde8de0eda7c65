//! Identity and storage gateway for the managed backend.
//!
//! Two capability-scoped handles share one backend:
//!
//! - [`PublicGateway`] carries the anonymous key. It forwards session
//!   lifecycle calls (sign-up, sign-in, sign-out, password reset) and is
//!   subject to the backend's row-level access policies.
//! - [`ServiceGateway`] carries the service-role key and the privileged
//!   database pool. Request handlers use it to resolve a caller from a
//!   bearer token and to read and write records on the caller's behalf.
//!
//! Backend errors are surfaced unchanged as [`GatewayError::Api`].

pub mod api;
pub mod models;

mod public;
mod service;

pub use api::{AuthApi, GatewayError};
pub use public::PublicGateway;
pub use service::ServiceGateway;

/// Connection settings shared by both gateway handles.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Backend base URL, e.g. `https://xyz.supabase.co`.
    pub url: String,
    pub anon_key: String,
    pub service_role_key: String,
}
