use std::sync::Arc;

use appgen_codegen::CodeGenerator;
use appgen_deploy::Deployer;
use appgen_gateway::PublicGateway;

use crate::config::ServerConfig;
use crate::lifecycle::{IdentityResolver, ProjectStore};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: every collaborator is behind an `Arc` or is itself a
/// cheap handle.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Privileged project, deployment-log, and profile storage.
    pub store: Arc<dyn ProjectStore>,
    /// Bearer token to user lookup (privileged).
    pub identity: Arc<dyn IdentityResolver>,
    /// Restricted handle for session lifecycle calls.
    pub public: PublicGateway,
    pub generator: Arc<dyn CodeGenerator>,
    pub deployer: Arc<dyn Deployer>,
}
