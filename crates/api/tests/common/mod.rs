//! Shared helpers for API integration tests.
//!
//! The router is built with the production middleware stack; the
//! coordinator's seams are replaced by in-memory implementations.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use appgen_api::config::ServerConfig;
use appgen_api::lifecycle::{IdentityResolver, ProjectStore};
use appgen_api::router::build_app_router;
use appgen_api::state::AppState;
use appgen_codegen::{CodeGenerator, CodegenConfig};
use appgen_core::artifact::{Artifact, CodeFile};
use appgen_core::naming::sanitize_slug;
use appgen_core::status::{DeploymentStatus, ProjectStatus, SubscriptionTier};
use appgen_core::types::DbId;
use appgen_db::models::deployment_log::{CreateDeploymentLog, DeploymentLog, DeploymentOutcome};
use appgen_db::models::project::{CreateProject, Project};
use appgen_db::models::user_profile::UserProfile;
use appgen_deploy::{
    Deployer, DeployError, Deployment, MockDeployer, ProviderStatus, ReadyState,
};
use appgen_gateway::models::AuthUser as BackendUser;
use appgen_gateway::{GatewayConfig, GatewayError, PublicGateway};
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

pub const ALICE_TOKEN: &str = "alice-token";
pub const BOB_TOKEN: &str = "bob-token";
/// Makes the identity resolver fail as if the backend were down.
pub const BACKEND_DOWN_TOKEN: &str = "backend-down";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

pub fn test_config(backend_url: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        database_url: "postgres://unused".to_string(),
        app_url: "http://localhost:3000".to_string(),
        gateway: GatewayConfig {
            url: backend_url.to_string(),
            anon_key: "anon-key".to_string(),
            service_role_key: "service-key".to_string(),
        },
        codegen: CodegenConfig::default(),
        vercel: None,
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryStore {
    pub projects: Mutex<Vec<Project>>,
    pub logs: Mutex<Vec<DeploymentLog>>,
    pub profiles: Mutex<HashMap<DbId, UserProfile>>,
    /// Make `complete_generation` fail with a database error.
    pub fail_generation_write: AtomicBool,
    /// Make `increment_generations` fail with a database error.
    pub fail_counter: AtomicBool,
    pub unhealthy: AtomicBool,
}

fn db_down() -> sqlx::Error {
    sqlx::Error::PoolTimedOut
}

impl InMemoryStore {
    pub fn project(&self, id: DbId) -> Project {
        self.projects
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .expect("project exists")
    }

    /// Insert a project directly in the given status.
    pub fn seed_project(&self, user_id: DbId, name: &str, status: ProjectStatus) -> Project {
        let now = chrono::Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            description: format!("prompt for {name}"),
            code: stub_artifact(),
            preview_url: None,
            deploy_url: None,
            status,
            ai_model: "claude-sonnet-4".to_string(),
            generation_time: Some(10),
            created_at: now,
            updated_at: now,
        };
        self.projects.lock().unwrap().push(project.clone());
        project
    }

    pub fn seed_profile(&self, user_id: DbId) {
        let now = chrono::Utc::now();
        self.profiles.lock().unwrap().insert(
            user_id,
            UserProfile {
                id: user_id,
                full_name: Some("Alice".to_string()),
                avatar_url: None,
                projects_count: 0,
                total_generations: 0,
                subscription_tier: SubscriptionTier::Free,
                subscription_status: "active".to_string(),
                stripe_customer_id: None,
                created_at: now,
                updated_at: now,
            },
        );
    }

    pub fn logs_for(&self, project_id: DbId) -> Vec<DeploymentLog> {
        self.logs
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.project_id == project_id)
            .cloned()
            .collect()
    }

    /// Soft-delete every project with this name, as an owner acting in
    /// another request would.
    pub fn delete_named(&self, name: &str) {
        for project in self.projects.lock().unwrap().iter_mut() {
            if project.name == name {
                project.status = ProjectStatus::Deleted;
            }
        }
    }

    /// Apply `f` to the owned project if its status is one of `from`.
    fn update<F>(&self, id: DbId, user_id: DbId, from: &[ProjectStatus], f: F) -> Option<Project>
    where
        F: FnOnce(&mut Project),
    {
        let mut projects = self.projects.lock().unwrap();
        let project = projects
            .iter_mut()
            .find(|p| p.id == id && p.user_id == user_id && from.contains(&p.status))?;
        f(project);
        project.updated_at = chrono::Utc::now();
        Some(project.clone())
    }
}

#[async_trait::async_trait]
impl ProjectStore for InMemoryStore {
    async fn create_project(&self, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let now = chrono::Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            user_id: input.user_id,
            name: input.name.clone(),
            description: input.description.clone(),
            code: Artifact::empty(),
            preview_url: None,
            deploy_url: None,
            status: ProjectStatus::Generating,
            ai_model: input.ai_model.clone(),
            generation_time: None,
            created_at: now,
            updated_at: now,
        };
        self.projects.lock().unwrap().push(project.clone());
        Ok(project)
    }

    async fn find_project(&self, id: DbId, user_id: DbId) -> Result<Option<Project>, sqlx::Error> {
        Ok(self
            .projects
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id && p.user_id == user_id)
            .cloned())
    }

    async fn list_projects(&self, user_id: DbId) -> Result<Vec<Project>, sqlx::Error> {
        Ok(self
            .projects
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|p| p.user_id == user_id && !p.status.is_deleted())
            .cloned()
            .collect())
    }

    async fn complete_generation(
        &self,
        id: DbId,
        user_id: DbId,
        code: &Artifact,
        generation_time_ms: i64,
    ) -> Result<Option<Project>, sqlx::Error> {
        if self.fail_generation_write.load(Ordering::SeqCst) {
            return Err(db_down());
        }
        Ok(self.update(id, user_id, &[ProjectStatus::Generating], |p| {
            p.code = code.clone();
            p.status = ProjectStatus::Ready;
            p.generation_time = Some(generation_time_ms);
        }))
    }

    async fn mark_failed(&self, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        Ok(self
            .update(id, user_id, &[ProjectStatus::Generating], |p| {
                p.status = ProjectStatus::Failed
            })
            .is_some())
    }

    async fn mark_deployed(
        &self,
        id: DbId,
        user_id: DbId,
        deploy_url: &str,
    ) -> Result<Option<Project>, sqlx::Error> {
        let deployable = [ProjectStatus::Ready, ProjectStatus::Deployed];
        Ok(self.update(id, user_id, &deployable, |p| {
            p.deploy_url = Some(deploy_url.to_string());
            p.status = ProjectStatus::Deployed;
        }))
    }

    async fn soft_delete(&self, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let mut projects = self.projects.lock().unwrap();
        match projects
            .iter_mut()
            .find(|p| p.id == id && p.user_id == user_id)
        {
            Some(project) => {
                project.status = ProjectStatus::Deleted;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn open_deployment_log(
        &self,
        input: &CreateDeploymentLog,
    ) -> Result<DeploymentLog, sqlx::Error> {
        let log = DeploymentLog {
            id: Uuid::new_v4(),
            project_id: input.project_id,
            user_id: input.user_id,
            status: DeploymentStatus::Pending,
            deploy_url: None,
            error_message: None,
            deployment_provider: input.deployment_provider.clone(),
            build_time: None,
            created_at: chrono::Utc::now(),
        };
        self.logs.lock().unwrap().push(log.clone());
        Ok(log)
    }

    async fn finish_deployment_log(
        &self,
        id: DbId,
        outcome: &DeploymentOutcome,
    ) -> Result<bool, sqlx::Error> {
        let mut logs = self.logs.lock().unwrap();
        let Some(log) = logs
            .iter_mut()
            .find(|l| l.id == id && l.status == DeploymentStatus::Pending)
        else {
            return Ok(false);
        };
        log.status = outcome.status();
        match outcome {
            DeploymentOutcome::Success {
                deploy_url,
                build_time_ms,
            } => {
                log.deploy_url = Some(deploy_url.clone());
                log.build_time = Some(*build_time_ms);
            }
            DeploymentOutcome::Failed { error_message } => {
                log.error_message = Some(error_message.clone());
            }
        }
        Ok(true)
    }

    async fn list_deployment_logs(
        &self,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<Vec<DeploymentLog>, sqlx::Error> {
        Ok(self
            .logs
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|l| l.project_id == project_id && l.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn increment_generations(&self, user_id: DbId) -> Result<bool, sqlx::Error> {
        if self.fail_counter.load(Ordering::SeqCst) {
            return Err(db_down());
        }
        let mut profiles = self.profiles.lock().unwrap();
        match profiles.get_mut(&user_id) {
            Some(profile) => {
                profile.total_generations += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_profile(&self, user_id: DbId) -> Result<Option<UserProfile>, sqlx::Error> {
        Ok(self.profiles.lock().unwrap().get(&user_id).cloned())
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        if self.unhealthy.load(Ordering::SeqCst) {
            Err(db_down())
        } else {
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Identity, generator, deployer
// ---------------------------------------------------------------------------

pub struct StaticIdentity {
    users: HashMap<String, BackendUser>,
}

pub fn backend_user(id: DbId, email: &str) -> BackendUser {
    BackendUser {
        id,
        email: Some(email.to_string()),
        role: Some("authenticated".to_string()),
        user_metadata: serde_json::Value::Null,
        created_at: None,
        last_sign_in_at: None,
    }
}

#[async_trait::async_trait]
impl IdentityResolver for StaticIdentity {
    async fn resolve(&self, access_token: &str) -> Result<BackendUser, GatewayError> {
        if access_token == BACKEND_DOWN_TOKEN {
            return Err(GatewayError::Api {
                status: 503,
                message: "upstream unavailable".to_string(),
            });
        }
        self.users
            .get(access_token)
            .cloned()
            .ok_or_else(|| GatewayError::Api {
                status: 401,
                message: "invalid JWT".to_string(),
            })
    }
}

pub fn stub_artifact() -> Artifact {
    Artifact {
        files: vec![CodeFile::new("index.html", "<h1>stub</h1>", "html")],
        dependencies: None,
        framework: Some("react".to_string()),
    }
}

/// Runs inside `generate`, while the project is still `generating`.
pub type GenerateHook = Box<dyn Fn(&str) + Send + Sync>;

#[derive(Default)]
pub struct StubGenerator {
    pub prompts: Mutex<Vec<String>>,
    pub on_generate: Mutex<Option<GenerateHook>>,
}

#[async_trait::async_trait]
impl CodeGenerator for StubGenerator {
    fn model_tag(&self) -> &str {
        "claude-sonnet-4"
    }

    async fn generate(&self, prompt: &str) -> Artifact {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(hook) = self.on_generate.lock().unwrap().as_ref() {
            hook(prompt);
        }
        stub_artifact()
    }
}

/// How [`StubDeployer`] answers `deploy`.
#[derive(Debug, Clone, Copy)]
pub enum DeployBehavior {
    Succeed,
    Reject,
    TimeOut,
}

pub struct StubDeployer {
    pub behavior: DeployBehavior,
    pub calls: AtomicUsize,
}

impl StubDeployer {
    pub fn new(behavior: DeployBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl Deployer for StubDeployer {
    fn provider(&self) -> &str {
        "vercel"
    }

    async fn deploy(
        &self,
        project_name: &str,
        _artifact: &Artifact,
    ) -> Result<Deployment, DeployError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            DeployBehavior::Succeed => Ok(Deployment {
                url: format!("https://{}.example.app", sanitize_slug(project_name)),
                deployment_id: "dpl_test".to_string(),
            }),
            DeployBehavior::Reject => Err(DeployError::Provider(
                "Deployment failed: quota exceeded".to_string(),
            )),
            DeployBehavior::TimeOut => Err(DeployError::Timeout { secs: 60 }),
        }
    }

    async fn status(&self, deployment_id: &str) -> Result<ProviderStatus, DeployError> {
        Ok(ProviderStatus {
            state: ReadyState::Ready,
            url: Some(format!("https://{deployment_id}.example.app")),
        })
    }
}

/// Succeeds, but the project is soft-deleted while the provider runs.
pub struct DeletingDeployer {
    pub store: Arc<InMemoryStore>,
}

#[async_trait::async_trait]
impl Deployer for DeletingDeployer {
    fn provider(&self) -> &str {
        "vercel"
    }

    async fn deploy(
        &self,
        project_name: &str,
        _artifact: &Artifact,
    ) -> Result<Deployment, DeployError> {
        self.store.delete_named(project_name);
        Ok(Deployment {
            url: format!("https://{}.example.app", sanitize_slug(project_name)),
            deployment_id: "dpl_late".to_string(),
        })
    }

    async fn status(&self, _deployment_id: &str) -> Result<ProviderStatus, DeployError> {
        Err(DeployError::not_configured())
    }
}

// ---------------------------------------------------------------------------
// App builder
// ---------------------------------------------------------------------------

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub generator: Arc<StubGenerator>,
    pub alice: DbId,
    pub bob: DbId,
}

impl TestApp {
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// App with the no-delay mock deployer and an unreachable auth backend.
pub fn build_test_app() -> TestApp {
    build_test_app_with(
        Arc::new(MockDeployer::with_delay(Duration::ZERO)),
        "http://127.0.0.1:9",
    )
}

pub fn build_test_app_with(deployer: Arc<dyn Deployer>, backend_url: &str) -> TestApp {
    build_test_app_from(Arc::new(InMemoryStore::default()), deployer, backend_url)
}

/// App over a caller-provided store, for deployers that need to reach it.
pub fn build_test_app_from(
    store: Arc<InMemoryStore>,
    deployer: Arc<dyn Deployer>,
    backend_url: &str,
) -> TestApp {
    let config = test_config(backend_url);
    let generator = Arc::new(StubGenerator::default());

    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let identity = StaticIdentity {
        users: HashMap::from([
            (ALICE_TOKEN.to_string(), backend_user(alice, "alice@example.com")),
            (BOB_TOKEN.to_string(), backend_user(bob, "bob@example.com")),
        ]),
    };

    let state = AppState {
        config: Arc::new(config.clone()),
        store: store.clone(),
        identity: Arc::new(identity),
        public: PublicGateway::new(&config.gateway),
        generator: generator.clone(),
        deployer,
    };

    TestApp {
        router: build_app_router(state, &config),
        store,
        generator,
        alice,
        bob,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    send(app, Method::GET, uri, token, None).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, token, Some(body)).await
}

pub async fn delete(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    send(app, Method::DELETE, uri, token, None).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
