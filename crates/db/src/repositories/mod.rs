//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod deployment_log_repo;
pub mod project_repo;
pub mod user_profile_repo;

pub use deployment_log_repo::DeploymentLogRepo;
pub use project_repo::ProjectRepo;
pub use user_profile_repo::UserProfileRepo;
