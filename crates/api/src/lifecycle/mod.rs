//! Generation and deployment lifecycle of a project.
//!
//! The coordinator is stateless between requests. It talks to four seams
//! held in [`crate::state::AppState`]: a [`ProjectStore`], an
//! [`IdentityResolver`], a code generator, and a deployer.

pub mod coordinator;
pub mod identity;
pub mod store;

pub use coordinator::{deploy_project, generate_project, parse_project_id};
pub use identity::IdentityResolver;
pub use store::{PgProjectStore, ProjectStore};
