//! App generator API server library.
//!
//! Exposes configuration, state, error handling, the lifecycle
//! coordinator, and the router so integration tests and the binary
//! entrypoint share them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod lifecycle;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod state;
