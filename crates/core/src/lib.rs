//! Domain types shared across the appgen crates.
//!
//! Everything here is pure: project and deployment status machines, the
//! generated artifact model, and the naming helpers used to derive display
//! names and hosting slugs.

pub mod artifact;
pub mod error;
pub mod naming;
pub mod status;
pub mod types;
