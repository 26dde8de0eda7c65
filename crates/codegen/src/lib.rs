//! Code-generation client.
//!
//! Turns a natural-language app description into an [`Artifact`] by asking
//! a hosted LLM for a single JSON object. [`CodeGenerator::generate`] never
//! fails: transport errors, provider errors, and malformed output all
//! resolve to a deterministic placeholder artifact.

use appgen_core::artifact::Artifact;

pub mod client;
pub mod error;
pub mod fallback;
pub mod output;
pub mod prompt;

pub use client::{CodegenClient, CodegenConfig};
pub use error::CodegenError;

/// Something that can synthesize an artifact from a prompt.
#[async_trait::async_trait]
pub trait CodeGenerator: Send + Sync {
    /// Short model tag recorded on generated projects.
    fn model_tag(&self) -> &str;

    /// Generate an artifact for `prompt`. The result always passes
    /// [`Artifact::is_valid`].
    async fn generate(&self, prompt: &str) -> Artifact;
}
