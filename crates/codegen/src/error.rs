/// Errors from a single generation request.
///
/// These never escape [`crate::CodeGenerator::generate`]; they are logged
/// and replaced by the fallback artifact.
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    /// No API key is configured.
    #[error("LLM API key not configured")]
    NotConfigured,

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("LLM API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The response carried no text content block.
    #[error("LLM response contained no text")]
    EmptyResponse,
}
