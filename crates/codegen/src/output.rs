//! Parsing and normalization of raw model output.
//!
//! The model is asked for a bare JSON object but regularly wraps it in a
//! markdown fence or a sentence of prose. [`ModelOutput::parse`] strips
//! fences, tries the text as JSON, then retries on the outermost `{...}`
//! span. [`ModelOutput::normalize`] is the single place where an unusable
//! result is swapped for the fallback artifact.

use std::sync::LazyLock;

use appgen_core::artifact::Artifact;
use regex::Regex;

use crate::fallback::fallback_artifact;

static CODE_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json|JSON)?[ \t]*\r?\n?").expect("valid regex"));

/// Result of parsing the model's text response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelOutput {
    /// The text parsed as an artifact. It may still fail validation.
    Parsed(Artifact),
    /// The text was not an artifact; carries the raw response.
    Malformed(String),
}

impl ModelOutput {
    pub fn parse(raw: &str) -> Self {
        let cleaned = strip_code_fences(raw);

        if let Ok(artifact) = serde_json::from_str::<Artifact>(&cleaned) {
            return ModelOutput::Parsed(artifact);
        }

        if let Some(span) = outermost_object(&cleaned) {
            if let Ok(artifact) = serde_json::from_str::<Artifact>(span) {
                return ModelOutput::Parsed(artifact);
            }
        }

        ModelOutput::Malformed(raw.to_string())
    }

    /// Resolve to an artifact that always passes [`Artifact::is_valid`].
    pub fn normalize(self, prompt: &str) -> Artifact {
        match self {
            ModelOutput::Parsed(artifact) if artifact.is_valid() => artifact,
            ModelOutput::Parsed(_) | ModelOutput::Malformed(_) => fallback_artifact(prompt),
        }
    }
}

/// At most `max_chars` characters of `text`, cut on a char boundary.
pub fn log_prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Remove markdown code fences and surrounding whitespace.
pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE_RE.replace_all(text, "").trim().to_string()
}

/// The slice from the first `{` to the last `}`, if both exist in order.
fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}
