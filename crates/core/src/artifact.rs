//! Generated artifact model.
//!
//! An [`Artifact`] is the structured output of code generation: an ordered
//! list of files plus optional dependency and framework metadata. It is
//! stored verbatim in the project's `code` JSONB column and pushed as-is to
//! the hosting provider.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single generated source file.
///
/// Missing fields deserialize as empty strings so that partially formed
/// model output still parses and is then rejected by [`Artifact::is_valid`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeFile {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub language: String,
}

impl CodeFile {
    pub fn new(
        path: impl Into<String>,
        content: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            language: language.into(),
        }
    }

    /// A file is complete when path, content, and language are all non-empty.
    pub fn is_complete(&self) -> bool {
        !self.path.is_empty() && !self.content.is_empty() && !self.language.is_empty()
    }
}

/// Structured code-generation output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    #[serde(default)]
    pub files: Vec<CodeFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
}

impl Artifact {
    /// The placeholder stored on a project while generation is in flight.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True iff there is at least one file and every file is complete.
    pub fn is_valid(&self) -> bool {
        !self.files.is_empty() && self.files.iter().all(CodeFile::is_complete)
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}
