//! HTTP client for the Anthropic Messages API.
//!
//! Sends one non-streaming `POST /v1/messages` per prompt and hands the
//! first text block to [`ModelOutput`] for parsing.

use std::time::Duration;

use appgen_core::artifact::Artifact;
use serde::{Deserialize, Serialize};

use crate::error::CodegenError;
use crate::fallback::fallback_artifact;
use crate::output::{log_prefix, ModelOutput};
use crate::prompt::{user_message, SYSTEM_PROMPT};
use crate::CodeGenerator;

/// Model tag recorded on projects generated by this client.
pub const AI_MODEL_TAG: &str = "claude-sonnet-4";

pub const DEFAULT_API_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// How much of an unusable model response is written to the log.
const RAW_LOG_CHARS: usize = 500;

/// Settings for [`CodegenClient`].
#[derive(Debug, Clone)]
pub struct CodegenConfig {
    /// API key. `None` (or empty) means every call returns the fallback.
    pub api_key: Option<String>,
    pub model: String,
    /// Base URL without trailing slash.
    pub api_url: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub request_timeout: Duration,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            max_tokens: 4000,
            temperature: 0.7,
            request_timeout: Duration::from_secs(120),
        }
    }
}

/// Code generator backed by the Anthropic Messages API.
pub struct CodegenClient {
    client: reqwest::Client,
    config: CodegenConfig,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

impl CodegenClient {
    pub fn new(config: CodegenConfig) -> Result<Self, CodegenError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: CodegenConfig) -> Self {
        Self { client, config }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    fn api_key(&self) -> Option<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }

    /// Request a completion and return the raw text of the first text block.
    pub async fn complete(&self, prompt: &str) -> Result<String, CodegenError> {
        let api_key = self.api_key().ok_or(CodegenError::NotConfigured)?;

        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            system: SYSTEM_PROMPT,
            messages: [Message {
                role: "user",
                content: user_message(prompt),
            }],
        };

        let response = self
            .client
            .post(format!("{}/v1/messages", self.config.api_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let parsed: MessagesResponse = Self::parse_response(response).await?;
        parsed
            .content
            .into_iter()
            .find_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .ok_or(CodegenError::EmptyResponse)
    }

    // ---- private helpers ----

    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, CodegenError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(CodegenError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, CodegenError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait::async_trait]
impl CodeGenerator for CodegenClient {
    fn model_tag(&self) -> &str {
        AI_MODEL_TAG
    }

    async fn generate(&self, prompt: &str) -> Artifact {
        let raw = match self.complete(prompt).await {
            Ok(raw) => raw,
            Err(CodegenError::NotConfigured) => {
                tracing::warn!("LLM API key not configured, using fallback artifact");
                return fallback_artifact(prompt);
            }
            Err(e) => {
                tracing::error!(error = %e, "Code generation request failed");
                return fallback_artifact(prompt);
            }
        };

        let output = ModelOutput::parse(&raw);
        match &output {
            ModelOutput::Parsed(artifact) if artifact.is_valid() => {
                tracing::info!(
                    file_count = artifact.file_count(),
                    framework = artifact.framework.as_deref().unwrap_or("unknown"),
                    "Generated artifact",
                );
            }
            ModelOutput::Parsed(artifact) => {
                tracing::warn!(
                    file_count = artifact.file_count(),
                    raw = log_prefix(&raw, RAW_LOG_CHARS),
                    "Model output failed validation, using fallback artifact",
                );
            }
            ModelOutput::Malformed(raw) => {
                tracing::warn!(
                    response_len = raw.len(),
                    raw = log_prefix(raw, RAW_LOG_CHARS),
                    "Model output was not valid JSON, using fallback artifact",
                );
            }
        }
        output.normalize(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ARTIFACT_JSON: &str =
        r#"{"files":[{"path":"index.html","content":"<h1>Todo</h1>","language":"html"}],"dependencies":{},"framework":"react"}"#;

    fn client_for(server: &MockServer, api_key: Option<&str>) -> CodegenClient {
        CodegenClient::new(CodegenConfig {
            api_key: api_key.map(str::to_string),
            api_url: server.uri(),
            ..Default::default()
        })
        .unwrap()
    }

    fn text_response(text: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "content": [{ "type": "text", "text": text }],
        }))
    }

    #[tokio::test]
    async fn sends_expected_request_and_parses_artifact() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "sk-test"))
            .and(header("anthropic-version", ANTHROPIC_VERSION))
            .and(body_partial_json(json!({
                "model": DEFAULT_MODEL,
                "max_tokens": 4000,
                "messages": [{ "role": "user" }],
            })))
            .respond_with(text_response(ARTIFACT_JSON))
            .expect(1)
            .mount(&server)
            .await;

        let artifact = client_for(&server, Some("sk-test")).generate("a todo app").await;
        assert_eq!(artifact.files[0].content, "<h1>Todo</h1>");
        assert_eq!(artifact.framework.as_deref(), Some("react"));
    }

    #[tokio::test]
    async fn fenced_output_is_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(text_response(&format!("```json\n{ARTIFACT_JSON}\n```")))
            .mount(&server)
            .await;

        let artifact = client_for(&server, Some("sk-test")).generate("a todo app").await;
        assert_eq!(artifact.files[0].content, "<h1>Todo</h1>");
    }

    #[tokio::test]
    async fn malformed_output_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(text_response("Sorry, I can't build that."))
            .mount(&server)
            .await;

        let artifact = client_for(&server, Some("sk-test")).generate("a quiz").await;
        assert_eq!(artifact, fallback_artifact("a quiz"));
    }

    #[tokio::test]
    async fn parsed_but_incomplete_output_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(text_response(
                r#"{"files":[{"path":"index.html","content":"","language":"html"}]}"#,
            ))
            .mount(&server)
            .await;

        let artifact = client_for(&server, Some("sk-test")).generate("a quiz").await;
        assert_eq!(artifact, fallback_artifact("a quiz"));
        assert!(artifact.is_valid());
    }

    #[tokio::test]
    async fn provider_error_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(529).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("sk-test"));
        assert_matches!(
            client.complete("a quiz").await,
            Err(CodegenError::Api { status: 529, body }) if body == "overloaded"
        );
        assert_eq!(client.generate("a quiz").await, fallback_artifact("a quiz"));
    }

    #[tokio::test]
    async fn response_without_text_block_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{ "type": "tool_use", "id": "t1", "name": "x", "input": {} }],
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("sk-test"));
        assert_matches!(client.complete("x").await, Err(CodegenError::EmptyResponse));
        assert!(client.generate("x").await.is_valid());
    }

    #[tokio::test]
    async fn missing_key_skips_the_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(text_response(ARTIFACT_JSON))
            .expect(0)
            .mount(&server)
            .await;

        for key in [None, Some(""), Some("   ")] {
            let client = client_for(&server, key);
            assert!(!client.is_configured());
            assert_eq!(client.generate("a clock").await, fallback_artifact("a clock"));
        }
    }

    #[test]
    fn model_tag_is_short_name() {
        let client = CodegenClient::new(CodegenConfig::default()).unwrap();
        assert_eq!(client.model_tag(), "claude-sonnet-4");
    }
}
