//! Generative Backend
//!
//! Defines the common interface the judge and planner stages call through,
//! plus the OpenAI-compatible chat-completions implementation covering both
//! supported engines (a local llama.cpp server and any OpenAI-compatible
//! endpoint). The trait keeps the stages testable with stub backends.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::http_client::build_http_client;
use crate::types::{BackendConfig, EngineKind, GenerativeError, GenerativeResult};

/// Trait all generative backends implement.
///
/// One call = one bounded-time completion that must come back as a JSON
/// object. Failure of any kind is a [`GenerativeError`]; implementations
/// never panic and never block past their timeout.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Backend name for identification and logging.
    fn name(&self) -> &'static str;

    /// The model this backend requests.
    fn model(&self) -> &str;

    /// Run one completion instructed to return strictly a JSON object.
    ///
    /// `schema` is the structured-output contract; backends pass it through
    /// as `response_format` when schema enforcement is supported/enabled.
    async fn complete_json(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        schema: Option<&serde_json::Value>,
    ) -> GenerativeResult<serde_json::Value>;

    /// Check whether the backend is reachable.
    async fn health_check(&self) -> GenerativeResult<()>;
}

/// OpenAI-compatible chat-completions backend.
///
/// llama.cpp and OpenAI-compatible servers take the same request shape; the
/// engine kind only decides how the JSON-schema `response_format` is
/// attached.
pub struct OpenAiCompatBackend {
    config: BackendConfig,
    client: reqwest::Client,
}

impl OpenAiCompatBackend {
    /// Create a backend from its configuration.
    pub fn new(config: BackendConfig) -> Self {
        let client = build_http_client(config.timeout_secs);
        Self { config, client }
    }

    /// The configuration for this backend.
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn build_request_body(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        schema: Option<&serde_json::Value>,
    ) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_prompt}
            ],
            "stream": false,
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
        });

        if self.config.enforce_schema {
            body["response_format"] = match schema {
                // Both engines accept the json_object format with an inline
                // schema (llama.cpp grammar-compiles it, OpenAI-compatible
                // servers validate it).
                Some(schema) => serde_json::json!({
                    "type": "json_object",
                    "schema": schema,
                }),
                None => serde_json::json!({"type": "json_object"}),
            };
        }

        body
    }

    fn map_transport_error(err: reqwest::Error) -> GenerativeError {
        if err.is_timeout() {
            GenerativeError::Timeout {
                message: err.to_string(),
            }
        } else {
            GenerativeError::Network {
                message: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl GenerativeBackend for OpenAiCompatBackend {
    fn name(&self) -> &'static str {
        match self.config.engine {
            EngineKind::LlamaCpp => "llama.cpp",
            EngineKind::OpenAiCompatible => "openai_compatible",
        }
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete_json(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        schema: Option<&serde_json::Value>,
    ) -> GenerativeResult<serde_json::Value> {
        let body = self.build_request_body(system_prompt, user_prompt, schema);
        debug!(backend = self.name(), model = %self.config.model, "generative call");

        let mut request = self
            .client
            .post(self.completions_url())
            .header("Content-Type", "application/json")
            .json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request.send().await.map_err(Self::map_transport_error)?;

        let status = response.status().as_u16();
        let body_text = response.text().await.map_err(Self::map_transport_error)?;

        if status != 200 {
            return Err(GenerativeError::Server {
                status,
                message: body_text,
            });
        }

        let completion: ChatCompletionResponse =
            serde_json::from_str(&body_text).map_err(|e| GenerativeError::MalformedOutput {
                message: format!("failed to parse completion envelope: {}", e),
            })?;

        let content = completion
            .choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
            .ok_or_else(|| GenerativeError::MalformedOutput {
                message: "completion carried no message content".to_string(),
            })?;

        serde_json::from_str(content).map_err(|e| GenerativeError::MalformedOutput {
            message: format!("completion content is not a JSON object: {}", e),
        })
    }

    async fn health_check(&self) -> GenerativeResult<()> {
        let url = format!("{}/models", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        let status = response.status().as_u16();
        if status == 200 {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(GenerativeError::Server {
                status,
                message: body,
            })
        }
    }
}

/// Chat-completions response envelope (the subset the engine reads).
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}
