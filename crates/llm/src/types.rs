//! Generative Backend Types
//!
//! Configuration and error taxonomy for generative-model calls.

use serde::{Deserialize, Serialize};

/// Which flavor of OpenAI-compatible endpoint the engine talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// A local llama.cpp server exposing `/v1/chat/completions`
    LlamaCpp,
    /// Any other OpenAI-compatible endpoint (vLLM, hosted APIs, ...)
    OpenAiCompatible,
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineKind::LlamaCpp => write!(f, "llama.cpp"),
            EngineKind::OpenAiCompatible => write!(f, "openai_compatible"),
        }
    }
}

impl EngineKind {
    /// Parse an engine tag; unknown tags default to llama.cpp, the local
    /// deployment baseline.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "openai_compatible" => EngineKind::OpenAiCompatible,
            _ => EngineKind::LlamaCpp,
        }
    }
}

/// Configuration for a generative backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Endpoint flavor
    pub engine: EngineKind,
    /// Base URL of the `/chat/completions` API (e.g. `http://llm-local:8080/v1`)
    pub base_url: String,
    /// Model name to request
    pub model: String,
    /// API key, when the endpoint requires one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Output token cap; kept small to stay inside the turn latency budget
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Whether to pass a JSON schema as `response_format`
    #[serde(default = "default_enforce_schema")]
    pub enforce_schema: bool,
    /// Hard per-call timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_max_tokens() -> u32 {
    96
}

fn default_temperature() -> f32 {
    0.1
}

fn default_enforce_schema() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::LlamaCpp,
            base_url: "http://llm-local:8080/v1".to_string(),
            model: "qwen2.5-7b-instruct".to_string(),
            api_key: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            enforce_schema: default_enforce_schema(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Errors from generative backend calls.
///
/// `Network`, `Timeout`, and `Server` are unavailability of the backend;
/// `MalformedOutput` means the backend answered but the body did not conform
/// to the expected structured shape. All of them are recoverable - the
/// orchestrator degrades to the heuristic path instead of surfacing them.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerativeError {
    /// Transport-level failure reaching the backend
    Network { message: String },
    /// The call exceeded its time budget
    Timeout { message: String },
    /// Non-success status from the backend
    Server { status: u16, message: String },
    /// Response body is not valid JSON or does not match the expected shape
    MalformedOutput { message: String },
    /// No backend is configured for generative calls
    NotConfigured { message: String },
}

impl std::fmt::Display for GenerativeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerativeError::Network { message } => write!(f, "Network error: {}", message),
            GenerativeError::Timeout { message } => write!(f, "Timeout: {}", message),
            GenerativeError::Server { status, message } => {
                write!(f, "Server error ({}): {}", status, message)
            }
            GenerativeError::MalformedOutput { message } => {
                write!(f, "Malformed output: {}", message)
            }
            GenerativeError::NotConfigured { message } => {
                write!(f, "Backend not configured: {}", message)
            }
        }
    }
}

impl std::error::Error for GenerativeError {}

/// Result type for generative backend operations.
pub type GenerativeResult<T> = Result<T, GenerativeError>;
