//! Engine Configuration
//!
//! One immutable configuration object, built from the environment at process
//! start and passed by reference into the orchestrator. Nothing here mutates
//! after startup; tests construct fixture configurations directly.

use std::path::PathBuf;

use hirevox_llm::{BackendConfig, EngineKind};
use hirevox_scenario::DEFAULT_DRILL_THRESHOLD;

/// Default llama.cpp endpoint inside the deployment network.
const DEFAULT_LLAMA_BASE_URL: &str = "http://llm-local:8080/v1";
/// Default OpenAI-compatible endpoint inside the deployment network.
const DEFAULT_OPENAI_BASE_URL: &str = "http://llm-vllm:8000/v1";
/// Default model requested from either endpoint.
const DEFAULT_MODEL: &str = "qwen2.5-7b-instruct";
/// Default HTTP bind address for the engine service.
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8004";

/// Immutable engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Generative backend settings
    pub backend: BackendConfig,
    /// Global default drill threshold (last step of threshold resolution)
    pub drill_threshold: f64,
    /// Directory of authored `{category}.json` scenario artifacts
    pub scenario_dir: Option<PathBuf>,
    /// TOML override file for role profile capabilities
    pub profiles_path: Option<PathBuf>,
    /// TOML override file for the phrase banks
    pub phrases_path: Option<PathBuf>,
    /// Metrics service base URL; `None` disables the side effect
    pub metrics_url: Option<String>,
    /// HTTP bind address
    pub bind_addr: String,
}

impl EngineConfig {
    /// Build the configuration from environment variables, with deployment
    /// defaults for everything absent.
    pub fn from_env() -> Self {
        let engine = EngineKind::from_tag(
            &std::env::var("LLM_ENGINE").unwrap_or_else(|_| "llama.cpp".to_string()),
        );
        let base_url = match engine {
            EngineKind::LlamaCpp => std::env::var("LLM_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_LLAMA_BASE_URL.to_string()),
            EngineKind::OpenAiCompatible => std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string()),
        };

        let backend = BackendConfig {
            engine,
            base_url,
            model: std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            api_key: std::env::var("LLM_API_KEY").ok(),
            enforce_schema: env_flag("LLM_JSON_SCHEMA_ENFORCE", true),
            ..BackendConfig::default()
        };

        Self {
            backend,
            drill_threshold: std::env::var("DRILL_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_DRILL_THRESHOLD),
            scenario_dir: std::env::var("SCENARIO_DIR").ok().map(PathBuf::from),
            profiles_path: std::env::var("ROLE_PROFILES_PATH").ok().map(PathBuf::from),
            phrases_path: std::env::var("PHRASE_BANK_PATH").ok().map(PathBuf::from),
            metrics_url: std::env::var("METRICS_URL").ok(),
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            drill_threshold: DEFAULT_DRILL_THRESHOLD,
            scenario_dir: None,
            profiles_path: None,
            phrases_path: None,
            metrics_url: None,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(value) => value.eq_ignore_ascii_case("true") || value == "1",
        Err(_) => default,
    }
}
