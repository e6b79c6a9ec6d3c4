//! Shared fixtures for the integration tests: stub generative backends and
//! canonical reply requests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use hirevox_core::{Node, ReplyRequest};
use hirevox_engine::{DialogOrchestrator, FixedPicker, PhraseBank};
use hirevox_llm::{GenerativeBackend, GenerativeError, GenerativeResult};
use hirevox_scenario::{ProfileTable, ScenarioStore};

/// Backend that fails every call with a network error.
pub struct AlwaysFailingBackend;

#[async_trait]
impl GenerativeBackend for AlwaysFailingBackend {
    fn name(&self) -> &'static str {
        "always-failing"
    }

    fn model(&self) -> &str {
        "test"
    }

    async fn complete_json(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
        _schema: Option<&serde_json::Value>,
    ) -> GenerativeResult<serde_json::Value> {
        Err(GenerativeError::Network {
            message: "connection refused".to_string(),
        })
    }

    async fn health_check(&self) -> GenerativeResult<()> {
        Err(GenerativeError::Network {
            message: "connection refused".to_string(),
        })
    }
}

/// Backend replaying canned responses in call order (judge first, then
/// planner); failing once the script runs out.
pub struct ScriptedBackend {
    responses: Mutex<Vec<GenerativeResult<serde_json::Value>>>,
}

impl ScriptedBackend {
    pub fn new(responses: Vec<GenerativeResult<serde_json::Value>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses),
        })
    }
}

#[async_trait]
impl GenerativeBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn model(&self) -> &str {
        "test"
    }

    async fn complete_json(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
        _schema: Option<&serde_json::Value>,
    ) -> GenerativeResult<serde_json::Value> {
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Err(GenerativeError::Network {
                message: "script exhausted".to_string(),
            })
        } else {
            responses.remove(0)
        }
    }

    async fn health_check(&self) -> GenerativeResult<()> {
        Ok(())
    }
}

/// Orchestrator over a stub backend with deterministic phrase selection and
/// builtin dependencies.
pub fn test_orchestrator(backend: Arc<dyn GenerativeBackend>) -> DialogOrchestrator {
    DialogOrchestrator::new(
        backend,
        Arc::new(ScenarioStore::empty()),
        Arc::new(ProfileTable::builtin()),
        Arc::new(PhraseBank::builtin()),
    )
    .with_picker(Arc::new(FixedPicker(0)))
}

/// The canonical anti-fraud intro node used across tests.
pub fn anti_fraud_node() -> Node {
    Node {
        id: "afr_l1_intro".to_string(),
        category: "AntiFraud_Rules".to_string(),
        order: 1,
        question: "Describe your experience tuning anti-fraud rules.".to_string(),
        weight: 0.4,
        success_criteria: vec![
            "rules".to_string(),
            "metrics".to_string(),
            "cases".to_string(),
        ],
        followups: vec!["Give one rule optimization with numbers.".to_string()],
        next_if_fail: Some("req_l1_core".to_string()),
        next_if_pass: Some("afr_l2_cases".to_string()),
    }
}

/// A request over [`anti_fraud_node`] with the given transcript.
pub fn reply_request(transcript: &str) -> ReplyRequest {
    ReplyRequest {
        node: anti_fraud_node(),
        transcript: transcript.to_string(),
        scores: HashMap::from([("AntiFraud_Rules".to_string(), 0.0)]),
        role_profile: None,
        block_weights: None,
    }
}
