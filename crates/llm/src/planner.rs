//! Generative Planner
//!
//! Turns a judge verdict into the next conversational action: a short reply
//! plus a next-node proposal. Shares the judge's failure contract - any
//! transport or shape problem is [`PlannerUnavailable`], recoverable, never
//! participant-visible.

use schemars::{schema_for, JsonSchema};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use hirevox_core::{FollowUpType, JudgeResult, Node, PlannerResult, Priority};

use crate::backend::GenerativeBackend;

/// Score below which the planner is instructed to clarify instead of
/// advancing. A prompt-level convention, independent of the selector's
/// drill-threshold resolution.
const CLARIFY_BELOW: f64 = 0.7;

/// The planner stage failed this turn; keep the judge's verdict and fall
/// back to canned planning.
#[derive(Debug, Clone, Error)]
#[error("planner unavailable: {detail}")]
pub struct PlannerUnavailable {
    /// Raw error text from the failed call
    pub detail: String,
}

/// Structured-output contract for the planner call.
#[derive(Debug, Deserialize, JsonSchema)]
struct PlannerResponseWire {
    reply: String,
    #[serde(default)]
    next_node_id: Option<String>,
    #[serde(default)]
    follow_up_type: Option<String>,
    #[serde(default)]
    priority: Option<String>,
}

/// Plans follow-ups from judge verdicts via a generative backend.
pub struct Planner {
    backend: Arc<dyn GenerativeBackend>,
}

impl Planner {
    /// Create a planner over a backend.
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self { backend }
    }

    /// Plan the next conversational action for a judged answer.
    pub async fn plan(
        &self,
        judge_result: &JudgeResult,
        node: &Node,
        role_name: &str,
    ) -> Result<PlannerResult, PlannerUnavailable> {
        let system_prompt = format!(
            "You are an interviewer for the {role} role. \
             Based on the evaluation of the candidate's answer, compose a short follow-up.\n\n\
             If score < {threshold}, ask exactly one short clarifying question \
             about a missing criterion and propose the fail branch.\n\
             If score >= {threshold}, acknowledge and propose the pass branch.\n\n\
             Return JSON strictly matching: {{\"reply\": \"short question\", \
             \"next_node_id\": \"node id or null\", \
             \"follow_up_type\": \"clarification|completion\", \
             \"priority\": \"high|medium|low\"}}",
            role = role_name,
            threshold = CLARIFY_BELOW,
        );

        let missing = if judge_result.missing_criteria.is_empty() {
            "none".to_string()
        } else {
            judge_result.missing_criteria.join(", ")
        };
        let user_prompt = format!(
            "Score: {score}\n\
             Missing criteria: {missing}\n\
             Current block: {category}\n\
             Next node on pass: {pass}\n\
             Next node on fail: {fail}\n\n\
             Compose the follow-up.",
            score = judge_result.score,
            missing = missing,
            category = node.category,
            pass = node.next_if_pass.as_deref().unwrap_or("null"),
            fail = node.next_if_fail.as_deref().unwrap_or("null"),
        );

        let schema = serde_json::to_value(schema_for!(PlannerResponseWire)).map_err(|e| {
            PlannerUnavailable {
                detail: e.to_string(),
            }
        })?;

        let value = self
            .backend
            .complete_json(&system_prompt, &user_prompt, Some(&schema))
            .await
            .map_err(|e| PlannerUnavailable {
                detail: e.to_string(),
            })?;

        let wire: PlannerResponseWire =
            serde_json::from_value(value).map_err(|e| PlannerUnavailable {
                detail: format!("planner output does not match schema: {}", e),
            })?;

        debug!(next = ?wire.next_node_id, "planner proposal");
        Ok(normalize(wire, judge_result))
    }
}

/// Fill in defaults the model may omit; the judge's score decides the
/// fallback follow-up type and priority.
fn normalize(wire: PlannerResponseWire, judge_result: &JudgeResult) -> PlannerResult {
    let clarifying = judge_result.score < CLARIFY_BELOW;

    let follow_up_type = match wire.follow_up_type.as_deref() {
        Some("completion") => FollowUpType::Completion,
        Some("clarification") => FollowUpType::Clarification,
        _ if clarifying => FollowUpType::Clarification,
        _ => FollowUpType::Completion,
    };

    let priority = match wire.priority.as_deref() {
        Some("high") => Priority::High,
        Some("medium") => Priority::Medium,
        Some("low") => Priority::Low,
        _ if clarifying => Priority::High,
        _ => Priority::Medium,
    };

    PlannerResult {
        reply: wire.reply,
        next_node_id: wire.next_node_id.filter(|id| id != "null" && !id.is_empty()),
        follow_up_type,
        priority,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GenerativeError, GenerativeResult};
    use async_trait::async_trait;

    struct CannedBackend {
        response: GenerativeResult<serde_json::Value>,
    }

    #[async_trait]
    impl GenerativeBackend for CannedBackend {
        fn name(&self) -> &'static str {
            "canned"
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
            self.response.clone()
        }

        async fn health_check(&self) -> GenerativeResult<()> {
            Ok(())
        }
    }

    fn node() -> Node {
        Node {
            id: "afr_l1_intro".to_string(),
            category: "AntiFraud_Rules".to_string(),
            order: 1,
            question: "Q?".to_string(),
            weight: 0.4,
            success_criteria: vec!["rules".to_string()],
            followups: vec![],
            next_if_fail: Some("req_l1_core".to_string()),
            next_if_pass: Some("afr_l2_cases".to_string()),
        }
    }

    fn verdict(score: f64) -> JudgeResult {
        JudgeResult {
            score,
            evidence: vec![],
            confidence: 0.8,
            missing_criteria: vec!["rules".to_string()],
        }
    }

    #[tokio::test]
    async fn test_planner_parses_proposal() {
        let planner = Planner::new(Arc::new(CannedBackend {
            response: Ok(serde_json::json!({
                "reply": "Which rule metrics did you track?",
                "next_node_id": "req_l1_core",
                "follow_up_type": "clarification",
                "priority": "high"
            })),
        }));

        let result = planner.plan(&verdict(0.4), &node(), "general").await.unwrap();
        assert_eq!(result.reply, "Which rule metrics did you track?");
        assert_eq!(result.next_node_id, Some("req_l1_core".to_string()));
        assert_eq!(result.follow_up_type, FollowUpType::Clarification);
        assert_eq!(result.priority, Priority::High);
    }

    #[tokio::test]
    async fn test_planner_defaults_from_score() {
        // Model omits type/priority; low score implies clarification/high.
        let planner = Planner::new(Arc::new(CannedBackend {
            response: Ok(serde_json::json!({"reply": "Tell me more."})),
        }));
        let result = planner.plan(&verdict(0.4), &node(), "general").await.unwrap();
        assert_eq!(result.follow_up_type, FollowUpType::Clarification);
        assert_eq!(result.priority, Priority::High);
        assert_eq!(result.next_node_id, None);

        // High score implies completion/medium.
        let planner = Planner::new(Arc::new(CannedBackend {
            response: Ok(serde_json::json!({"reply": "Great, moving on."})),
        }));
        let result = planner.plan(&verdict(0.9), &node(), "general").await.unwrap();
        assert_eq!(result.follow_up_type, FollowUpType::Completion);
        assert_eq!(result.priority, Priority::Medium);
    }

    #[tokio::test]
    async fn test_planner_normalizes_null_next_node() {
        let planner = Planner::new(Arc::new(CannedBackend {
            response: Ok(serde_json::json!({"reply": "Done.", "next_node_id": "null"})),
        }));
        let result = planner.plan(&verdict(0.9), &node(), "general").await.unwrap();
        assert_eq!(result.next_node_id, None);
    }

    #[tokio::test]
    async fn test_planner_backend_failure_is_unavailable() {
        let planner = Planner::new(Arc::new(CannedBackend {
            response: Err(GenerativeError::Server {
                status: 500,
                message: "boom".to_string(),
            }),
        }));
        let err = planner.plan(&verdict(0.4), &node(), "general").await.unwrap_err();
        assert!(err.detail.contains("boom"));
    }

    #[tokio::test]
    async fn test_planner_shape_mismatch_is_unavailable() {
        let planner = Planner::new(Arc::new(CannedBackend {
            response: Ok(serde_json::json!({"no_reply_field": true})),
        }));
        let err = planner.plan(&verdict(0.4), &node(), "general").await.unwrap_err();
        assert!(err.detail.contains("schema"));
    }
}
