//! Generative Judge
//!
//! Scores one transcript against a node's success criteria through a single
//! bounded-time backend call with structured output. Any transport or shape
//! failure becomes [`JudgeUnavailable`] carrying the raw error text; callers
//! treat it as recoverable and never show it to the interview participant.

use schemars::{schema_for, JsonSchema};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use hirevox_core::JudgeResult;

use crate::backend::GenerativeBackend;

/// The judge stage failed this turn; degrade to the heuristic evaluator.
#[derive(Debug, Clone, Error)]
#[error("judge unavailable: {detail}")]
pub struct JudgeUnavailable {
    /// Raw error text from the failed call
    pub detail: String,
}

/// Structured-output contract for the judge call.
#[derive(Debug, Deserialize, JsonSchema)]
struct JudgeResponseWire {
    score: f64,
    #[serde(default)]
    evidence: Vec<String>,
    confidence: f64,
    #[serde(default)]
    missing_criteria: Vec<String>,
}

/// Scores transcripts against success criteria via a generative backend.
pub struct Judge {
    backend: Arc<dyn GenerativeBackend>,
}

impl Judge {
    /// Create a judge over a backend.
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self { backend }
    }

    /// Evaluate one transcript against the node's success criteria.
    pub async fn evaluate(
        &self,
        transcript: &str,
        success_criteria: &[String],
        role_name: &str,
    ) -> Result<JudgeResult, JudgeUnavailable> {
        let system_prompt = format!(
            "You are an expert evaluator for the {role} role. \
             Score the candidate's answer strictly against the given success criteria. \
             Do not invent criteria - use only the ones provided.\n\n\
             Success criteria: {criteria}\n\n\
             Return JSON strictly matching: {{\"score\": 0.0-1.0, \
             \"evidence\": [\"quote1\", \"quote2\"], \"confidence\": 0.0-1.0, \
             \"missing_criteria\": [\"criterion1\", \"criterion2\"]}}",
            role = role_name,
            criteria = success_criteria.join(", "),
        );
        let user_prompt = format!(
            "Candidate answer: \"{transcript}\"\n\nScore it against the criteria and return JSON."
        );

        let schema = serde_json::to_value(schema_for!(JudgeResponseWire)).map_err(|e| {
            JudgeUnavailable {
                detail: e.to_string(),
            }
        })?;

        let value = self
            .backend
            .complete_json(&system_prompt, &user_prompt, Some(&schema))
            .await
            .map_err(|e| JudgeUnavailable {
                detail: e.to_string(),
            })?;

        let wire: JudgeResponseWire =
            serde_json::from_value(value).map_err(|e| JudgeUnavailable {
                detail: format!("judge output does not match schema: {}", e),
            })?;

        debug!(score = wire.score, confidence = wire.confidence, "judge verdict");
        Ok(normalize(wire, success_criteria))
    }
}

/// Clamp scores into range and drop hallucinated missing criteria.
fn normalize(wire: JudgeResponseWire, success_criteria: &[String]) -> JudgeResult {
    let missing_criteria = wire
        .missing_criteria
        .into_iter()
        .filter(|c| success_criteria.contains(c))
        .collect();

    JudgeResult {
        score: wire.score.clamp(0.0, 1.0),
        evidence: wire.evidence,
        confidence: wire.confidence.clamp(0.0, 1.0),
        missing_criteria,
    }
}
