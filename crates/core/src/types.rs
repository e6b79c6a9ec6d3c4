//! Interview Domain Model
//!
//! Value objects exchanged between the dialog orchestrator, the generative
//! judge/planner stages, the scoring engine, and the scenario graph. All of
//! these are created fresh per reply invocation; only the `Scenario` is
//! cached process-wide (read-only after load).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single question node in a scenario graph.
///
/// `next_if_fail` / `next_if_pass` reference other node ids within the same
/// scenario; `None` marks a terminal node. The two edges may point to the
/// same node (a plateau), which is permitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique id within the scenario
    pub id: String,
    /// Scoring block (competency category) this question belongs to
    pub category: String,
    /// Position hint within the scenario (1-based, irrelevant to traversal)
    pub order: u32,
    /// The question text asked to the candidate
    pub question: String,
    /// Importance of this question within its block, 0..=1
    pub weight: f64,
    /// Phrases a good answer is expected to cover
    #[serde(default)]
    pub success_criteria: Vec<String>,
    /// Advisory follow-up questions
    #[serde(default)]
    pub followups: Vec<String>,
    /// Node to branch to when the answer scores below the drill threshold
    #[serde(default)]
    pub next_if_fail: Option<String>,
    /// Node to branch to when the answer meets the drill threshold
    #[serde(default)]
    pub next_if_pass: Option<String>,
}

/// Per-scenario branching policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioPolicy {
    /// Score cutoff below which the engine takes the fail edge
    #[serde(default = "default_drill_threshold")]
    pub drill_threshold: f64,
}

fn default_drill_threshold() -> f64 {
    0.7
}

impl Default for ScenarioPolicy {
    fn default() -> Self {
        Self {
            drill_threshold: default_drill_threshold(),
        }
    }
}

/// An immutable directed graph of question nodes.
///
/// Invariant: `start_id` references a node in `nodes`. Node order in the
/// vector is irrelevant to traversal; only the edges matter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario file format version
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    /// Branching policy for this scenario
    #[serde(default)]
    pub policy: ScenarioPolicy,
    /// All question nodes
    pub nodes: Vec<Node>,
    /// Id of the first question node
    pub start_id: String,
}

fn default_schema_version() -> String {
    "0.1".to_string()
}

impl Scenario {
    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// One answered question, produced per turn and consumed only for
/// aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QAnswer {
    /// Id of the question node that was answered
    pub question_id: String,
    /// Scoring block the question belongs to
    pub block: String,
    /// Score for the answer, 0..=1
    pub score: f64,
    /// Importance of the question within its block, 0..=1
    pub weight: f64,
}

impl QAnswer {
    /// Create an answer record.
    pub fn new(
        question_id: impl Into<String>,
        block: impl Into<String>,
        score: f64,
        weight: f64,
    ) -> Self {
        Self {
            question_id: question_id.into(),
            block: block.into(),
            score,
            weight,
        }
    }
}

/// Verdict of the generative judge for one transcript.
///
/// Synthesized by the heuristic evaluator when the judge is unavailable.
/// Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeResult {
    /// Score against the node's success criteria, 0..=1
    pub score: f64,
    /// Quotes or observations supporting the score
    #[serde(default)]
    pub evidence: Vec<String>,
    /// Judge's confidence in its own score, 0..=1
    pub confidence: f64,
    /// Success criteria the answer did not cover
    #[serde(default)]
    pub missing_criteria: Vec<String>,
}

/// Kind of follow-up the planner proposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowUpType {
    /// One short clarifying question about a missing criterion
    Clarification,
    /// Acknowledge and move to the next question
    Completion,
}

impl std::fmt::Display for FollowUpType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FollowUpType::Clarification => write!(f, "clarification"),
            FollowUpType::Completion => write!(f, "completion"),
        }
    }
}

/// Planner-assigned priority of the follow-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

/// Next conversational action proposed by the generative planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerResult {
    /// Short reply to speak to the candidate
    pub reply: String,
    /// Proposed next node id; `None` ends the scenario branch
    pub next_node_id: Option<String>,
    /// Kind of follow-up
    pub follow_up_type: FollowUpType,
    /// Priority of the follow-up
    pub priority: Priority,
}

/// Machine-readable behavioral or data-quality concern detected during a
/// turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedFlag {
    /// Confidence below the floor, or the transcript hedges explicitly
    LowConfidence,
    /// Trimmed transcript shorter than 10 characters
    VeryShortResponse,
    /// The judge reported uncovered success criteria
    MissingKeywords,
    /// The generative judge was unavailable this turn
    JudgeError,
    /// The generative planner was unavailable this turn
    PlannerError,
    /// An unexpected failure forced the heuristic path
    SystemError,
}

impl std::fmt::Display for RedFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RedFlag::LowConfidence => write!(f, "low_confidence"),
            RedFlag::VeryShortResponse => write!(f, "very_short_response"),
            RedFlag::MissingKeywords => write!(f, "missing_keywords"),
            RedFlag::JudgeError => write!(f, "judge_error"),
            RedFlag::PlannerError => write!(f, "planner_error"),
            RedFlag::SystemError => write!(f, "system_error"),
        }
    }
}

/// Score change for the answered block this turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringUpdate {
    /// Block the score applies to
    pub block: String,
    /// `score` minus the caller-supplied prior score for the block
    pub delta: f64,
    /// Absolute score for this turn, 0..=1
    pub score: f64,
}

/// Input envelope for one reply turn.
///
/// The caller owns the per-block score accumulator and resubmits it each
/// turn; the engine is stateless across turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyRequest {
    /// The question node the candidate just answered
    pub node: Node,
    /// Final transcript of the candidate's spoken answer
    pub transcript: String,
    /// Caller-held accumulator: block -> current score, 0..=1
    #[serde(default)]
    pub scores: HashMap<String, f64>,
    /// Role profile tag (e.g. "ba_anti_fraud", "it_dc_ops")
    #[serde(default)]
    pub role_profile: Option<String>,
    /// Optional block weights for scoring context
    #[serde(default)]
    pub block_weights: Option<HashMap<String, f64>>,
}

/// The unit returned to the caller - the only entity that crosses the
/// engine boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyOutcome {
    /// Conversational reply to speak to the candidate
    pub reply: String,
    /// Next node to ask; `None` ends the scenario branch
    pub next_node_id: Option<String>,
    /// Score update for the answered block
    pub scoring_update: ScoringUpdate,
    /// Concerns detected this turn
    pub red_flags: Vec<RedFlag>,
    /// Confidence in the score, 0..=1
    pub confidence: f64,
    /// Role profile the reply was generated for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_profile: Option<String>,
}
