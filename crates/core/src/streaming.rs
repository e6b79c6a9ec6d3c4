//! Reply Stream Frames
//!
//! Typed frames emitted by the streaming reply variant. One turn produces an
//! ordered sequence over a single channel (single writer, no interleaving):
//!
//! 1. `backchannel` - immediate acknowledgment, before any scoring
//! 2. `judge` - present only if the generative judge succeeded
//! 3. `planner` - present only if the generative planner succeeded
//! 4. `fallback` - notice that the heuristic path took over (failure turns only)
//! 5. `final` - the assembled `ReplyOutcome`
//! 6. `done` - total elapsed latency
//!
//! The stream never ends without a `final` + `done` pair unless the receiver
//! has gone away.

use serde::{Deserialize, Serialize};

use crate::types::{JudgeResult, PlannerResult, ReplyOutcome};

/// A single frame of the streaming reply protocol.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplyFrame {
    /// Immediate low-latency acknowledgment phrase
    Backchannel { reply: String },

    /// The generative judge's verdict for this turn
    Judge { result: JudgeResult },

    /// The generative planner's proposed next action
    Planner { result: PlannerResult },

    /// A generative stage failed; the heuristic path takes over
    Fallback { reason: String },

    /// The assembled reply outcome (same shape as the synchronous reply)
    Final {
        #[serde(flatten)]
        outcome: ReplyOutcome,
    },

    /// End of turn, with total elapsed latency in milliseconds
    Done { latency_ms: u64 },
}

impl ReplyFrame {
    /// Frame type tag as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            ReplyFrame::Backchannel { .. } => "backchannel",
            ReplyFrame::Judge { .. } => "judge",
            ReplyFrame::Planner { .. } => "planner",
            ReplyFrame::Fallback { .. } => "fallback",
            ReplyFrame::Final { .. } => "final",
            ReplyFrame::Done { .. } => "done",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RedFlag, ScoringUpdate};

    #[test]
    fn test_backchannel_serialization() {
        let frame = ReplyFrame::Backchannel {
            reply: "I see.".to_string(),
        };
        let json = serde_json::to_string(&frame).unwrap();
        assert!(json.contains("\"type\":\"backchannel\""));
        assert!(json.contains("\"reply\":\"I see.\""));

        let parsed: ReplyFrame = serde_json::from_str(&json).unwrap();
        assert_eq!(frame, parsed);
    }

    #[test]
    fn test_final_frame_flattens_outcome() {
        let frame = ReplyFrame::Final {
            outcome: ReplyOutcome {
                reply: "Understood, moving on.".to_string(),
                next_node_id: Some("n2".to_string()),
                scoring_update: ScoringUpdate {
                    block: "Django".to_string(),
                    delta: 0.7,
                    score: 0.7,
                },
                red_flags: vec![RedFlag::MissingKeywords],
                confidence: 0.6,
                role_profile: None,
            },
        };
        let json = serde_json::to_string(&frame).unwrap();
        // Outcome fields sit at the top level next to the tag, like the
        // synchronous reply payload.
        assert!(json.contains("\"type\":\"final\""));
        assert!(json.contains("\"next_node_id\":\"n2\""));
        assert!(json.contains("\"red_flags\":[\"missing_keywords\"]"));

        let parsed: ReplyFrame = serde_json::from_str(&json).unwrap();
        assert_eq!(frame, parsed);
    }

    #[test]
    fn test_done_frame() {
        let frame = ReplyFrame::Done { latency_ms: 420 };
        let json = serde_json::to_string(&frame).unwrap();
        assert!(json.contains("\"type\":\"done\""));
        assert!(json.contains("\"latency_ms\":420"));
        assert_eq!(frame.kind(), "done");
    }

    #[test]
    fn test_frame_kinds() {
        let frame = ReplyFrame::Fallback {
            reason: "judge unavailable".to_string(),
        };
        assert_eq!(frame.kind(), "fallback");
    }
}
