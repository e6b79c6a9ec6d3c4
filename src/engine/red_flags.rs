//! Red Flag Derivation
//!
//! Shared between the generative and heuristic paths. Stage tags
//! (`judge_error`, `planner_error`, `system_error`) are appended by the
//! orchestrator on top of what is derived here.

use hirevox_core::RedFlag;

/// Hedging phrases that mark an explicitly uncertain answer.
pub const UNCERTAINTY_MARKERS: [&str; 4] =
    ["not sure", "i don't know", "no idea", "can't remember"];

/// Transcript length below which an answer counts as very short.
const VERY_SHORT_CHARS: usize = 10;

/// Confidence below which an answer is flagged.
const LOW_CONFIDENCE_FLOOR: f64 = 0.4;

/// Derive the per-turn red flags.
///
/// `missing_criteria` is `Some` only on the generative path - the
/// `missing_keywords` flag never fires from the heuristic evaluator.
pub fn derive_red_flags(
    confidence: f64,
    transcript: &str,
    missing_criteria: Option<&[String]>,
) -> Vec<RedFlag> {
    let mut flags = Vec::new();

    let lowered = transcript.to_lowercase();
    let hedged = UNCERTAINTY_MARKERS.iter().any(|m| lowered.contains(m));
    if confidence < LOW_CONFIDENCE_FLOOR || hedged {
        flags.push(RedFlag::LowConfidence);
    }

    if transcript.trim().chars().count() < VERY_SHORT_CHARS {
        flags.push(RedFlag::VeryShortResponse);
    }

    if missing_criteria.is_some_and(|missing| !missing.is_empty()) {
        flags.push(RedFlag::MissingKeywords);
    }

    flags
}
