//! Heuristic Evaluator
//!
//! Deterministic keyword-match scorer and confidence estimator. This is the
//! guaranteed floor of the reply pipeline: no network, no parsing, it cannot
//! fail. When the generative judge is unavailable the orchestrator
//! substitutes `synthesize_judge_result` for the judge's verdict.
//!
//! Scoring is deliberately discrete, not proportional: the three outcomes
//! map directly onto the BARS anchors 0.3 / 0.7 / 1.0.

use hirevox_core::JudgeResult;

/// Number of success criteria contained in the transcript
/// (case-insensitive substring match of each criterion phrase).
pub fn criteria_hits(transcript: &str, criteria: &[String]) -> usize {
    let lowered = transcript.to_lowercase();
    criteria
        .iter()
        .filter(|c| lowered.contains(&c.to_lowercase()))
        .count()
}

/// Discrete keyword-match score:
///
/// - no criteria matched -> 0.3
/// - some but not all matched -> 0.7
/// - all matched -> 1.0
pub fn heuristic_score(transcript: &str, criteria: &[String]) -> f64 {
    let hits = criteria_hits(transcript, criteria);
    if hits == 0 {
        0.3
    } else if hits < criteria.len() {
        0.7
    } else {
        1.0
    }
}

/// Confidence estimate for a heuristic score.
///
/// Starts from the score, scaled down for very short answers (< 10 chars),
/// up slightly for long ones (> 200 chars), then by keyword density, and
/// clamped to [0, 1].
pub fn calculate_confidence(transcript: &str, criteria: &[String], score: f64) -> f64 {
    let mut confidence = score;

    let length = transcript.trim().chars().count();
    if length < 10 {
        confidence *= 0.5;
    } else if length > 200 {
        confidence *= 1.1;
    }

    let density = if criteria.is_empty() {
        0.0
    } else {
        criteria_hits(transcript, criteria) as f64 / criteria.len() as f64
    };
    confidence *= 0.5 + density * 0.5;

    confidence.clamp(0.0, 1.0)
}

/// Build the judge-result shape from the heuristic evaluator, for turns
/// where the generative judge is unavailable.
pub fn synthesize_judge_result(transcript: &str, criteria: &[String]) -> JudgeResult {
    let hits = criteria_hits(transcript, criteria);
    let score = heuristic_score(transcript, criteria);
    let lowered = transcript.to_lowercase();
    let missing_criteria: Vec<String> = criteria
        .iter()
        .filter(|c| !lowered.contains(&c.to_lowercase()))
        .cloned()
        .collect();

    JudgeResult {
        score,
        evidence: vec![format!("Matched {} of {} criteria", hits, criteria.len())],
        confidence: calculate_confidence(transcript, criteria, score),
        missing_criteria,
    }
}
