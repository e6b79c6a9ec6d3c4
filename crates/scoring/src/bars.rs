//! BARS Scoring Engine
//!
//! Weighted scoring with behavioral anchors:
//!
//! - 0.0: No evidence / Poor performance
//! - 0.3: Below expectations / Limited evidence
//! - 0.7: Meets expectations / Good evidence
//! - 1.0: Exceeds expectations / Excellent evidence
//!
//! Supports weighted aggregation across questions and blocks. All functions
//! are pure; results are clamped to [0, 1] and rounded to 4 decimal places.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use hirevox_core::QAnswer;

/// The four BARS anchor scores, in ascending order.
pub const BARS_ANCHORS: [f64; 4] = [0.0, 0.3, 0.7, 1.0];

/// Qualitative BARS performance level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarsLevel {
    Poor,
    Below,
    Meets,
    Exceeds,
}

impl BarsLevel {
    /// Level for a score. Thresholds are interpretation bands, not anchor
    /// points: >= 0.85 Exceeds, >= 0.55 Meets, >= 0.15 Below, else Poor.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.85 {
            BarsLevel::Exceeds
        } else if score >= 0.55 {
            BarsLevel::Meets
        } else if score >= 0.15 {
            BarsLevel::Below
        } else {
            BarsLevel::Poor
        }
    }

    /// Anchor description shown in reports.
    pub fn label(&self) -> &'static str {
        match self {
            BarsLevel::Poor => "No evidence / Poor performance",
            BarsLevel::Below => "Below expectations / Limited evidence",
            BarsLevel::Meets => "Meets expectations / Good evidence",
            BarsLevel::Exceeds => "Exceeds expectations / Excellent evidence",
        }
    }
}

impl std::fmt::Display for BarsLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Clamp a score to the valid BARS range [0, 1].
pub fn validate_score(score: f64) -> f64 {
    score.clamp(0.0, 1.0)
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Level for a score (free-function form used by the aggregate endpoint).
pub fn bars_level(score: f64) -> BarsLevel {
    BarsLevel::from_score(score)
}

/// Snap a score to the nearest BARS anchor.
///
/// Ties resolve toward the lower anchor: anchors are scanned in ascending
/// order and the first minimal-distance match wins.
pub fn snap_to_anchor(score: f64) -> f64 {
    let mut best = BARS_ANCHORS[0];
    let mut best_dist = (score - best).abs();
    for &anchor in &BARS_ANCHORS[1..] {
        let dist = (score - anchor).abs();
        if dist < best_dist {
            best = anchor;
            best_dist = dist;
        }
    }
    best
}

/// Weighted average score for one block.
///
/// Returns 0.0 when the block has no answers or the total weight is zero.
pub fn score_block(answers: &[QAnswer], block: &str) -> f64 {
    let subset: Vec<&QAnswer> = answers.iter().filter(|a| a.block == block).collect();
    if subset.is_empty() {
        return 0.0;
    }

    let weighted_sum: f64 = subset.iter().map(|a| a.score * a.weight).sum();
    let total_weight: f64 = subset.iter().map(|a| a.weight).sum();

    if total_weight == 0.0 {
        return 0.0;
    }

    round4(validate_score(weighted_sum / total_weight))
}

/// Overall weighted score across blocks.
///
/// Iterates the weight map; blocks missing from `block_scores` contribute
/// 0.0. Returns 0.0 when either map is empty or the total weight is zero.
pub fn score_overall(
    block_scores: &HashMap<String, f64>,
    block_weights: &HashMap<String, f64>,
) -> f64 {
    if block_scores.is_empty() || block_weights.is_empty() {
        return 0.0;
    }

    let weighted_sum: f64 = block_weights
        .iter()
        .map(|(block, weight)| block_scores.get(block).copied().unwrap_or(0.0) * weight)
        .sum();
    let total_weight: f64 = block_weights.values().sum();

    if total_weight == 0.0 {
        return 0.0;
    }

    round4(validate_score(weighted_sum / total_weight))
}

/// Match score between a candidate's block scores and a job's required
/// minimums, weight-averaged across blocks.
///
/// Per block the ratio is `min(candidate / required, 1.0)`, or 1.0 when the
/// requirement is zero and the candidate has any score (0.0 otherwise).
pub fn calculate_match_score(
    candidate_scores: &HashMap<String, f64>,
    job_requirements: &HashMap<String, f64>,
    block_weights: &HashMap<String, f64>,
) -> f64 {
    if candidate_scores.is_empty() || job_requirements.is_empty() || block_weights.is_empty() {
        return 0.0;
    }

    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;

    for (block, weight) in block_weights {
        let candidate = candidate_scores.get(block).copied().unwrap_or(0.0);
        let required = job_requirements.get(block).copied().unwrap_or(0.0);

        let ratio = if required > 0.0 {
            (candidate / required).min(1.0)
        } else if candidate > 0.0 {
            1.0
        } else {
            0.0
        };

        weighted_sum += ratio * weight;
        total_weight += weight;
    }

    if total_weight == 0.0 {
        return 0.0;
    }

    round4(validate_score(weighted_sum / total_weight))
}

/// Per-block entry of a performance analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockAnalysis {
    /// Weighted block score, 0..=1
    pub score: f64,
    /// BARS level band for the score
    pub level: BarsLevel,
    /// Weight the block carries in the overall score
    pub weight: f64,
}

/// Comprehensive BARS performance analysis across all answered blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceAnalysis {
    /// Weighted score per block
    pub block_scores: HashMap<String, f64>,
    /// Overall weighted score
    pub overall_score: f64,
    /// BARS level band for the overall score
    pub overall_level: BarsLevel,
    /// Score, level, and weight per block
    pub block_analysis: HashMap<String, BlockAnalysis>,
    /// Blocks scoring >= 0.7
    pub strengths: Vec<String>,
    /// Blocks scoring < 0.3
    pub weaknesses: Vec<String>,
}

/// Analyze answers into block scores, an overall score, and a
/// strengths/weaknesses breakdown.
pub fn analyze_performance(
    answers: &[QAnswer],
    block_weights: &HashMap<String, f64>,
) -> PerformanceAnalysis {
    let mut blocks: Vec<&str> = answers.iter().map(|a| a.block.as_str()).collect();
    blocks.sort_unstable();
    blocks.dedup();

    let block_scores: HashMap<String, f64> = blocks
        .iter()
        .map(|&block| (block.to_string(), score_block(answers, block)))
        .collect();

    let overall_score = score_overall(&block_scores, block_weights);

    let block_analysis: HashMap<String, BlockAnalysis> = block_scores
        .iter()
        .map(|(block, &score)| {
            (
                block.clone(),
                BlockAnalysis {
                    score,
                    level: BarsLevel::from_score(score),
                    weight: block_weights.get(block).copied().unwrap_or(0.0),
                },
            )
        })
        .collect();

    let mut strengths: Vec<String> = block_scores
        .iter()
        .filter(|(_, &score)| score >= 0.7)
        .map(|(block, _)| block.clone())
        .collect();
    strengths.sort_unstable();

    let mut weaknesses: Vec<String> = block_scores
        .iter()
        .filter(|(_, &score)| score < 0.3)
        .map(|(block, _)| block.clone())
        .collect();
    weaknesses.sort_unstable();

    PerformanceAnalysis {
        block_scores,
        overall_score,
        overall_level: BarsLevel::from_score(overall_score),
        block_analysis,
        strengths,
        weaknesses,
    }
}
