//! Hirevox Scoring
//!
//! Pure scoring arithmetic for the interview engine:
//!
//! - `bars` - weighted BARS (Behaviorally Anchored Rating Scale) aggregation
//!   over questions and blocks, anchored at 0 / 0.3 / 0.7 / 1.0
//! - `heuristic` - deterministic keyword-match scorer and confidence
//!   estimator, the guaranteed-available floor of the reply pipeline
//! - `aggregate` - validated aggregate-scoring operation built on `bars`
//!
//! Everything in this crate is side-effect free: no I/O, no network, same
//! inputs always produce the same outputs.

pub mod aggregate;
pub mod bars;
pub mod heuristic;

// Re-export BARS engine
pub use bars::{
    analyze_performance, bars_level, calculate_match_score, score_block, score_overall,
    snap_to_anchor, validate_score, BarsLevel, BlockAnalysis, PerformanceAnalysis, BARS_ANCHORS,
};

// Re-export heuristic evaluator
pub use heuristic::{calculate_confidence, criteria_hits, heuristic_score, synthesize_judge_result};

// Re-export aggregate operation
pub use aggregate::{aggregate_scores, AggregateReport, AggregateRequest, ValidationError};
