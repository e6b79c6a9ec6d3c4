//! Aggregate Scoring Operation
//!
//! Validated BARS aggregation consumed by upstream callers: a list of
//! answered questions plus block weights in, block scores, overall score and
//! percentage, and a strengths/weaknesses analysis out.
//!
//! Validation is the only fallible part: scores and weights outside [0, 1]
//! are rejected before any arithmetic runs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use hirevox_core::QAnswer;

use crate::bars::{analyze_performance, score_overall, BarsLevel};

/// Input validation failures for the aggregate operation.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("score {value} for question '{question_id}' is outside [0, 1]")]
    ScoreOutOfRange { question_id: String, value: f64 },

    #[error("weight {value} for question '{question_id}' is outside [0, 1]")]
    WeightOutOfRange { question_id: String, value: f64 },

    #[error("weight {value} for block '{block}' is negative")]
    NegativeBlockWeight { block: String, value: f64 },
}

/// Input for the aggregate-scoring operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateRequest {
    /// Answered questions to aggregate
    pub answers: Vec<QAnswer>,
    /// Importance weight per block
    pub block_weights: HashMap<String, f64>,
}

/// Analysis summary of an aggregate report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateAnalysis {
    /// Blocks scoring >= 0.7
    pub strengths: Vec<String>,
    /// Blocks scoring < 0.3
    pub weaknesses: Vec<String>,
    /// BARS level band for the overall score
    pub overall_level: BarsLevel,
}

/// Count summary of an aggregate report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateSummary {
    /// Number of answered questions aggregated
    pub total_questions: usize,
    /// Number of distinct blocks assessed
    pub blocks_assessed: usize,
    /// Unweighted mean of the block scores, rounded to 3 decimals
    pub average_score: f64,
}

/// Output of the aggregate-scoring operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateReport {
    /// Weighted score per block
    pub block_scores: HashMap<String, f64>,
    /// Overall weighted score, 0..=1
    pub overall: f64,
    /// Overall score as a percentage, rounded to 1 decimal
    pub overall_percentage: f64,
    /// Strengths/weaknesses analysis
    pub analysis: AggregateAnalysis,
    /// Count summary
    pub summary: AggregateSummary,
}

/// Validate and aggregate answers into a BARS report.
pub fn aggregate_scores(request: &AggregateRequest) -> Result<AggregateReport, ValidationError> {
    for answer in &request.answers {
        if !(0.0..=1.0).contains(&answer.score) {
            return Err(ValidationError::ScoreOutOfRange {
                question_id: answer.question_id.clone(),
                value: answer.score,
            });
        }
        if !(0.0..=1.0).contains(&answer.weight) {
            return Err(ValidationError::WeightOutOfRange {
                question_id: answer.question_id.clone(),
                value: answer.weight,
            });
        }
    }
    for (block, &weight) in &request.block_weights {
        if weight < 0.0 {
            return Err(ValidationError::NegativeBlockWeight {
                block: block.clone(),
                value: weight,
            });
        }
    }

    let analysis = analyze_performance(&request.answers, &request.block_weights);
    let overall = score_overall(&analysis.block_scores, &request.block_weights);

    let average_score = if analysis.block_scores.is_empty() {
        0.0
    } else {
        let mean: f64 =
            analysis.block_scores.values().sum::<f64>() / analysis.block_scores.len() as f64;
        (mean * 1_000.0).round() / 1_000.0
    };

    Ok(AggregateReport {
        overall,
        overall_percentage: (overall * 1_000.0).round() / 10.0,
        summary: AggregateSummary {
            total_questions: request.answers.len(),
            blocks_assessed: analysis.block_scores.len(),
            average_score,
        },
        analysis: AggregateAnalysis {
            strengths: analysis.strengths,
            weaknesses: analysis.weaknesses,
            overall_level: analysis.overall_level,
        },
        block_scores: analysis.block_scores,
    })
}
