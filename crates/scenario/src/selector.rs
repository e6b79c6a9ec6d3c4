//! Node Graph Selector
//!
//! Pure mapping from (current node, score, threshold) to the next node id,
//! plus the threshold resolution chain: role-profile override, then the
//! scenario's policy, then the global default.

use hirevox_core::{Node, Scenario};

/// Global default drill threshold when neither the role profile nor the
/// scenario policy provides one.
pub const DEFAULT_DRILL_THRESHOLD: f64 = 0.7;

/// Next node for a scored answer: the fail edge below the threshold, the
/// pass edge at or above it. `None` means the branch is over.
pub fn next_node(current: &Node, score: f64, threshold: f64) -> Option<String> {
    if score < threshold {
        current.next_if_fail.clone()
    } else {
        current.next_if_pass.clone()
    }
}

/// Resolve the effective drill threshold.
///
/// Order: role-profile override -> scenario `policy.drill_threshold` ->
/// [`DEFAULT_DRILL_THRESHOLD`].
pub fn resolve_threshold(profile_threshold: Option<f64>, scenario: Option<&Scenario>) -> f64 {
    profile_threshold
        .or_else(|| scenario.map(|s| s.policy.drill_threshold))
        .unwrap_or(DEFAULT_DRILL_THRESHOLD)
}
