//! Heuristic Fallback Path
//!
//! The guaranteed floor of the reply pipeline: heuristic keyword scoring,
//! threshold-resolved node selection, and a canned reply by score bucket.
//! This is a pure function of its inputs so the orchestrator's degraded
//! output can be compared byte-for-byte against a direct call in tests. It
//! cannot fail.

use tracing::debug;

use hirevox_core::{RedFlag, ReplyOutcome, ReplyRequest, ScoringUpdate};
use hirevox_scenario::{next_node, resolve_threshold, ProfileTable, RoleProfile, ScenarioStore};
use hirevox_scoring::{calculate_confidence, heuristic_score};

use crate::engine::red_flags::derive_red_flags;
use crate::phrasebank::{PhraseBank, PhrasePicker};

/// Shared read-only dependencies of the fallback path.
pub struct FallbackDeps<'a> {
    pub profiles: &'a ProfileTable,
    pub scenarios: &'a ScenarioStore,
    pub phrases: &'a PhraseBank,
    pub picker: &'a dyn PhrasePicker,
}

/// Compute a reply entirely from the heuristic evaluator and node selector.
///
/// `stage_tag` names the stage whose failure routed the turn here
/// (`judge_error` / `planner_error` / `system_error`); `None` when invoked
/// directly.
pub fn fallback_reply(
    req: &ReplyRequest,
    deps: &FallbackDeps<'_>,
    stage_tag: Option<RedFlag>,
) -> ReplyOutcome {
    let profile = RoleProfile::from_tag(req.role_profile.as_deref());

    let score = heuristic_score(&req.transcript, &req.node.success_criteria);
    let confidence = calculate_confidence(&req.transcript, &req.node.success_criteria, score);

    let scenario = deps.scenarios.get(&req.node.category);
    let threshold = resolve_threshold(deps.profiles.drill_threshold(profile), Some(scenario.as_ref()));
    let next_node_id = next_node(&req.node, score, threshold);

    let reply = deps.phrases.pick(profile, score, deps.picker);

    let mut red_flags = derive_red_flags(confidence, &req.transcript, None);
    if let Some(tag) = stage_tag {
        red_flags.push(tag);
    }

    let prior = req.scores.get(&req.node.category).copied().unwrap_or(0.0);
    debug!(
        score,
        confidence,
        threshold,
        next = ?next_node_id,
        "heuristic fallback reply"
    );

    ReplyOutcome {
        reply,
        next_node_id,
        scoring_update: ScoringUpdate {
            block: req.node.category.clone(),
            delta: score - prior,
            score,
        },
        red_flags,
        confidence,
        role_profile: req.role_profile.clone(),
    }
}
