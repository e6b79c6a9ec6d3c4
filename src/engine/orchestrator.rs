//! Dialog Orchestrator
//!
//! Sequences Judge -> Planner for one candidate utterance and degrades to
//! the heuristic path on any failure at any stage. The turn is a small state
//! machine - Start, Judging, Planning, Done, with Fallback reachable from
//! every state - and its contract is "always answer": no internal error ever
//! reaches the interview participant.
//!
//! Degradation is layered:
//! - judge failure: heuristic scoring + node selector + canned reply,
//!   tagged `judge_error`
//! - planner failure (synchronous path): the judge's verdict is kept and
//!   only the planning is canned, tagged `planner_error`
//! - anything unexpected, including panics: full heuristic path, tagged
//!   `system_error`

use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use hirevox_core::{
    JudgeResult, PlannerResult, RedFlag, ReplyFrame, ReplyOutcome, ReplyRequest, ScoringUpdate,
};
use hirevox_llm::{GenerativeBackend, Judge, Planner};
use hirevox_scenario::{ProfileTable, RoleProfile, ScenarioStore};

use crate::engine::fallback::{fallback_reply, FallbackDeps};
use crate::engine::red_flags::derive_red_flags;
use crate::metrics::MetricsClient;
use crate::phrasebank::{PhraseBank, PhrasePicker, RandomPicker};

/// Score below which the degraded planner path asks for clarification,
/// mirroring the instruction given to the generative planner. Independent of
/// the selector's drill-threshold resolution.
const PLANNER_CLARIFY_BELOW: f64 = 0.7;

/// Assumed neutral score for the backchannel bucket; immediate feedback
/// only, never part of scoring.
const BACKCHANNEL_NEUTRAL_SCORE: f64 = 0.5;

/// States of one reply turn, logged at each transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TurnState {
    Judging,
    Planning,
    Fallback,
    Done,
}

/// Why a turn left the generative path.
enum FallbackTrigger {
    Judge { detail: String },
    Planner { detail: String, judge: JudgeResult },
    System { detail: String },
}

impl FallbackTrigger {
    fn tag(&self) -> RedFlag {
        match self {
            FallbackTrigger::Judge { .. } => RedFlag::JudgeError,
            FallbackTrigger::Planner { .. } => RedFlag::PlannerError,
            FallbackTrigger::System { .. } => RedFlag::SystemError,
        }
    }

    fn reason(&self) -> String {
        match self {
            FallbackTrigger::Judge { detail } => format!("judge unavailable: {detail}"),
            FallbackTrigger::Planner { detail, .. } => format!("planner unavailable: {detail}"),
            FallbackTrigger::System { detail } => format!("internal error: {detail}"),
        }
    }
}

/// How a streaming turn ended early.
enum StreamAbort {
    /// The receiver dropped; stop emitting, let in-flight calls finish
    Cancelled,
    /// A generative stage failed; recompute via the heuristic path
    Degrade(FallbackTrigger),
}

/// The interview dialog engine root.
///
/// Stateless across turns: the caller owns the per-block score accumulator
/// and resubmits it each call. All shared dependencies are read-only after
/// construction, so one orchestrator serves concurrent turns without locks.
pub struct DialogOrchestrator {
    judge: Judge,
    planner: Planner,
    scenarios: Arc<ScenarioStore>,
    profiles: Arc<ProfileTable>,
    phrases: Arc<PhraseBank>,
    picker: Arc<dyn PhrasePicker>,
    metrics: Option<MetricsClient>,
}

impl DialogOrchestrator {
    /// Create an orchestrator over a generative backend and its read-only
    /// dependencies. Uses the randomized phrase picker.
    pub fn new(
        backend: Arc<dyn GenerativeBackend>,
        scenarios: Arc<ScenarioStore>,
        profiles: Arc<ProfileTable>,
        phrases: Arc<PhraseBank>,
    ) -> Self {
        Self {
            judge: Judge::new(Arc::clone(&backend)),
            planner: Planner::new(backend),
            scenarios,
            profiles,
            phrases,
            picker: Arc::new(RandomPicker),
            metrics: None,
        }
    }

    /// Replace the phrase picker (tests inject a fixed one).
    pub fn with_picker(mut self, picker: Arc<dyn PhrasePicker>) -> Self {
        self.picker = picker;
        self
    }

    /// Enable the fire-and-forget latency side effect.
    pub fn with_metrics(mut self, metrics: MetricsClient) -> Self {
        self.metrics = Some(metrics);
        self
    }

    fn deps(&self) -> FallbackDeps<'_> {
        FallbackDeps {
            profiles: &self.profiles,
            scenarios: &self.scenarios,
            phrases: &self.phrases,
            picker: self.picker.as_ref(),
        }
    }

    /// Synchronous reply operation. Always returns a usable outcome.
    pub async fn reply(&self, req: &ReplyRequest) -> ReplyOutcome {
        let profile = RoleProfile::from_tag(req.role_profile.as_deref());

        match AssertUnwindSafe(self.generative_turn(req, profile))
            .catch_unwind()
            .await
        {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(trigger)) => self.degrade(req, trigger),
            Err(_) => {
                error!(node = %req.node.id, "panic in generative pipeline");
                fallback_reply(req, &self.deps(), Some(RedFlag::SystemError))
            }
        }
    }

    /// Streaming reply operation: backchannel first, then judge/planner
    /// frames as stages succeed, then `final` + `done`. A generative failure
    /// mid-stream emits a `fallback` notice and recomputes via the heuristic
    /// path; the stream only ends without `final` + `done` when the receiver
    /// has gone away.
    pub async fn reply_stream(&self, req: &ReplyRequest, tx: mpsc::Sender<ReplyFrame>) {
        let start = Instant::now();
        let profile = RoleProfile::from_tag(req.role_profile.as_deref());

        let backchannel =
            self.phrases
                .pick(profile, BACKCHANNEL_NEUTRAL_SCORE, self.picker.as_ref());
        if tx
            .send(ReplyFrame::Backchannel { reply: backchannel })
            .await
            .is_err()
        {
            debug!("stream receiver dropped before backchannel");
            return;
        }

        let outcome = match AssertUnwindSafe(self.generative_stream_turn(req, profile, &tx))
            .catch_unwind()
            .await
        {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(StreamAbort::Cancelled)) => {
                debug!("stream receiver dropped mid-turn");
                return;
            }
            Ok(Err(StreamAbort::Degrade(trigger))) => {
                debug!(state = ?TurnState::Fallback, "turn state");
                warn!(reason = %trigger.reason(), "generative stage failed mid-stream");
                if tx
                    .send(ReplyFrame::Fallback {
                        reason: trigger.reason(),
                    })
                    .await
                    .is_err()
                {
                    return;
                }
                fallback_reply(req, &self.deps(), Some(trigger.tag()))
            }
            Err(_) => {
                error!(node = %req.node.id, "panic in generative pipeline");
                if tx
                    .send(ReplyFrame::Fallback {
                        reason: "internal error".to_string(),
                    })
                    .await
                    .is_err()
                {
                    return;
                }
                fallback_reply(req, &self.deps(), Some(RedFlag::SystemError))
            }
        };

        if tx.send(ReplyFrame::Final { outcome }).await.is_err() {
            return;
        }

        let latency_ms = start.elapsed().as_millis() as u64;
        if let Some(metrics) = &self.metrics {
            metrics.record_latency("dm", latency_ms as f64, true);
        }
        let _ = tx.send(ReplyFrame::Done { latency_ms }).await;
    }

    /// The Judge -> Planning happy path of the turn state machine.
    async fn generative_turn(
        &self,
        req: &ReplyRequest,
        profile: RoleProfile,
    ) -> Result<ReplyOutcome, FallbackTrigger> {
        debug!(state = ?TurnState::Judging, node = %req.node.id, "turn state");
        let judge_result = self
            .judge
            .evaluate(
                &req.transcript,
                &req.node.success_criteria,
                profile.display_name(),
            )
            .await
            .map_err(|e| FallbackTrigger::Judge { detail: e.detail })?;

        debug!(state = ?TurnState::Planning, score = judge_result.score, "turn state");
        let planner_result = match self
            .planner
            .plan(&judge_result, &req.node, profile.display_name())
            .await
        {
            Ok(result) => result,
            Err(e) => {
                return Err(FallbackTrigger::Planner {
                    detail: e.detail,
                    judge: judge_result,
                })
            }
        };

        debug!(state = ?TurnState::Done, next = ?planner_result.next_node_id, "turn state");
        Ok(self.assemble(req, &judge_result, planner_result))
    }

    /// Streaming variant of the happy path, emitting a frame after each
    /// successful stage.
    async fn generative_stream_turn(
        &self,
        req: &ReplyRequest,
        profile: RoleProfile,
        tx: &mpsc::Sender<ReplyFrame>,
    ) -> Result<ReplyOutcome, StreamAbort> {
        let judge_result = self
            .judge
            .evaluate(
                &req.transcript,
                &req.node.success_criteria,
                profile.display_name(),
            )
            .await
            .map_err(|e| StreamAbort::Degrade(FallbackTrigger::Judge { detail: e.detail }))?;
        tx.send(ReplyFrame::Judge {
            result: judge_result.clone(),
        })
        .await
        .map_err(|_| StreamAbort::Cancelled)?;

        let planner_result = self
            .planner
            .plan(&judge_result, &req.node, profile.display_name())
            .await
            .map_err(|e| {
                StreamAbort::Degrade(FallbackTrigger::Planner {
                    detail: e.detail,
                    judge: judge_result.clone(),
                })
            })?;
        tx.send(ReplyFrame::Planner {
            result: planner_result.clone(),
        })
        .await
        .map_err(|_| StreamAbort::Cancelled)?;

        Ok(self.assemble(req, &judge_result, planner_result))
    }

    /// Route a failed turn down the right degradation layer.
    fn degrade(&self, req: &ReplyRequest, trigger: FallbackTrigger) -> ReplyOutcome {
        debug!(state = ?TurnState::Fallback, "turn state");
        warn!(reason = %trigger.reason(), "degrading to heuristic path");
        match trigger {
            // Planner failure keeps the judge's verdict - successful work
            // from a prior stage is never discarded.
            FallbackTrigger::Planner { judge, .. } => self.planner_degraded(req, judge),
            other => fallback_reply(req, &self.deps(), Some(other.tag())),
        }
    }

    /// Canned planning on top of a successful judge verdict.
    fn planner_degraded(&self, req: &ReplyRequest, judge: JudgeResult) -> ReplyOutcome {
        let clarifying = judge.score < PLANNER_CLARIFY_BELOW;
        let reply = if clarifying {
            match judge.missing_criteria.first() {
                Some(criterion) => format!("Could you give more detail on {criterion}?"),
                None => "Could you give a bit more detail on that?".to_string(),
            }
        } else {
            "Understood, let's move on.".to_string()
        };
        let next_node_id = if clarifying {
            req.node.next_if_fail.clone()
        } else {
            req.node.next_if_pass.clone()
        };

        let mut red_flags =
            derive_red_flags(judge.confidence, &req.transcript, Some(&judge.missing_criteria));
        red_flags.push(RedFlag::PlannerError);

        let prior = req.scores.get(&req.node.category).copied().unwrap_or(0.0);
        ReplyOutcome {
            reply,
            next_node_id,
            scoring_update: ScoringUpdate {
                block: req.node.category.clone(),
                delta: judge.score - prior,
                score: judge.score,
            },
            red_flags,
            confidence: judge.confidence,
            role_profile: req.role_profile.clone(),
        }
    }

    /// Assemble the outcome from a full generative turn.
    fn assemble(
        &self,
        req: &ReplyRequest,
        judge: &JudgeResult,
        planner: PlannerResult,
    ) -> ReplyOutcome {
        let red_flags =
            derive_red_flags(judge.confidence, &req.transcript, Some(&judge.missing_criteria));
        let prior = req.scores.get(&req.node.category).copied().unwrap_or(0.0);

        ReplyOutcome {
            reply: planner.reply,
            next_node_id: planner.next_node_id,
            scoring_update: ScoringUpdate {
                block: req.node.category.clone(),
                delta: judge.score - prior,
                score: judge.score,
            },
            red_flags,
            confidence: judge.confidence,
            role_profile: req.role_profile.clone(),
        }
    }
}
