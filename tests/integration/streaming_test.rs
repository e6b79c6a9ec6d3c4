//! Streaming Frame Protocol Tests
//!
//! The ordered-frame contract of the streaming reply: a backchannel first,
//! stage frames only for stages that succeeded, and the stream never ending
//! without exactly one `final` and one `done` - even when every generative
//! call fails.

use std::sync::Arc;
use tokio::sync::mpsc;

use hirevox_core::{RedFlag, ReplyFrame};

use crate::common::{reply_request, test_orchestrator, AlwaysFailingBackend, ScriptedBackend};

async fn collect_frames(
    engine: &hirevox_engine::DialogOrchestrator,
    transcript: &str,
) -> Vec<ReplyFrame> {
    let (tx, mut rx) = mpsc::channel(32);
    engine.reply_stream(&reply_request(transcript), tx).await;

    let mut frames = Vec::new();
    while let Some(frame) = rx.recv().await {
        frames.push(frame);
    }
    frames
}

#[tokio::test]
async fn test_failing_backend_frame_shape() {
    let engine = test_orchestrator(Arc::new(AlwaysFailingBackend));
    let frames = collect_frames(&engine, "I tuned detection rules last year").await;

    let kinds: Vec<&str> = frames.iter().map(|f| f.kind()).collect();
    assert_eq!(kinds, vec!["backchannel", "fallback", "final", "done"]);

    // Exactly one of each closing frame, in order.
    assert_eq!(kinds.iter().filter(|k| **k == "fallback").count(), 1);
    assert_eq!(kinds.iter().filter(|k| **k == "final").count(), 1);
    assert_eq!(kinds.iter().filter(|k| **k == "done").count(), 1);

    match &frames[1] {
        ReplyFrame::Fallback { reason } => assert!(reason.contains("judge unavailable")),
        other => panic!("expected fallback frame, got {other:?}"),
    }
    match frames.last().unwrap() {
        ReplyFrame::Done { .. } => {}
        other => panic!("expected done frame, got {other:?}"),
    }
}

#[tokio::test]
async fn test_failing_backend_final_matches_sync_reply() {
    let transcript = "I tuned detection rules last year";

    let engine = test_orchestrator(Arc::new(AlwaysFailingBackend));
    let frames = collect_frames(&engine, transcript).await;
    let streamed_outcome = frames
        .iter()
        .find_map(|f| match f {
            ReplyFrame::Final { outcome } => Some(outcome.clone()),
            _ => None,
        })
        .expect("final frame present");

    let sync_outcome = engine.reply(&reply_request(transcript)).await;
    assert_eq!(streamed_outcome, sync_outcome);
    assert!(streamed_outcome.red_flags.contains(&RedFlag::JudgeError));
}

#[tokio::test]
async fn test_happy_path_frame_order() {
    let backend = ScriptedBackend::new(vec![
        Ok(serde_json::json!({
            "score": 0.85,
            "evidence": ["rules and metrics covered"],
            "confidence": 0.9,
            "missing_criteria": []
        })),
        Ok(serde_json::json!({
            "reply": "Good. On to concrete cases.",
            "next_node_id": "afr_l2_cases",
            "follow_up_type": "completion",
            "priority": "medium"
        })),
    ]);
    let engine = test_orchestrator(backend);
    let frames = collect_frames(&engine, "rules, metrics, and plenty of cases").await;

    let kinds: Vec<&str> = frames.iter().map(|f| f.kind()).collect();
    assert_eq!(kinds, vec!["backchannel", "judge", "planner", "final", "done"]);

    match &frames[1] {
        ReplyFrame::Judge { result } => assert_eq!(result.score, 0.85),
        other => panic!("expected judge frame, got {other:?}"),
    }
}

#[tokio::test]
async fn test_planner_failure_mid_stream_recomputes_heuristically() {
    // Judge succeeds (frame emitted), then the planner fails: the stream
    // must carry a fallback notice and still close with final + done.
    let backend = ScriptedBackend::new(vec![Ok(serde_json::json!({
        "score": 0.85,
        "evidence": [],
        "confidence": 0.9,
        "missing_criteria": []
    }))]);
    let engine = test_orchestrator(backend);
    let frames = collect_frames(&engine, "rules and metrics in production").await;

    let kinds: Vec<&str> = frames.iter().map(|f| f.kind()).collect();
    assert_eq!(
        kinds,
        vec!["backchannel", "judge", "fallback", "final", "done"]
    );

    // Mid-stream the turn is recomputed on the heuristic path.
    let outcome = frames
        .iter()
        .find_map(|f| match f {
            ReplyFrame::Final { outcome } => Some(outcome.clone()),
            _ => None,
        })
        .unwrap();
    assert!(outcome.red_flags.contains(&RedFlag::PlannerError));
    // Two of three criteria hit: the discrete heuristic middle anchor.
    assert_eq!(outcome.scoring_update.score, 0.7);
}

#[tokio::test]
async fn test_backchannel_is_first_and_neutral() {
    let engine = test_orchestrator(Arc::new(AlwaysFailingBackend));
    let frames = collect_frames(&engine, "anything at all").await;

    match &frames[0] {
        ReplyFrame::Backchannel { reply } => {
            // Neutral-bucket phrase from the builtin generic bank.
            assert_eq!(reply, "Could you clarify that, please?");
        }
        other => panic!("expected backchannel frame, got {other:?}"),
    }
}
