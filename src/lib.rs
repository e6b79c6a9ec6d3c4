//! Hirevox Engine - Interview Dialog Engine
//!
//! The root crate of the Hirevox workspace. It composes the generative
//! judge/planner stages, the heuristic evaluator, the scenario graph, and
//! the phrase banks into one operation that always returns a usable answer:
//! given a candidate utterance and the current question node, produce a
//! score, a conversational reply, the next question, and behavioral red
//! flags - with explicit, layered degradation when any generative stage
//! fails.
//!
//! - `engine` - the dialog orchestrator, the pure fallback path, and
//!   red-flag derivation
//! - `phrasebank` - role-keyed backchannel/canned-reply banks with an
//!   injected phrase picker
//! - `metrics` - fire-and-forget latency recording
//! - `config` - immutable engine configuration built once at startup
//! - `http` - thin axum adapter exposing the reply, streaming reply, and
//!   aggregate-scoring operations

pub mod config;
pub mod engine;
pub mod http;
pub mod metrics;
pub mod phrasebank;

// Re-export the orchestrator and fallback path
pub use engine::{derive_red_flags, fallback_reply, DialogOrchestrator, FallbackDeps};

// Re-export configuration
pub use config::EngineConfig;

// Re-export phrase bank
pub use phrasebank::{FixedPicker, PhraseBank, PhrasePicker, RandomPicker};

// Re-export metrics client
pub use metrics::MetricsClient;
