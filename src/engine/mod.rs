//! Dialog Engine
//!
//! The orchestrator composing judge, planner, heuristic evaluator, and node
//! selector into the always-answering reply operation, plus the pure
//! fallback path and red-flag derivation it shares with tests.

mod fallback;
mod orchestrator;
mod red_flags;

pub use fallback::{fallback_reply, FallbackDeps};
pub use orchestrator::DialogOrchestrator;
pub use red_flags::{derive_red_flags, UNCERTAINTY_MARKERS};
