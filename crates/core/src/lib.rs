//! Hirevox Core
//!
//! Foundational domain types, error types, and reply stream frames for the
//! Hirevox workspace. This crate has zero dependencies on engine-level code
//! (HTTP, LLM backends, scenario storage, etc.).
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `types` - Interview domain model (`Node`, `Scenario`, `QAnswer`,
//!   `JudgeResult`, `PlannerResult`, `ReplyOutcome`, ...)
//! - `streaming` - Typed reply stream frames (`ReplyFrame`)
//!
//! ## Design Principles
//!
//! 1. **Zero external dependencies beyond serde/thiserror** - keeps build times minimal
//! 2. **Value objects only** - everything here is created fresh per turn and
//!    never outlives one reply invocation
//! 3. **Unidirectional dependency** - this crate depends on nothing else in the workspace

pub mod error;
pub mod streaming;
pub mod types;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Domain Model ───────────────────────────────────────────────────────
pub use types::{
    FollowUpType, JudgeResult, Node, PlannerResult, Priority, QAnswer, RedFlag, ReplyOutcome,
    ReplyRequest, Scenario, ScenarioPolicy, ScoringUpdate,
};

// ── Stream Frames ──────────────────────────────────────────────────────
pub use streaming::ReplyFrame;
