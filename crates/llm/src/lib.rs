//! Hirevox LLM
//!
//! Generative-model integration for the interview engine:
//!
//! - `types` - backend configuration and the generative error taxonomy
//! - `http_client` - reqwest client factory with the bounded call timeout
//! - `backend` - the `GenerativeBackend` trait and the OpenAI-compatible
//!   chat-completions implementation (llama.cpp server or any
//!   OpenAI-compatible endpoint)
//! - `judge` - scores one transcript against a node's success criteria
//! - `planner` - turns a judge verdict into a reply and a next-node decision
//!
//! Both stages share one failure contract: any transport, timeout, status,
//! or output-shape problem surfaces as an `Unavailable` error carrying the
//! raw error text, which callers must treat as recoverable.

pub mod backend;
pub mod http_client;
pub mod judge;
pub mod planner;
pub mod types;

// Re-export backend abstraction
pub use backend::{GenerativeBackend, OpenAiCompatBackend};
pub use http_client::build_http_client;

// Re-export stages
pub use judge::{Judge, JudgeUnavailable};
pub use planner::{Planner, PlannerUnavailable};

// Re-export types
pub use types::{BackendConfig, EngineKind, GenerativeError, GenerativeResult};
