//! Hirevox Scenario
//!
//! The question-graph side of the interview engine:
//!
//! - `graph` - adjacency index, validation, and loop-guarded walking over a
//!   scenario's pass/fail edges
//! - `generator` - fallback generator synthesizing a 3-node chain so the
//!   engine is never blocked by missing content
//! - `store` - immutable load-or-generate scenario cache, built once at
//!   process start
//! - `selector` - pure (node, score, threshold) -> next-node mapping and
//!   threshold resolution
//! - `profiles` - closed role-profile enumeration with an explicit
//!   capability table

pub mod generator;
pub mod graph;
pub mod profiles;
pub mod selector;
pub mod store;

// Re-export graph types
pub use graph::{walk_edges, GraphError, ScenarioGraph, MAX_WALK_HOPS};

// Re-export generator
pub use generator::generate_fallback_scenario;

// Re-export store
pub use store::{load_scenario_file, ScenarioLoadError, ScenarioStore};

// Re-export selector
pub use selector::{next_node, resolve_threshold, DEFAULT_DRILL_THRESHOLD};

// Re-export role profiles
pub use profiles::{ProfileCapabilities, ProfileTable, RoleProfile};
