//! Integration Tests Module
//!
//! End-to-end tests for the Hirevox dialog engine. Tests cover the
//! synchronous reply path under backend failure, the streaming frame
//! protocol, scenario load-or-generate behavior, and the aggregate scoring
//! operation - all against stubbed generative backends, never the network.

// Shared stub backends and request fixtures
mod common;

// Synchronous reply path and fallback equivalence tests
mod engine_test;

// Streaming frame protocol tests
mod streaming_test;

// Scenario store round-trip tests
mod scenario_test;
