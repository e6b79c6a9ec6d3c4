//! Scenario Store
//!
//! Immutable load-or-generate cache of scenario graphs, built once at
//! process start and shared read-only across reply invocations. A scenario
//! artifact that is missing, unparsable, or structurally invalid is
//! recovered with the fallback generator - load failures are logged and
//! never surfaced to a caller.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use hirevox_core::Scenario;

use crate::generator::generate_fallback_scenario;
use crate::graph::{GraphError, ScenarioGraph};

/// Failures loading one scenario artifact. Always recovered by the caller
/// via [`generate_fallback_scenario`]; exposed for logging and tests.
#[derive(Debug, Error)]
pub enum ScenarioLoadError {
    #[error("failed to read scenario file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scenario file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("scenario graph invalid: {0}")]
    Invalid(#[from] GraphError),
}

/// Load and validate a single scenario JSON artifact.
pub fn load_scenario_file(path: impl AsRef<Path>) -> Result<Scenario, ScenarioLoadError> {
    let text = std::fs::read_to_string(path)?;
    let scenario: Scenario = serde_json::from_str(&text)?;
    ScenarioGraph::new(&scenario)?;
    Ok(scenario)
}

/// Process-wide scenario cache keyed by category.
///
/// Categories without a loadable artifact get a synthesized 3-node chain on
/// demand; since generation is pure, the store itself stays immutable after
/// construction.
#[derive(Debug, Default)]
pub struct ScenarioStore {
    scenarios: HashMap<String, Arc<Scenario>>,
    dir: Option<PathBuf>,
}

impl ScenarioStore {
    /// An empty store; every lookup synthesizes a fallback chain.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a store from a directory of `{category}.json` artifacts.
    ///
    /// Unreadable or invalid artifacts are skipped with a warning; lookups
    /// for their categories fall through to the generator.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let mut scenarios = HashMap::new();

        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "scenario directory unreadable, store starts empty");
                return Self {
                    scenarios,
                    dir: Some(dir),
                };
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(category) = path.file_stem().and_then(|s| s.to_str()).map(String::from)
            else {
                continue;
            };

            match load_scenario_file(&path) {
                Ok(scenario) => {
                    debug!(category = %category, nodes = scenario.nodes.len(), "loaded scenario");
                    scenarios.insert(category, Arc::new(scenario));
                }
                Err(err) => {
                    warn!(
                        category = %category,
                        error = %err,
                        "scenario artifact unusable, falling back to generated chain"
                    );
                }
            }
        }

        info!(dir = %dir.display(), loaded = scenarios.len(), "scenario store ready");
        Self {
            scenarios,
            dir: Some(dir),
        }
    }

    /// Number of preloaded scenarios.
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Whether any scenarios were preloaded.
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Scenario for a category: the preloaded artifact when present,
    /// otherwise a freshly generated fallback chain. Never fails.
    pub fn get(&self, category: &str) -> Arc<Scenario> {
        if let Some(scenario) = self.scenarios.get(category) {
            return Arc::clone(scenario);
        }
        debug!(category = %category, "no authored scenario, generating fallback chain");
        Arc::new(generate_fallback_scenario(category))
    }

    /// Categories with authored scenarios, sorted.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self.scenarios.keys().cloned().collect();
        categories.sort_unstable();
        categories
    }

    /// The directory this store was built from, if any.
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }
}
