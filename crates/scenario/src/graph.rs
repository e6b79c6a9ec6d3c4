//! Scenario Graph
//!
//! Explicit adjacency over a scenario's nodes, keyed by node id, plus
//! validation and a loop-guarded edge walk. Plateaus (both edges pointing at
//! the same node) are legal; cycles among a node's descendants are not
//! rejected at load time, so every walk carries a visited set and a hop cap
//! to guarantee termination.

use std::collections::{HashMap, HashSet};
use thiserror::Error;

use hirevox_core::{Node, Scenario};

/// Upper bound on hops for any single walk through a scenario.
pub const MAX_WALK_HOPS: usize = 64;

/// Structural problems in a scenario graph.
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("start id '{0}' does not reference a node in the scenario")]
    MissingStart(String),

    #[error("node '{from}' references missing node '{to}'")]
    DanglingEdge { from: String, to: String },

    #[error("duplicate node id '{0}'")]
    DuplicateNode(String),
}

/// Adjacency index over a scenario, keyed by node id.
#[derive(Debug)]
pub struct ScenarioGraph<'a> {
    nodes: HashMap<&'a str, &'a Node>,
    start_id: &'a str,
}

impl<'a> ScenarioGraph<'a> {
    /// Index a scenario, verifying its structural invariants: unique node
    /// ids, an existing start node, and no dangling edge references.
    pub fn new(scenario: &'a Scenario) -> Result<Self, GraphError> {
        let mut nodes: HashMap<&str, &Node> = HashMap::with_capacity(scenario.nodes.len());
        for node in &scenario.nodes {
            if nodes.insert(node.id.as_str(), node).is_some() {
                return Err(GraphError::DuplicateNode(node.id.clone()));
            }
        }

        if !nodes.contains_key(scenario.start_id.as_str()) {
            return Err(GraphError::MissingStart(scenario.start_id.clone()));
        }

        for node in &scenario.nodes {
            for target in [&node.next_if_fail, &node.next_if_pass].into_iter().flatten() {
                if !nodes.contains_key(target.as_str()) {
                    return Err(GraphError::DanglingEdge {
                        from: node.id.clone(),
                        to: target.clone(),
                    });
                }
            }
        }

        Ok(Self {
            nodes,
            start_id: scenario.start_id.as_str(),
        })
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&'a Node> {
        self.nodes.get(id).copied()
    }

    /// The scenario's start node.
    pub fn start(&self) -> &'a Node {
        // Verified present in `new`.
        self.nodes[self.start_id]
    }

    /// Number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walk from `start_id` following one edge per node as chosen by
    /// `pick`, collecting the visited node ids in order.
    ///
    /// Terminates at a terminal node, at the first revisited node, or after
    /// [`MAX_WALK_HOPS`] hops, whichever comes first - descendants looping
    /// back can never spin the walk.
    pub fn walk<F>(&self, start_id: &str, mut pick: F) -> Vec<String>
    where
        F: FnMut(&'a Node) -> Option<&'a str>,
    {
        let mut path = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut current = self.node(start_id);

        while let Some(node) = current {
            if !visited.insert(node.id.as_str()) || path.len() >= MAX_WALK_HOPS {
                break;
            }
            path.push(node.id.clone());
            current = pick(node).and_then(|id| self.node(id));
        }

        path
    }
}

/// Walk a scenario's edges taking the fail edge when `fail` is true and the
/// pass edge otherwise, from the scenario's start node.
pub fn walk_edges(scenario: &Scenario, fail: bool) -> Result<Vec<String>, GraphError> {
    let graph = ScenarioGraph::new(scenario)?;
    Ok(graph.walk(&scenario.start_id, |node| {
        if fail {
            node.next_if_fail.as_deref()
        } else {
            node.next_if_pass.as_deref()
        }
    }))
}
