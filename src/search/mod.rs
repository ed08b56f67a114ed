//! Search strategies and the search entry point.
//!
//! [`find`] is the single front door: it validates the request,
//! dispatches to the selected strategy, reconstructs the derivation
//! tree, and optionally enumerates alternative trees. Strategies share
//! one contract: given a graph and a target they return a parent map
//! plus a visit count, or a reachability error.

pub mod bfs;
pub mod bidir;
pub mod dfs;
pub mod multi;
pub mod trace;

pub use trace::{StepRecord, StepTrace};

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;
use tracing::info;

use crate::error::{CraftError, Result};
use crate::graph::RecipeGraph;
use crate::tree::{reconstruct, DerivationNode};

/// Largest accepted `max_paths` value.
pub const MAX_PATHS_LIMIT: usize = 100;

/// Which strategy drives the primary search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    #[default]
    Bfs,
    Dfs,
    Bidirectional,
}

impl FromStr for Algorithm {
    type Err = CraftError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "bfs" => Ok(Algorithm::Bfs),
            "dfs" => Ok(Algorithm::Dfs),
            "bidirectional" => Ok(Algorithm::Bidirectional),
            other => Err(CraftError::InvalidParameter(format!(
                "unknown algorithm '{}' (expected bfs, dfs, or bidirectional)",
                other
            ))),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::Bfs => "bfs",
            Algorithm::Dfs => "dfs",
            Algorithm::Bidirectional => "bidirectional",
        };
        f.write_str(name)
    }
}

/// What a strategy hands back: parent pointers for every element it
/// admitted, and how many elements it expanded.
#[derive(Debug)]
pub struct SearchOutcome {
    pub parents: HashMap<NodeIndex, usize>,
    pub nodes_visited: usize,
}

/// Parameters for one search call.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// The element to derive.
    pub target: String,
    pub algorithm: Algorithm,
    /// Enumerate alternative derivations beyond the first.
    pub multi: bool,
    /// Maximum number of distinct trees when `multi` is set. 1..=100.
    pub max_paths: usize,
    /// Record per-step expansion traces.
    pub trace: bool,
    /// Visit budget across the whole call. `None` means unbounded.
    pub budget: Option<usize>,
}

impl SearchRequest {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            algorithm: Algorithm::default(),
            multi: false,
            max_paths: 1,
            trace: false,
            budget: None,
        }
    }
}

/// The result of a search call.
#[derive(Debug, Serialize)]
pub struct SearchReport {
    pub algorithm: Algorithm,
    /// Distinct derivation trees, first-found first. Never empty.
    pub trees: Vec<DerivationNode>,
    /// Elements expanded across the primary search and enumeration.
    pub nodes_visited: usize,
    pub duration_ms: f64,
    /// Per-step trace; present only when tracing was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<StepRecord>>,
    /// True when the budget cut multi-path enumeration short.
    pub exhausted: bool,
}

/// Run a derivation search against a built graph.
///
/// A base-element target short-circuits to a single `Leaf` with zero
/// visits, whatever the algorithm. A budget that runs out before the
/// first tree exists is an error; running out during enumeration of
/// additional trees returns the partial set with `exhausted` set.
pub fn find(graph: &RecipeGraph, request: &SearchRequest) -> Result<SearchReport> {
    if request.target.is_empty() {
        return Err(CraftError::InvalidParameter("target is empty".to_string()));
    }
    if request.max_paths == 0 || request.max_paths > MAX_PATHS_LIMIT {
        return Err(CraftError::InvalidParameter(format!(
            "max_paths must be between 1 and {}, got {}",
            MAX_PATHS_LIMIT, request.max_paths
        )));
    }
    let Some(target) = graph.element(&request.target) else {
        return Err(CraftError::TargetNotFound(request.target.clone()));
    };

    let started = Instant::now();
    let mut trace = StepTrace::new(request.trace);

    if graph.is_base(target) {
        return Ok(SearchReport {
            algorithm: request.algorithm,
            trees: vec![DerivationNode::leaf(&request.target)],
            nodes_visited: 0,
            duration_ms: started.elapsed().as_secs_f64() * 1000.0,
            steps: request.trace.then(Vec::new),
            exhausted: false,
        });
    }

    let outcome = match request.algorithm {
        Algorithm::Bfs => bfs::run(graph, target, request.budget, &mut trace)?,
        Algorithm::Dfs => dfs::run(graph, target, request.budget, &mut trace)?,
        Algorithm::Bidirectional => bidir::run(graph, target, request.budget, &mut trace)?,
    };

    let first = reconstruct(graph, &outcome.parents, target);
    let mut trees = vec![first];
    let mut nodes_visited = outcome.nodes_visited;
    let mut exhausted = false;

    if request.multi && request.max_paths > 1 {
        let remaining = request
            .budget
            .map(|limit| limit.saturating_sub(nodes_visited));
        let mut seen: HashSet<String> = trees.iter().map(DerivationNode::signature).collect();
        let (extra_visited, cut_short) = multi::enumerate(
            graph,
            target,
            request.max_paths,
            remaining,
            &mut seen,
            &mut trees,
            &mut trace,
        );
        nodes_visited += extra_visited;
        exhausted = cut_short;
    }

    let duration_ms = started.elapsed().as_secs_f64() * 1000.0;
    info!(
        target_element = %request.target,
        algorithm = %request.algorithm,
        trees = trees.len(),
        nodes_visited,
        "search finished"
    );

    Ok(SearchReport {
        algorithm: request.algorithm,
        trees,
        nodes_visited,
        duration_ms,
        steps: trace.is_enabled().then(|| trace.into_records()),
        exhausted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::RecipeTable;

    fn base() -> Vec<String> {
        ["Air", "Earth", "Fire", "Water"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn fixture() -> RecipeGraph {
        let table = RecipeTable::from_triples(vec![
            ("Mud", "Water", "Earth"),
            ("Rain", "Air", "Water"),
            ("Mud", "Rain", "Earth"),
            ("Plant", "Mud", "Rain"),
        ]);
        RecipeGraph::build(&table, &base()).unwrap()
    }

    #[test]
    fn test_algorithm_round_trip() {
        for name in ["bfs", "dfs", "bidirectional"] {
            let algorithm: Algorithm = name.parse().unwrap();
            assert_eq!(algorithm.to_string(), name);
        }
        assert!("astar".parse::<Algorithm>().is_err());
    }

    #[test]
    fn test_base_target_short_circuits() {
        let graph = fixture();
        for algorithm in [Algorithm::Bfs, Algorithm::Dfs, Algorithm::Bidirectional] {
            let mut request = SearchRequest::new("Water");
            request.algorithm = algorithm;
            let report = find(&graph, &request).unwrap();
            assert_eq!(report.trees, vec![DerivationNode::leaf("Water")]);
            assert_eq!(report.nodes_visited, 0);
        }
    }

    #[test]
    fn test_unknown_target() {
        let graph = fixture();
        let err = find(&graph, &SearchRequest::new("Nonexistent")).unwrap_err();
        assert!(matches!(err, CraftError::TargetNotFound(name) if name == "Nonexistent"));
    }

    #[test]
    fn test_empty_target_rejected() {
        let graph = fixture();
        let err = find(&graph, &SearchRequest::new("")).unwrap_err();
        assert!(matches!(err, CraftError::InvalidParameter(_)));
    }

    #[test]
    fn test_max_paths_range() {
        let graph = fixture();
        for bad in [0, MAX_PATHS_LIMIT + 1] {
            let mut request = SearchRequest::new("Mud");
            request.multi = true;
            request.max_paths = bad;
            let err = find(&graph, &request).unwrap_err();
            assert!(matches!(err, CraftError::InvalidParameter(_)));
        }
    }

    #[test]
    fn test_single_path_search() {
        let graph = fixture();
        let report = find(&graph, &SearchRequest::new("Plant")).unwrap();
        assert_eq!(report.trees.len(), 1);
        assert_eq!(report.trees[0].element(), "Plant");
        assert!(report.nodes_visited > 0);
        assert!(report.steps.is_none());
        assert!(!report.exhausted);
    }

    #[test]
    fn test_multi_path_distinct_trees() {
        let graph = fixture();
        let mut request = SearchRequest::new("Mud");
        request.multi = true;
        request.max_paths = 5;
        let report = find(&graph, &request).unwrap();

        assert_eq!(report.trees.len(), 2);
        let signatures: HashSet<String> =
            report.trees.iter().map(DerivationNode::signature).collect();
        assert_eq!(signatures.len(), report.trees.len());
        // The strategy's depth-minimal tree stays first.
        assert_eq!(report.trees[0].depth(), 1);
    }

    #[test]
    fn test_trace_presence_follows_request() {
        let graph = fixture();
        let plain = find(&graph, &SearchRequest::new("Mud")).unwrap();
        assert!(plain.steps.is_none());

        let mut request = SearchRequest::new("Mud");
        request.trace = true;
        let traced = find(&graph, &request).unwrap();
        let steps = traced.steps.unwrap();
        assert!(!steps.is_empty());
        assert!(steps.last().unwrap().target_found);
        assert_eq!(plain.trees, traced.trees);
    }

    #[test]
    fn test_step_records_are_cumulative_snapshots() {
        let table = RecipeTable::from_triples(vec![
            ("Dust", "Air", "Earth"),
            ("Gunpowder", "Dust", "Fire"),
        ]);
        let graph = RecipeGraph::build(&table, &base()).unwrap();
        let mut request = SearchRequest::new("Gunpowder");
        request.trace = true;
        let report = find(&graph, &request).unwrap();

        let steps = report.steps.unwrap();
        // The final record carries the whole discovered-edge map, not
        // just the last step's delta.
        let final_products: Vec<&str> = steps
            .last()
            .unwrap()
            .discovered
            .iter()
            .map(|edge| edge.product.as_str())
            .collect();
        assert!(final_products.contains(&"Dust"));
        assert!(final_products.contains(&"Gunpowder"));
        // Any record can be replayed on its own: each extends its
        // predecessor.
        for pair in steps.windows(2) {
            assert!(pair[1].discovered.len() >= pair[0].discovered.len());
            assert!(pair[1].discovered.starts_with(&pair[0].discovered));
        }
    }

    #[test]
    fn test_multi_enumeration_extends_trace() {
        let graph = fixture();
        let mut single = SearchRequest::new("Mud");
        single.trace = true;
        let single_report = find(&graph, &single).unwrap();

        let mut request = SearchRequest::new("Mud");
        request.trace = true;
        request.multi = true;
        request.max_paths = 5;
        let report = find(&graph, &request).unwrap();

        assert_eq!(report.trees.len(), 2);
        // Playback covers the alternative explorations, not just the
        // primary search.
        assert!(report.steps.unwrap().len() > single_report.steps.unwrap().len());
    }

    #[test]
    fn test_budget_error_before_first_tree() {
        let graph = fixture();
        let mut request = SearchRequest::new("Plant");
        request.budget = Some(1);
        let err = find(&graph, &request).unwrap_err();
        assert!(matches!(err, CraftError::SearchExhausted { budget: 1 }));
    }

    #[test]
    fn test_budget_partial_enumeration() {
        let graph = fixture();
        let unbounded = find(&graph, &SearchRequest::new("Mud")).unwrap();

        let mut request = SearchRequest::new("Mud");
        request.multi = true;
        request.max_paths = 5;
        request.budget = Some(unbounded.nodes_visited);
        let report = find(&graph, &request).unwrap();

        // The first tree fit the budget; enumeration got cut off.
        assert_eq!(report.trees.len(), 1);
        assert!(report.exhausted);
    }

    #[test]
    fn test_report_serializes_without_steps_key() {
        let graph = fixture();
        let report = find(&graph, &SearchRequest::new("Mud")).unwrap();
        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("steps"));
        assert!(json.contains(r#""algorithm":"bfs""#));
    }
}
