//! Breadth-first derivation search.
//!
//! Seeds the frontier with the base elements and expands outward along
//! the forward combination index. A product is admitted at the pop of
//! the later-expanded of its two ingredients, never earlier; since
//! pops happen in admission order, admission depth is non-decreasing
//! and the first tree found is minimal in combination depth. Admitting
//! on a merely-admitted partner would let a product jump a level via a
//! same-wave sibling and lose that guarantee.

use petgraph::graph::NodeIndex;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

use crate::error::{CraftError, Result};
use crate::graph::RecipeGraph;
use crate::search::trace::StepTrace;
use crate::search::SearchOutcome;

pub fn run(
    graph: &RecipeGraph,
    target: NodeIndex,
    budget: Option<usize>,
    trace: &mut StepTrace,
) -> Result<SearchOutcome> {
    let mut queue: VecDeque<NodeIndex> = graph.base_ids().iter().copied().collect();
    let mut admitted: HashSet<NodeIndex> = queue.iter().copied().collect();
    let mut expanded: HashSet<NodeIndex> = HashSet::new();
    let mut parents: HashMap<NodeIndex, usize> = HashMap::new();
    let mut nodes_visited = 0usize;

    while let Some(current) = queue.pop_front() {
        if let Some(limit) = budget {
            if nodes_visited >= limit {
                return Err(CraftError::SearchExhausted { budget: limit });
            }
        }
        nodes_visited += 1;
        expanded.insert(current);

        let mut found_now = false;
        for &combo_index in graph.forward(current) {
            let combo = graph.combo(combo_index);
            let partner = combo.partner_of(current);

            // A combination fires at the pop of whichever ingredient
            // is expanded second; the partner's own pop rechecks it.
            if expanded.contains(&partner) && !admitted.contains(&combo.product) {
                admitted.insert(combo.product);
                parents.insert(combo.product, combo_index);
                trace.observe(graph, combo_index);
                queue.push_back(combo.product);
                if combo.product == target {
                    found_now = true;
                }
            }
        }

        if trace.is_enabled() {
            let frontier = queue.iter().map(|&id| graph.name(id).to_string()).collect();
            trace.record(graph.name(current), frontier, found_now);
        }

        if found_now {
            debug!(
                target_element = graph.name(target),
                nodes_visited, "bfs reached target"
            );
            return Ok(SearchOutcome {
                parents,
                nodes_visited,
            });
        }
    }

    Err(CraftError::NoPathFound(graph.name(target).to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::RecipeTable;
    use crate::tree::reconstruct;

    fn base() -> Vec<String> {
        ["Air", "Earth", "Fire", "Water"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_finds_single_step_target() {
        let table = RecipeTable::from_triples(vec![("Dust", "Air", "Earth")]);
        let graph = RecipeGraph::build(&table, &base()).unwrap();
        let dust = graph.element("Dust").unwrap();

        let outcome = run(&graph, dust, None, &mut StepTrace::disabled()).unwrap();
        assert!(outcome.parents.contains_key(&dust));
        assert!(outcome.nodes_visited >= 1);
    }

    #[test]
    fn test_admission_requires_both_ingredients() {
        // Brick needs Clay, which is never derivable.
        let table = RecipeTable::from_triples(vec![("Brick", "Clay", "Fire")]);
        let graph = RecipeGraph::build(&table, &base()).unwrap();
        let brick = graph.element("Brick").unwrap();

        let err = run(&graph, brick, None, &mut StepTrace::disabled()).unwrap_err();
        assert!(matches!(err, CraftError::NoPathFound(_)));
    }

    #[test]
    fn test_first_tree_is_depth_minimal() {
        // Mud has a depth-1 recipe and a depth-2 recipe via Rain.
        let table = RecipeTable::from_triples(vec![
            ("Rain", "Air", "Water"),
            ("Mud", "Rain", "Earth"),
            ("Mud", "Water", "Earth"),
        ]);
        let graph = RecipeGraph::build(&table, &base()).unwrap();
        let mud = graph.element("Mud").unwrap();

        let outcome = run(&graph, mud, None, &mut StepTrace::disabled()).unwrap();
        let tree = reconstruct(&graph, &outcome.parents, mud);
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn test_self_combination() {
        let table = RecipeTable::from_triples(vec![("Pressure", "Air", "Air")]);
        let graph = RecipeGraph::build(&table, &base()).unwrap();
        let pressure = graph.element("Pressure").unwrap();

        let outcome = run(&graph, pressure, None, &mut StepTrace::disabled()).unwrap();
        let tree = reconstruct(&graph, &outcome.parents, pressure);
        assert_eq!(tree.leaves(), ["Air", "Air"]);
    }

    #[test]
    fn test_budget_exhaustion() {
        let table = RecipeTable::from_triples(vec![
            ("Dust", "Air", "Earth"),
            ("Gunpowder", "Dust", "Fire"),
        ]);
        let graph = RecipeGraph::build(&table, &base()).unwrap();
        let gunpowder = graph.element("Gunpowder").unwrap();

        let err = run(&graph, gunpowder, Some(2), &mut StepTrace::disabled()).unwrap_err();
        assert!(matches!(err, CraftError::SearchExhausted { budget: 2 }));
    }

    #[test]
    fn test_trace_does_not_change_result() {
        let table = RecipeTable::from_triples(vec![
            ("Dust", "Air", "Earth"),
            ("Gunpowder", "Dust", "Fire"),
        ]);
        let graph = RecipeGraph::build(&table, &base()).unwrap();
        let gunpowder = graph.element("Gunpowder").unwrap();

        let plain = run(&graph, gunpowder, None, &mut StepTrace::disabled()).unwrap();
        let mut trace = StepTrace::new(true);
        let traced = run(&graph, gunpowder, None, &mut trace).unwrap();

        assert_eq!(plain.parents, traced.parents);
        assert_eq!(plain.nodes_visited, traced.nodes_visited);
        assert!(!trace.is_empty());
        assert!(trace.records().last().unwrap().target_found);
    }
}
