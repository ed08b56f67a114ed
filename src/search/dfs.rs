//! Depth-first derivation search.
//!
//! Stack frontier: one derivation line is followed as deep as possible
//! before backtracking. A product is admitted as soon as its partner
//! is in the visited set, so newly admitted elements immediately feed
//! further admissions. The tree found first is valid but carries no
//! depth guarantee; which line gets followed depends on base seeding
//! order and table order.

use petgraph::graph::NodeIndex;
use std::collections::{HashMap, HashSet};
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
    let mut stack: Vec<NodeIndex> = graph.base_ids().to_vec();
    let mut visited: HashSet<NodeIndex> = stack.iter().copied().collect();
    let mut parents: HashMap<NodeIndex, usize> = HashMap::new();
    let mut nodes_visited = 0usize;

    while let Some(current) = stack.pop() {
        if let Some(limit) = budget {
            if nodes_visited >= limit {
                return Err(CraftError::SearchExhausted { budget: limit });
            }
        }
        nodes_visited += 1;

        let mut found_now = false;
        for &combo_index in graph.forward(current) {
            let combo = graph.combo(combo_index);
            let partner = combo.partner_of(current);

            if visited.contains(&partner) && !visited.contains(&combo.product) {
                visited.insert(combo.product);
                parents.insert(combo.product, combo_index);
                trace.observe(graph, combo_index);
                stack.push(combo.product);
                if combo.product == target {
                    found_now = true;
                }
            }
        }

        if trace.is_enabled() {
            let frontier = stack.iter().map(|&id| graph.name(id).to_string()).collect();
            trace.record(graph.name(current), frontier, found_now);
        }

        if found_now {
            debug!(
                target_element = graph.name(target),
                nodes_visited, "dfs reached target"
            );
            return Ok(SearchOutcome {
                parents,
                nodes_visited,
            });
        }
    }

    Err(CraftError::NoPathFound(graph.name(target).to_string()))
}
