//! Multi-path enumeration.
//!
//! Explores from the target down toward the bases, branching whenever
//! an element has alternative recipes. Each exploration carries its
//! own recipe choices and a queue of elements still needing one; a
//! branch clones the exploration before diverging. Completed
//! explorations are reconstructed into trees, kept only when every
//! leaf is a base element, and deduplicated by structural signature.
//!
//! The first alternative of each element continues the current
//! exploration while later alternatives go to the back of the line, so
//! enumeration order follows table order and stays reproducible.
//!
//! Enumeration steps feed the same [`StepTrace`] as the primary
//! search: one record per popped pending element, so playback covers
//! the alternative explorations too.

use petgraph::graph::NodeIndex;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

use crate::graph::RecipeGraph;
use crate::search::trace::StepTrace;
use crate::tree::{reconstruct, DerivationNode};

/// Active explorations are capped at this multiple of the requested
/// path count to bound memory on heavily branching tables.
const ACTIVE_FACTOR: usize = 3;

#[derive(Debug, Clone)]
struct Exploration {
    /// Recipe chosen per element so far.
    chosen: HashMap<NodeIndex, usize>,
    /// Elements still awaiting a recipe choice.
    pending: VecDeque<NodeIndex>,
}

/// Enumerate distinct derivation trees for `target`, appending to
/// `trees` until it holds `max_paths` entries or the alternatives run
/// out. `seen` carries signatures of trees already collected; newly
/// accepted signatures are added to it.
///
/// Returns the number of elements expanded and whether the budget cut
/// enumeration short.
pub fn enumerate(
    graph: &RecipeGraph,
    target: NodeIndex,
    max_paths: usize,
    budget: Option<usize>,
    seen: &mut HashSet<String>,
    trees: &mut Vec<DerivationNode>,
    trace: &mut StepTrace,
) -> (usize, bool) {
    let cap = max_paths.saturating_mul(ACTIVE_FACTOR);
    let mut active: VecDeque<Exploration> = VecDeque::from([Exploration {
        chosen: HashMap::new(),
        pending: VecDeque::from([target]),
    }]);
    let mut nodes_visited = 0usize;

    while let Some(mut exploration) = active.pop_front() {
        if trees.len() >= max_paths {
            break;
        }

        let Some(node) = exploration.pending.pop_front() else {
            // All choices made; keep the tree if it is fully grounded.
            let tree = reconstruct(graph, &exploration.chosen, target);
            let grounded = tree
                .leaves()
                .iter()
                .all(|&leaf| graph.element(leaf).is_some_and(|id| graph.is_base(id)));
            if grounded && seen.insert(tree.signature()) {
                trees.push(tree);
            }
            continue;
        };

        if let Some(limit) = budget {
            if nodes_visited >= limit {
                debug!(
                    target_element = graph.name(target),
                    collected = trees.len(),
                    "enumeration budget exhausted"
                );
                return (nodes_visited, true);
            }
        }
        nodes_visited += 1;

        if graph.is_base(node) || exploration.chosen.contains_key(&node) {
            if trace.is_enabled() {
                let frontier = pending_names(graph, &exploration);
                trace.record(graph.name(node), frontier, false);
            }
            active.push_front(exploration);
            continue;
        }

        let recipes = graph.reverse(node);
        let Some(&first) = recipes.first() else {
            // Underivable element; the whole exploration is dead.
            if trace.is_enabled() {
                trace.record(graph.name(node), Vec::new(), false);
            }
            continue;
        };
        trace.observe(graph, first);

        for &combo_index in &recipes[1..] {
            if active.len() >= cap {
                break;
            }
            let mut branch = exploration.clone();
            branch.chosen.insert(node, combo_index);
            let combo = graph.combo(combo_index);
            branch.pending.push_back(combo.a);
            branch.pending.push_back(combo.b);
            trace.observe(graph, combo_index);
            active.push_back(branch);
        }

        exploration.chosen.insert(node, first);
        let combo = *graph.combo(first);
        exploration.pending.push_back(combo.a);
        exploration.pending.push_back(combo.b);
        if trace.is_enabled() {
            let frontier = pending_names(graph, &exploration);
            trace.record(graph.name(node), frontier, false);
        }
        active.push_front(exploration);
    }

    (nodes_visited, false)
}

fn pending_names(graph: &RecipeGraph, exploration: &Exploration) -> Vec<String> {
    exploration
        .pending
        .iter()
        .map(|&id| graph.name(id).to_string())
        .collect()
}
