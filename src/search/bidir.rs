//! Bidirectional derivation search.
//!
//! Runs a forward wave from the base elements and a backward wave from
//! the target at the same time, alternating one expansion step per
//! side. The backward wave walks the reverse combination index and
//! tracks, for every element it reaches, which combination pulled it
//! in. When the waves meet, the backward chain from the meeting point
//! to the target is grafted onto the forward parent map and remaining
//! partner gaps are filled by a scoped forward closure.
//!
//! Combinations need both ingredients, so a meeting alone does not
//! prove derivability. Each meeting produces a candidate parent map
//! that is accepted only if its reconstructed tree grounds out in base
//! elements; ungrounded candidates are discarded and both waves keep
//! going. A derivable target is always found eventually because the
//! forward wave alone admits everything derivable.

use petgraph::graph::NodeIndex;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

use crate::error::{CraftError, Result};
use crate::graph::RecipeGraph;
use crate::search::trace::StepTrace;
use crate::search::SearchOutcome;
use crate::tree::reconstruct;

pub fn run(
    graph: &RecipeGraph,
    target: NodeIndex,
    budget: Option<usize>,
    trace: &mut StepTrace,
) -> Result<SearchOutcome> {
    let mut fwd_queue: VecDeque<NodeIndex> = graph.base_ids().iter().copied().collect();
    let mut fwd_visited: HashSet<NodeIndex> = fwd_queue.iter().copied().collect();
    let mut parents: HashMap<NodeIndex, usize> = HashMap::new();

    let mut back_queue: VecDeque<NodeIndex> = VecDeque::from([target]);
    let mut back_visited: HashSet<NodeIndex> = HashSet::from([target]);
    // ingredient -> (combination, product it feeds) along the backward wave.
    let mut back_chain: HashMap<NodeIndex, (usize, NodeIndex)> = HashMap::new();

    let mut nodes_visited = 0usize;

    loop {
        if fwd_queue.is_empty() && back_queue.is_empty() {
            return Err(CraftError::NoPathFound(graph.name(target).to_string()));
        }

        if let Some(current) = fwd_queue.pop_front() {
            if let Some(limit) = budget {
                if nodes_visited >= limit {
                    return Err(CraftError::SearchExhausted { budget: limit });
                }
            }
            nodes_visited += 1;

            let mut meeting = None;
            for &combo_index in graph.forward(current) {
                let combo = graph.combo(combo_index);
                let partner = combo.partner_of(current);

                if fwd_visited.contains(&partner) && !fwd_visited.contains(&combo.product) {
                    fwd_visited.insert(combo.product);
                    parents.insert(combo.product, combo_index);
                    trace.observe(graph, combo_index);
                    fwd_queue.push_back(combo.product);
                    if combo.product == target || back_visited.contains(&combo.product) {
                        meeting = Some(combo.product);
                    }
                }
            }

            let outcome = meeting
                .and_then(|m| try_finish(graph, m, target, &parents, &back_chain, nodes_visited));

            if trace.is_enabled() {
                let frontier = fwd_queue.iter().map(|&id| graph.name(id).to_string()).collect();
                trace.record(graph.name(current), frontier, outcome.is_some());
            }

            if let Some(outcome) = outcome {
                return Ok(outcome);
            }
        }

        if let Some(current) = back_queue.pop_front() {
            if let Some(limit) = budget {
                if nodes_visited >= limit {
                    return Err(CraftError::SearchExhausted { budget: limit });
                }
            }
            nodes_visited += 1;

            let mut meeting = None;
            for &combo_index in graph.reverse(current) {
                let combo = *graph.combo(combo_index);
                trace.observe(graph, combo_index);
                for ingredient in [combo.a, combo.b] {
                    if back_visited.insert(ingredient) {
                        back_chain.insert(ingredient, (combo_index, current));
                        if fwd_visited.contains(&ingredient) {
                            meeting = Some(ingredient);
                        } else {
                            back_queue.push_back(ingredient);
                        }
                    }
                }
            }

            let outcome = meeting
                .and_then(|m| try_finish(graph, m, target, &parents, &back_chain, nodes_visited));

            if trace.is_enabled() {
                let frontier = back_queue.iter().map(|&id| graph.name(id).to_string()).collect();
                trace.record(graph.name(current), frontier, outcome.is_some());
            }

            if let Some(outcome) = outcome {
                return Ok(outcome);
            }
        }
    }
}

/// Graft the backward chain from the meeting point onto a copy of the
/// forward parent map, fill partner gaps along it, and accept the
/// candidate only if its tree grounds out in base elements.
fn try_finish(
    graph: &RecipeGraph,
    meeting: NodeIndex,
    target: NodeIndex,
    parents: &HashMap<NodeIndex, usize>,
    back_chain: &HashMap<NodeIndex, (usize, NodeIndex)>,
    nodes_visited: usize,
) -> Option<SearchOutcome> {
    let mut candidate = parents.clone();
    let mut node = meeting;
    while node != target {
        let Some(&(combo_index, product)) = back_chain.get(&node) else {
            break;
        };
        candidate.entry(product).or_insert(combo_index);
        node = product;
    }
    if !candidate.contains_key(&target) {
        return None;
    }

    fill_gaps(graph, &mut candidate);

    let tree = reconstruct(graph, &candidate, target);
    let grounded = tree
        .leaves()
        .iter()
        .all(|&leaf| graph.element(leaf).is_some_and(|id| graph.is_base(id)));
    if !grounded {
        return None;
    }

    debug!(
        meeting = graph.name(meeting),
        target_element = graph.name(target),
        nodes_visited,
        "bidirectional waves met"
    );
    Some(SearchOutcome {
        parents: candidate,
        nodes_visited,
    })
}

/// Forward closure seeded with the bases and everything already in the
/// parent map; records a first combination for each newly reachable
/// element. Grafted combinations may reference partners the forward
/// wave never expanded, and those partners need derivations of their own.
fn fill_gaps(graph: &RecipeGraph, parents: &mut HashMap<NodeIndex, usize>) {
    let mut visited: HashSet<NodeIndex> = graph.base_ids().iter().copied().collect();
    visited.extend(parents.keys().copied());
    let mut queue: VecDeque<NodeIndex> = visited.iter().copied().collect();

    while let Some(current) = queue.pop_front() {
        for &combo_index in graph.forward(current) {
            let combo = graph.combo(combo_index);
            let partner = combo.partner_of(current);

            if visited.contains(&partner) && !visited.contains(&combo.product) {
                visited.insert(combo.product);
                parents.insert(combo.product, combo_index);
                queue.push_back(combo.product);
            }
        }
    }
}
