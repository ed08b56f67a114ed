//! Derivation trees.
//!
//! A derivation tree records how a target was produced from base
//! elements. Combinations are strictly binary, so the tree is a tagged
//! `Leaf | Pair` variant rather than a variable-length children list;
//! the binary invariant holds at the type level.

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::graph::RecipeGraph;

/// Recursion cap for reconstruction. Parent maps produced by the
/// strategies are acyclic, but hand-built maps may not be.
const DEPTH_LIMIT: usize = 150;

/// A binary derivation tree node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DerivationNode {
    /// A base element, or an element with no recorded combination.
    Leaf { element: String },
    /// An element produced by combining the two child derivations.
    Pair {
        element: String,
        left: Box<DerivationNode>,
        right: Box<DerivationNode>,
    },
}

impl DerivationNode {
    pub fn leaf(element: impl Into<String>) -> Self {
        DerivationNode::Leaf {
            element: element.into(),
        }
    }

    pub fn pair(element: impl Into<String>, left: DerivationNode, right: DerivationNode) -> Self {
        DerivationNode::Pair {
            element: element.into(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn element(&self) -> &str {
        match self {
            DerivationNode::Leaf { element } => element,
            DerivationNode::Pair { element, .. } => element,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, DerivationNode::Leaf { .. })
    }

    /// Number of combination steps on the longest root-to-leaf chain.
    pub fn depth(&self) -> usize {
        match self {
            DerivationNode::Leaf { .. } => 0,
            DerivationNode::Pair { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// All leaf element names, left to right.
    pub fn leaves(&self) -> Vec<&str> {
        match self {
            DerivationNode::Leaf { element } => vec![element],
            DerivationNode::Pair { left, right, .. } => {
                let mut names = left.leaves();
                names.extend(right.leaves());
                names
            }
        }
    }

    /// Canonical structural signature.
    ///
    /// Child signatures are sorted before joining, so two trees that
    /// differ only in ingredient order get the same signature. Used
    /// for structural deduplication.
    pub fn signature(&self) -> String {
        match self {
            DerivationNode::Leaf { element } => element.clone(),
            DerivationNode::Pair { element, left, right } => {
                let mut first = left.signature();
                let mut second = right.signature();
                if second < first {
                    std::mem::swap(&mut first, &mut second);
                }
                format!("{}({}|{})", element, first, second)
            }
        }
    }
}

/// Build a derivation tree from a parent map.
///
/// An element that is a base element, or that has no recorded
/// combination, becomes a `Leaf`. The missing-parent case is a
/// deliberate documented fallback, not error masking: reconstruction
/// never fails, and a property test pins down that every leaf is
/// either base or parentless.
pub fn reconstruct(
    graph: &RecipeGraph,
    parents: &HashMap<NodeIndex, usize>,
    start: NodeIndex,
) -> DerivationNode {
    let mut on_stack = HashSet::new();
    reconstruct_inner(graph, parents, start, &mut on_stack, 0)
}

fn reconstruct_inner(
    graph: &RecipeGraph,
    parents: &HashMap<NodeIndex, usize>,
    id: NodeIndex,
    on_stack: &mut HashSet<NodeIndex>,
    depth: usize,
) -> DerivationNode {
    let name = graph.name(id);

    if graph.is_base(id) || depth >= DEPTH_LIMIT {
        return DerivationNode::leaf(name);
    }
    let Some(&combo_index) = parents.get(&id) else {
        return DerivationNode::leaf(name);
    };
    if !on_stack.insert(id) {
        // Cycle in the parent map; cut the branch here.
        return DerivationNode::leaf(name);
    }

    let combo = *graph.combo(combo_index);
    let left = reconstruct_inner(graph, parents, combo.a, on_stack, depth + 1);
    let right = reconstruct_inner(graph, parents, combo.b, on_stack, depth + 1);
    on_stack.remove(&id);

    DerivationNode::pair(name, left, right)
}
