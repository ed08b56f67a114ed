//! Derivation tree merging.
//!
//! Folds several derivation trees for the same target into one
//! n-ary overview tree. Children with the same element name are
//! unified recursively, so the merged tree shows every ingredient
//! role an element plays across the alternatives without repeating
//! it per alternative. The merged form is presentational; it is not
//! a valid derivation and cannot be searched further.

use serde::{Deserialize, Serialize};

use crate::error::{CraftError, Result};
use crate::tree::DerivationNode;

/// A node of the merged overview tree. Child count is unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedNode {
    pub element: String,
    pub children: Vec<MergedNode>,
}

impl MergedNode {
    fn leaf(element: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            children: Vec::new(),
        }
    }

    /// Total node count, root included.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(MergedNode::size).sum::<usize>()
    }

    /// Fold one binary derivation into this node. Children are matched
    /// by element name; first-seen order is kept.
    fn absorb(&mut self, tree: &DerivationNode) {
        let DerivationNode::Pair { left, right, .. } = tree else {
            return;
        };
        for branch in [left.as_ref(), right.as_ref()] {
            match self
                .children
                .iter_mut()
                .find(|child| child.element == branch.element())
            {
                Some(child) => child.absorb(branch),
                None => {
                    let mut child = MergedNode::leaf(branch.element());
                    child.absorb(branch);
                    self.children.push(child);
                }
            }
        }
    }
}

/// Merge derivation trees for one target into a single overview tree.
///
/// Fails on an empty slice and on trees whose roots name different
/// elements.
pub fn merge_trees(trees: &[DerivationNode]) -> Result<MergedNode> {
    let Some(first) = trees.first() else {
        return Err(CraftError::Merge("no trees to merge".to_string()));
    };
    let root_element = first.element();

    let mut merged = MergedNode::leaf(root_element);
    for tree in trees {
        if tree.element() != root_element {
            return Err(CraftError::Merge(format!(
                "root mismatch: '{}' vs '{}'",
                root_element,
                tree.element()
            )));
        }
        merged.absorb(tree);
    }
    Ok(merged)
}
