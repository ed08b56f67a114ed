//! Core types for the recipe graph.
//!
//! Defines the element and combination data stored in the graph and
//! the record shapes returned by inspection queries and traces.

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Data stored in a graph node: one element of the combination universe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementData {
    /// The element name (string identity).
    pub name: String,
    /// Whether this element is available at zero cost.
    pub base: bool,
}

/// Data stored on an ingredient→product edge.
///
/// Each binary combination contributes two edges (one per ingredient);
/// the edge remembers the other ingredient and the combination it
/// belongs to.
#[derive(Debug, Clone, Copy)]
pub struct PairEdge {
    /// The other ingredient of the combination.
    pub partner: NodeIndex,
    /// Index into the graph's ordered combination list.
    pub combo: usize,
}

/// An interned combination: two ingredients producing one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Combo {
    pub product: NodeIndex,
    pub a: NodeIndex,
    pub b: NodeIndex,
}

impl Combo {
    /// The ingredient paired with `id` in this combination.
    ///
    /// For self-combinations (`a == b`) the partner is the element itself.
    pub fn partner_of(&self, id: NodeIndex) -> NodeIndex {
        if self.a == id {
            self.b
        } else {
            self.a
        }
    }
}

/// A combination discovered during search, in name form.
///
/// One flat record per edge; product plus both ingredients, always.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredEdge {
    pub product: String,
    pub ingredient_a: String,
    pub ingredient_b: String,
}

impl fmt::Display for DiscoveredEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} + {} -> {}",
            self.ingredient_a, self.ingredient_b, self.product
        )
    }
}

/// An alternative recipe for a product, in name form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientPair {
    pub ingredient_a: String,
    pub ingredient_b: String,
}

/// A combination an element participates in as an ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerUse {
    /// The other ingredient needed alongside this element.
    pub partner: String,
    /// What the pair produces.
    pub product: String,
}

/// Statistics about a built recipe graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphStats {
    pub elements: usize,
    pub base_elements: usize,
    pub combinations: usize,
}

impl fmt::Display for GraphStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} elements ({} base), {} combinations",
            self.elements, self.base_elements, self.combinations
        )
    }
}
