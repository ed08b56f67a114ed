//! The recipe graph index.
//!
//! Uses petgraph to store elements and their combination edges, with
//! ordered forward and reverse lookup indices layered on top. Built
//! once per table, immutable afterwards; safe to share read-only
//! across concurrent searches.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;
use tracing::debug;

use super::types::*;
use crate::error::{CraftError, Result};
use crate::table::RecipeTable;

/// Bidirectional lookup over a validated recipe table.
///
/// Forward: ingredient → combinations it participates in.
/// Reverse: product → alternative combinations producing it.
/// Both indices preserve table order, so "first discovered wins" is
/// reproducible across runs.
#[derive(Debug)]
pub struct RecipeGraph {
    /// Element nodes plus one ingredient→product edge per ingredient.
    graph: DiGraph<ElementData, PairEdge>,
    /// Index: element name -> node index.
    name_index: HashMap<String, NodeIndex>,
    /// Base element ids, in configured order.
    base_ids: Vec<NodeIndex>,
    /// All combinations, in table order.
    combos: Vec<Combo>,
    /// Index: ingredient -> combination indices, in table order.
    forward: HashMap<NodeIndex, Vec<usize>>,
    /// Index: product -> combination indices, in table order.
    reverse: HashMap<NodeIndex, Vec<usize>>,
}

impl RecipeGraph {
    /// Build the graph from a table and an ordered base element list.
    ///
    /// Base elements are interned first so search seeds are stable.
    /// Fails with a graph error on an empty table, a non-binary row,
    /// or an empty base list.
    pub fn build(table: &RecipeTable, base_elements: &[String]) -> Result<Self> {
        let combinations = table.validate()?;
        if base_elements.is_empty() {
            return Err(CraftError::Graph("base element list is empty".to_string()));
        }

        let mut graph = DiGraph::new();
        let mut name_index: HashMap<String, NodeIndex> = HashMap::new();
        let mut base_ids = Vec::with_capacity(base_elements.len());

        for name in base_elements {
            let id = *name_index
                .entry(name.clone())
                .or_insert_with(|| graph.add_node(ElementData {
                    name: name.clone(),
                    base: true,
                }));
            if !base_ids.contains(&id) {
                base_ids.push(id);
            }
        }

        let mut intern = |graph: &mut DiGraph<ElementData, PairEdge>, name: &str| {
            *name_index.entry(name.to_string()).or_insert_with(|| {
                graph.add_node(ElementData {
                    name: name.to_string(),
                    base: false,
                })
            })
        };

        let mut combos = Vec::with_capacity(combinations.len());
        let mut forward: HashMap<NodeIndex, Vec<usize>> = HashMap::new();
        let mut reverse: HashMap<NodeIndex, Vec<usize>> = HashMap::new();

        for combination in &combinations {
            let product = intern(&mut graph, &combination.product);
            let a = intern(&mut graph, &combination.ingredient_a);
            let b = intern(&mut graph, &combination.ingredient_b);

            let index = combos.len();
            combos.push(Combo { product, a, b });

            // A+B=C and B+A=C are the same rule; one edge per ingredient.
            graph.add_edge(a, product, PairEdge { partner: b, combo: index });
            graph.add_edge(b, product, PairEdge { partner: a, combo: index });

            forward.entry(a).or_default().push(index);
            if b != a {
                forward.entry(b).or_default().push(index);
            }
            reverse.entry(product).or_default().push(index);
        }

        debug!(
            elements = graph.node_count(),
            combinations = combos.len(),
            base = base_ids.len(),
            "recipe graph built"
        );

        Ok(Self {
            graph,
            name_index,
            base_ids,
            combos,
            forward,
            reverse,
        })
    }

    // ─── Lookup ─────────────────────────────────────────────────

    /// Node index for an element name, if it exists in the graph.
    pub fn element(&self, name: &str) -> Option<NodeIndex> {
        self.name_index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.name_index.contains_key(name)
    }

    /// Element name for a node index.
    pub fn name(&self, id: NodeIndex) -> &str {
        &self.graph[id].name
    }

    pub fn is_base(&self, id: NodeIndex) -> bool {
        self.graph[id].base
    }

    /// Base element ids in configured order.
    pub fn base_ids(&self) -> &[NodeIndex] {
        &self.base_ids
    }

    /// Combinations `id` participates in as an ingredient, table order.
    pub fn forward(&self, id: NodeIndex) -> &[usize] {
        self.forward.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Combinations producing `id`, table order.
    pub fn reverse(&self, id: NodeIndex) -> &[usize] {
        self.reverse.get(&id).map_or(&[], Vec::as_slice)
    }

    pub fn combo(&self, index: usize) -> &Combo {
        &self.combos[index]
    }

    /// A discovered-edge record for a combination, in name form.
    pub fn edge_record(&self, index: usize) -> DiscoveredEdge {
        let combo = &self.combos[index];
        DiscoveredEdge {
            product: self.name(combo.product).to_string(),
            ingredient_a: self.name(combo.a).to_string(),
            ingredient_b: self.name(combo.b).to_string(),
        }
    }

    // ─── Inspection Queries ─────────────────────────────────────

    /// All alternative recipes for a product. Empty if the element is
    /// unknown or nothing produces it.
    pub fn recipes_for(&self, name: &str) -> Vec<IngredientPair> {
        let Some(id) = self.element(name) else {
            return Vec::new();
        };
        self.reverse(id)
            .iter()
            .map(|&index| {
                let combo = &self.combos[index];
                IngredientPair {
                    ingredient_a: self.name(combo.a).to_string(),
                    ingredient_b: self.name(combo.b).to_string(),
                }
            })
            .collect()
    }

    /// All combinations an element participates in as an ingredient.
    pub fn uses(&self, name: &str) -> Vec<PartnerUse> {
        let Some(id) = self.element(name) else {
            return Vec::new();
        };
        // petgraph iterates edges most-recent-first; reverse to table order.
        let mut uses: Vec<PartnerUse> = self
            .graph
            .edges_directed(id, Direction::Outgoing)
            .map(|edge| PartnerUse {
                partner: self.name(edge.weight().partner).to_string(),
                product: self.name(edge.target()).to_string(),
            })
            .collect();
        uses.reverse();
        uses
    }

    // ─── Stats ──────────────────────────────────────────────────

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            elements: self.graph.node_count(),
            base_elements: self.base_ids.len(),
            combinations: self.combos.len(),
        }
    }
}
