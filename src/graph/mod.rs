//! Recipe graph module, the structural backbone of craftpath.
//!
//! Provides the element/combination data model and the immutable
//! bidirectional index the search strategies run against.

pub mod index;
pub mod types;

pub use index::RecipeGraph;
pub use types::{
    Combo, DiscoveredEdge, ElementData, GraphStats, IngredientPair, PairEdge, PartnerUse,
};
