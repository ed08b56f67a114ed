//! # craftpath
//!
//! Derivation search over binary recipe tables.
//!
//! craftpath answers one question: given a table of rules of the form
//! `A + B = C` and a handful of base elements, how can a target element
//! be derived? Search runs over a pre-built graph index and returns
//! binary derivation trees whose leaves are base elements.
//!
//! ## Key Features
//!
//! - **Graph-based**: Combinations indexed forward and reverse before searching
//! - **Deterministic**: Table order fixes every tie-break, results are reproducible
//! - **Multiple strategies**: BFS (depth-minimal), DFS, bidirectional
//! - **Multi-path**: Enumerate structurally distinct derivations of one target
//!
//! ## Quick Start
//!
//! ```rust
//! use craftpath::{find, RecipeGraph, RecipeTable, SearchRequest};
//!
//! let table = RecipeTable::from_triples(vec![
//!     ("Rain", "Air", "Water"),
//!     ("Plant", "Rain", "Earth"),
//! ]);
//! let base: Vec<String> = ["Air", "Earth", "Fire", "Water"]
//!     .iter().map(|s| s.to_string()).collect();
//! let graph = RecipeGraph::build(&table, &base).unwrap();
//!
//! let report = find(&graph, &SearchRequest::new("Plant")).unwrap();
//! assert_eq!(report.trees[0].element(), "Plant");
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod merge;
pub mod search;
pub mod table;
pub mod tree;

// Re-exports for convenience
pub use error::{CraftError, Result};

// Graph re-exports
pub use graph::{DiscoveredEdge, GraphStats, IngredientPair, PartnerUse, RecipeGraph};
pub use table::{Combination, RecipeRow, RecipeTable};

// Search surface
pub use config::EngineConfig;
pub use search::{find, Algorithm, SearchReport, SearchRequest, StepRecord};

// Trees
pub use merge::{merge_trees, MergedNode};
pub use tree::DerivationNode;
