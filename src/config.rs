//! Engine configuration.
//!
//! Everything has a sensible default; a TOML file can override the
//! base element list, the default algorithm, and the node budget.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::search::Algorithm;

/// Configuration for building graphs and running searches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Elements available with zero combination steps, in order.
    pub base_elements: Vec<String>,
    /// Algorithm used when a request does not name one.
    pub default_algorithm: Algorithm,
    /// Upper bound on visited elements per search call. `None` means unbounded.
    pub node_budget: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_elements: vec![
                "Air".to_string(),
                "Earth".to_string(),
                "Fire".to_string(),
                "Water".to_string(),
            ],
            default_algorithm: Algorithm::Bfs,
            node_budget: None,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}
