//! Step trace recording.
//!
//! When tracing is enabled a strategy emits one [`StepRecord`] per
//! expanded element, carrying the frontier at that moment and every
//! combination edge discovered up to and including that step. Each
//! record is a self-contained snapshot: seeking to any index replays
//! the search state without folding earlier records. Disabled tracing
//! records nothing and costs only a branch per call; the search
//! result itself is identical either way.

use serde::{Deserialize, Serialize};

use crate::graph::{DiscoveredEdge, RecipeGraph};

/// One expansion step of a search, in name form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    /// 1-based step number.
    pub step: usize,
    /// The element expanded at this step.
    pub element: String,
    /// Frontier contents after expanding, in queue order.
    pub frontier: Vec<String>,
    /// Edges discovered so far, one per product, in discovery order.
    pub discovered: Vec<DiscoveredEdge>,
    /// Whether the target was admitted at this step.
    pub target_found: bool,
}

/// Accumulates step records during a search.
#[derive(Debug, Default)]
pub struct StepTrace {
    enabled: bool,
    /// Running discovered-edge map, keyed by product (first wins).
    discovered: Vec<DiscoveredEdge>,
    records: Vec<StepRecord>,
}

impl StepTrace {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::default()
        }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Note a discovered combination edge. One edge per product; a
    /// product discovered again keeps its first edge. No-op when
    /// disabled.
    pub fn observe(&mut self, graph: &RecipeGraph, combo_index: usize) {
        if !self.enabled {
            return;
        }
        let edge = graph.edge_record(combo_index);
        if self.discovered.iter().all(|known| known.product != edge.product) {
            self.discovered.push(edge);
        }
    }

    /// Close out one expansion step with a snapshot of everything
    /// discovered so far. No-op when disabled.
    pub fn record(&mut self, element: &str, frontier: Vec<String>, target_found: bool) {
        if !self.enabled {
            return;
        }
        self.records.push(StepRecord {
            step: self.records.len() + 1,
            element: element.to_string(),
            frontier,
            discovered: self.discovered.clone(),
            target_found,
        });
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<StepRecord> {
        self.records
    }
}
