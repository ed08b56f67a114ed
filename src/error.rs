//! Error types for craftpath.
//!
//! Splits fail-fast validation errors from the expected reachability
//! outcomes a well-formed search can produce. None of these are
//! retried internally; callers decide what to do.

use thiserror::Error;

/// All errors surfaced by the engine.
#[derive(Debug, Error)]
pub enum CraftError {
    /// The recipe table is empty or structurally invalid.
    #[error("invalid recipe table: {0}")]
    Graph(String),

    /// The target element does not appear in the table and is not a base element.
    #[error("element '{0}' is not in the recipe table")]
    TargetNotFound(String),

    /// The target exists but the frontier exhausted without reaching it.
    #[error("no derivation path from the base elements to '{0}'")]
    NoPathFound(String),

    /// A request parameter is outside its valid range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Derivation trees could not be unified.
    #[error("cannot merge trees: {0}")]
    Merge(String),

    /// The node-visit budget ran out before any result existed.
    #[error("search exhausted its budget of {budget} visited elements")]
    SearchExhausted { budget: usize },

    /// Failed to read a table or config file.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Failed to parse a JSON recipe table.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Failed to parse a TOML config file.
    #[error(transparent)]
    Config(#[from] toml::de::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CraftError>;
