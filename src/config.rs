//! Compiler configuration
//!
//! Configured once when the registry is constructed, read-only afterwards.
//! Loaded from JSON:
//!
//! ```json
//! { "merge_order": "descendant_wins", "inherit_behavior": true }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::schema::{SchemaError, SchemaResult};

/// Which definition survives when an entity and its ancestor declare the
/// same field name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeOrder {
    /// Ancestor fields are merged over the descendant's own
    #[default]
    AncestorWins,
    /// The most-derived definition is kept
    DescendantWins,
}

/// Configuration for schema assembly
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    /// Field collision rule across the inheritance chain.
    pub merge_order: MergeOrder,

    /// Whether ancestors contribute virtuals, methods and statics.
    ///
    /// Default is `false`: only the requested entity's own behavior is
    /// attached. When enabled, the entity's own behavior still wins on
    /// name collisions.
    pub inherit_behavior: bool,
}

impl CompilerConfig {
    /// Parse configuration from a JSON string
    pub fn from_json_str(content: &str) -> SchemaResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| SchemaError::InvalidConfig(format!("Invalid JSON: {}", e)))
    }

    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> SchemaResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::InvalidConfig(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        Self::from_json_str(&content)
    }
}
