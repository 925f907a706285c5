use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Checkpoint metadata written to metadata.json alongside the artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointMetadata {
    pub epoch: u64,
    pub timestamp: u64,
    pub score: f64,
    /// Additional named metrics reported by the training loop at this epoch
    /// (loss, precision, and so on). Purely informational.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metrics: BTreeMap<String, f64>,
}
