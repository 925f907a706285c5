use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::selector::Candidate;

/// One line of the record stream an external training loop emits: the epoch
/// just finished, its validation score, and the path of the artifact written
/// for that epoch. Extra named metrics ride along into checkpoint metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochRecord {
    pub epoch: u64,
    pub score: f64,
    pub artifact: PathBuf,
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
}

impl EpochRecord {
    pub fn into_candidate(self) -> Candidate {
        Candidate::new(self.epoch, self.score, self.artifact).with_metrics(self.metrics)
    }
}
