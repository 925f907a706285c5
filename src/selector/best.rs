use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::error::SelectorError;
use crate::store::CheckpointStore;

/// One scored observation offered to the selector: the epoch it came from, a
/// real-valued score (higher is better), and an opaque reference to the
/// artifact the external training loop produced for that epoch.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub epoch: u64,
    pub score: f64,
    pub artifact: PathBuf,
    pub metrics: BTreeMap<String, f64>,
}

impl Candidate {
    pub fn new(epoch: u64, score: f64, artifact: PathBuf) -> Self {
        Candidate {
            epoch,
            score,
            artifact,
            metrics: BTreeMap::new(),
        }
    }

    pub fn with_metrics(mut self, metrics: BTreeMap<String, f64>) -> Self {
        self.metrics = metrics;
        self
    }
}

/// The checkpoint currently retained as best.
#[derive(Debug, Clone, PartialEq)]
pub struct BestCheckpoint {
    pub epoch: u64,
    pub score: f64,
    pub path: PathBuf,
}

/// Outcome of a single `offer` call.
#[derive(Debug)]
pub enum Offer {
    /// The candidate improved on the running best and was persisted.
    Saved {
        path: PathBuf,
        /// The previous best, if there was one. Already removed from storage
        /// unless the selector was configured to keep superseded checkpoints.
        replaced: Option<BestCheckpoint>,
    },
    /// The candidate did not improve on the running best; no side effect.
    Skipped { best: BestCheckpoint },
}

/// Selector behaviour knobs.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Keep checkpoints that a later, better candidate supersedes. Off by
    /// default: only the running best is retained.
    pub keep_superseded: bool,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        SelectorConfig {
            keep_superseded: false,
        }
    }
}

/// Best-checkpoint selector. Persists a candidate only when its score strictly
/// exceeds the best score seen so far; ties and regressions are skipped.
///
/// The in-memory best is updated only after the store has committed the
/// checkpoint, so the selector never claims a best that was not saved. Each
/// training run owns its own selector; there is no shared state.
pub struct BestSelector<S: CheckpointStore> {
    store: S,
    config: SelectorConfig,
    best: Option<BestCheckpoint>,
}

impl<S: CheckpointStore> BestSelector<S> {
    pub fn new(store: S, config: SelectorConfig) -> Self {
        BestSelector {
            store,
            config,
            best: None,
        }
    }

    /// The currently retained best, if any candidate has been saved yet.
    pub fn best(&self) -> Option<&BestCheckpoint> {
        self.best.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Offer a candidate. Saves it iff its score strictly exceeds the running
    /// best; otherwise skips with no side effect.
    ///
    /// A persistence failure surfaces as an error and leaves the running best
    /// unchanged. There is no automatic retry.
    pub fn offer(&mut self, candidate: &Candidate) -> Result<Offer, SelectorError> {
        if !candidate.score.is_finite() {
            return Err(SelectorError::NonFiniteScore {
                epoch: candidate.epoch,
                score: candidate.score,
            });
        }

        if let Some(best) = &self.best {
            if candidate.score <= best.score {
                debug!(
                    epoch = candidate.epoch,
                    score = candidate.score,
                    best_score = best.score,
                    best_epoch = best.epoch,
                    "skipping candidate"
                );
                return Ok(Offer::Skipped { best: best.clone() });
            }
        }

        // Write first; commit the in-memory best only once the store succeeds.
        let path = self.store.persist(candidate)?;

        let replaced = self.best.replace(BestCheckpoint {
            epoch: candidate.epoch,
            score: candidate.score,
            path: path.clone(),
        });

        if let Some(old) = &replaced {
            if !self.config.keep_superseded {
                if let Err(e) = self.store.discard(&old.path) {
                    warn!(
                        path = %old.path.display(),
                        error = %e,
                        "failed to remove superseded checkpoint"
                    );
                }
            }
        }

        info!(
            epoch = candidate.epoch,
            score = candidate.score,
            path = %path.display(),
            "checkpoint saved"
        );
        Ok(Offer::Saved { path, replaced })
    }
}
