mod fs;
mod metadata;

pub use fs::{FsStore, FsStoreConfig};
pub use metadata::CheckpointMetadata;

use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::selector::Candidate;

/// Persistence seam for the selector. Implementations decide where and how a
/// candidate's artifact lands; the selector only cares that `persist` either
/// durably commits the checkpoint or fails without leaving one behind.
pub trait CheckpointStore {
    /// Persist the candidate's artifact and metadata, returning the committed
    /// checkpoint location.
    fn persist(&self, candidate: &Candidate) -> Result<PathBuf, StoreError>;

    /// Remove a previously persisted checkpoint. Removing a location that no
    /// longer exists is not an error.
    fn discard(&self, path: &Path) -> Result<(), StoreError>;
}
