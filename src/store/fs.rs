use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::StoreError;
use crate::selector::Candidate;
use crate::store::metadata::CheckpointMetadata;
use crate::store::CheckpointStore;

/// Configuration for the filesystem checkpoint store.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FsStoreConfig {
    pub dir: PathBuf,
    pub prefix: String,
}

impl Default for FsStoreConfig {
    fn default() -> Self {
        FsStoreConfig {
            dir: PathBuf::from("checkpoints"),
            prefix: "ckpt".to_string(),
        }
    }
}

/// Filesystem checkpoint store. Each checkpoint is a directory named from
/// (prefix, epoch, score), holding the copied artifact and a metadata.json.
/// A `best` symlink points at the currently retained checkpoint.
pub struct FsStore {
    config: FsStoreConfig,
}

impl FsStore {
    pub fn new(config: FsStoreConfig) -> Self {
        fs::create_dir_all(&config.dir).ok();
        FsStore { config }
    }

    /// Deterministic directory name for a checkpoint: `{prefix}-e{epoch:06}-s{score:.4}`.
    pub fn checkpoint_dir_name(&self, epoch: u64, score: f64) -> String {
        format!("{}-e{:06}-s{:.4}", self.config.prefix, epoch, score)
    }

    /// Load checkpoint metadata from a checkpoint directory.
    pub fn load(&self, dir: &Path) -> Result<CheckpointMetadata, StoreError> {
        let meta_path = dir.join("metadata.json");
        let meta_json =
            fs::read_to_string(&meta_path).map_err(|e| StoreError::MetadataRead {
                path: meta_path.clone(),
                source: e,
            })?;
        serde_json::from_str(&meta_json).map_err(|e| StoreError::MetadataParse {
            path: meta_path,
            source: e,
        })
    }

    /// Resolve the `best` symlink and load the retained checkpoint's metadata.
    pub fn load_best(&self) -> Result<(PathBuf, CheckpointMetadata), StoreError> {
        let best_link = self.config.dir.join("best");
        if !best_link.exists() {
            return Err(StoreError::NoBestSymlink(self.config.dir.clone()));
        }
        let resolved = fs::read_link(&best_link)?;
        let target = if resolved.is_relative() {
            self.config.dir.join(resolved)
        } else {
            resolved
        };
        let metadata = self.load(&target)?;
        Ok((target, metadata))
    }

    /// List all checkpoints sorted by epoch (ascending).
    pub fn list(&self) -> Result<Vec<(PathBuf, CheckpointMetadata)>, StoreError> {
        let name_prefix = format!("{}-e", self.config.prefix);
        let mut results = Vec::new();
        for entry in fs::read_dir(&self.config.dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if !name_str.starts_with(&name_prefix) || name_str.ends_with(".tmp") {
                continue;
            }
            if path.join("metadata.json").exists() {
                let metadata = self.load(&path)?;
                results.push((path, metadata));
            }
        }
        results.sort_by_key(|(_, m)| m.epoch);
        Ok(results)
    }

    fn write_checkpoint(&self, tmp_dir: &Path, candidate: &Candidate) -> Result<(), StoreError> {
        let file_name = candidate
            .artifact
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("artifact"));
        let dest = tmp_dir.join(file_name);
        fs::copy(&candidate.artifact, &dest).map_err(|e| StoreError::Write {
            path: dest,
            source: e,
        })?;

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        let metadata = CheckpointMetadata {
            epoch: candidate.epoch,
            timestamp,
            score: candidate.score,
            metrics: candidate.metrics.clone(),
        };
        let meta_json = serde_json::to_string_pretty(&metadata)?;
        let meta_path = tmp_dir.join("metadata.json");
        fs::write(&meta_path, meta_json).map_err(|e| StoreError::Write {
            path: meta_path,
            source: e,
        })?;
        Ok(())
    }

    /// Update the `best` symlink to point to the given checkpoint directory name.
    fn update_best_symlink(&self, dir_name: &str) -> Result<(), StoreError> {
        let link_path = self.config.dir.join("best");
        // Remove old symlink if it exists
        if link_path.exists() || link_path.symlink_metadata().is_ok() {
            fs::remove_file(&link_path)?;
        }
        std::os::unix::fs::symlink(dir_name, &link_path)?;
        Ok(())
    }
}

impl CheckpointStore for FsStore {
    /// Persist via a `.tmp` directory and an atomic rename. A failed persist
    /// leaves no final directory behind.
    fn persist(&self, candidate: &Candidate) -> Result<PathBuf, StoreError> {
        if !candidate.artifact.is_file() {
            return Err(StoreError::ArtifactMissing(candidate.artifact.clone()));
        }

        let dir_name = self.checkpoint_dir_name(candidate.epoch, candidate.score);
        let tmp_dir = self.config.dir.join(format!("{}.tmp", dir_name));
        let final_dir = self.config.dir.join(&dir_name);

        fs::create_dir_all(&tmp_dir).map_err(|e| StoreError::Write {
            path: tmp_dir.clone(),
            source: e,
        })?;

        if let Err(e) = self.write_checkpoint(&tmp_dir, candidate) {
            let _ = fs::remove_dir_all(&tmp_dir);
            return Err(e);
        }

        // Atomic commit
        if final_dir.exists() {
            fs::remove_dir_all(&final_dir)?;
        }
        if let Err(e) = fs::rename(&tmp_dir, &final_dir) {
            let _ = fs::remove_dir_all(&tmp_dir);
            return Err(StoreError::Write {
                path: final_dir,
                source: e,
            });
        }

        self.update_best_symlink(&dir_name)?;
        Ok(final_dir)
    }

    fn discard(&self, path: &Path) -> Result<(), StoreError> {
        if !path.exists() {
            return Ok(());
        }
        fs::remove_dir_all(path)?;
        Ok(())
    }
}
