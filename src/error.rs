use std::path::PathBuf;

/// Errors that can occur while persisting or reading checkpoints.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("artifact not found: {0}")]
    ArtifactMissing(PathBuf),

    #[error("no 'best' symlink found in {0}")]
    NoBestSymlink(PathBuf),

    #[error("failed to write checkpoint to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read metadata from {path}: {source}")]
    MetadataRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse metadata from {path}: {source}")]
    MetadataParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur when offering a candidate to the selector.
#[derive(Debug, thiserror::Error)]
pub enum SelectorError {
    #[error("candidate score for epoch {epoch} is not finite: {score}")]
    NonFiniteScore { epoch: u64, score: f64 },

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors that can occur while consuming an epoch-record stream.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("failed to read record stream at line {line}: {source}")]
    StreamRead { line: usize, source: std::io::Error },

    #[error("malformed record at line {line}: {source}")]
    RecordParse {
        line: usize,
        source: serde_json::Error,
    },

    #[error("selector error: {0}")]
    Selector(#[from] SelectorError),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
