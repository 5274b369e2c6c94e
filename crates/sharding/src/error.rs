use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShardError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed input {}: {reason}", path.display())]
    MalformedInput { path: PathBuf, reason: String },

    #[error("{}:{line}: user {uid} has unrecognized region {region}", path.display())]
    UnrecognizedRegion {
        path: PathBuf,
        line: usize,
        uid: String,
        region: String,
    },

    #[error("{}:{line}: user {uid} is not assigned to any shard", path.display())]
    UnassignedKey {
        path: PathBuf,
        line: usize,
        uid: String,
    },

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ShardError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ShardError>;
