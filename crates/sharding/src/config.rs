use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Result, ShardError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShardConfig {
    /// File name of the user dump inside the source directory.
    pub user_file: String,
    /// File name of the article dump.
    pub article_file: String,
    /// File name of the user read-event dump.
    pub user_read_file: String,
}

impl Default for ShardConfig {
    fn default() -> Self {
        Self {
            user_file: "user.sql".to_string(),
            article_file: "article.sql".to_string(),
            user_read_file: "user_read.sql".to_string(),
        }
    }
}

impl ShardConfig {
    /// Loads a YAML config; keys that are absent keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ShardError::io(path, e))?;
        serde_yaml::from_str(&content).map_err(|source| ShardError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}
