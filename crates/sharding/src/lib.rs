pub mod config;
pub mod error;
pub mod fields;
pub mod line_io;
pub mod partition;
pub mod pipeline;
pub mod region;
pub mod summary;
pub mod tables;

pub use config::ShardConfig;
pub use error::{Result, ShardError};
pub use partition::{KeySet, Shard, ShardKeys};
pub use pipeline::{shard_path, Sharder};
pub use summary::{RunSummary, TableSummary};
pub use tables::Table;
