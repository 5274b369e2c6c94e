use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, ShardError};
use crate::partition::{Shard, ShardKeys};
use crate::tables::Table;

#[derive(Debug, Clone, Serialize)]
pub struct TableSummary {
    pub table: Table,
    pub source: PathBuf,
    pub outputs: [PathBuf; 2],
    /// Record lines in the source.
    pub records: usize,
    pub shard1_records: usize,
    pub shard2_records: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub tables: Vec<TableSummary>,
    pub shard1_users: usize,
    pub shard2_users: usize,
}

impl RunSummary {
    pub fn new(tables: Vec<TableSummary>, users: &ShardKeys) -> Self {
        Self {
            tables,
            shard1_users: users.get(Shard::One).len(),
            shard2_users: users.get(Shard::Two).len(),
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| ShardError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush().map_err(|e| ShardError::io(path, e))?;
        Ok(())
    }
}
