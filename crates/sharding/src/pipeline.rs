use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::ShardConfig;
use crate::error::{Result, ShardError};
use crate::line_io::{read_lines, write_lines};
use crate::partition::{partition, Classifier, Shard, ShardKeys};
use crate::region::Regions;
use crate::summary::{RunSummary, TableSummary};
use crate::tables::{ArticleCategory, Table, UserReadAssignment, UserRegion};

/// Output path for `shard` of `file_name`: `user.sql` becomes `user_shard1.sql`.
pub fn shard_path(dir: &Path, file_name: &str, shard: Shard) -> PathBuf {
    let suffix = format!("_shard{}", shard.number());
    let name = match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}{suffix}.{ext}"),
        _ => format!("{file_name}{suffix}"),
    };
    dir.join(name)
}

/// Shards the three dumps of one source directory.
#[derive(Debug, Clone)]
pub struct Sharder {
    source_dir: PathBuf,
    config: ShardConfig,
}

impl Sharder {
    pub fn new(source_dir: impl Into<PathBuf>, config: ShardConfig) -> Result<Self> {
        let source_dir = source_dir.into();
        let meta = fs::metadata(&source_dir).map_err(|e| ShardError::io(&source_dir, e))?;
        if !meta.is_dir() {
            let err = io::Error::other("not a directory");
            return Err(ShardError::io(&source_dir, err));
        }
        Ok(Self { source_dir, config })
    }

    /// Users, then articles, then read events routed by the user assignment.
    pub fn run(&self) -> Result<RunSummary> {
        let (users, user_keys) = self.shard_users()?;
        let (articles, _) = self.shard_articles()?;
        let (reads, _) = self.shard_user_reads(&user_keys)?;

        Ok(RunSummary::new(vec![users, articles, reads], &user_keys))
    }

    pub fn shard_users(&self) -> Result<(TableSummary, ShardKeys)> {
        self.shard_table(Table::User, &self.config.user_file, &UserRegion)
    }

    pub fn shard_articles(&self) -> Result<(TableSummary, ShardKeys)> {
        self.shard_table(Table::Article, &self.config.article_file, &ArticleCategory)
    }

    pub fn shard_user_reads(&self, users: &ShardKeys) -> Result<(TableSummary, ShardKeys)> {
        self.shard_table(
            Table::UserRead,
            &self.config.user_read_file,
            &UserReadAssignment::new(users),
        )
    }

    fn shard_table<C: Classifier>(
        &self,
        table: Table,
        file_name: &str,
        classifier: &C,
    ) -> Result<(TableSummary, ShardKeys)> {
        let source = self.source_dir.join(file_name);
        info!(%table, source = %source.display(), "sharding table");

        let lines = read_lines(&source)?;
        let regions = Regions::scan(&lines, &source)?;
        let out = partition(&regions, classifier, &source)?;

        let outputs = Shard::ALL.map(|shard| shard_path(&self.source_dir, file_name, shard));
        for (shard, path) in Shard::ALL.into_iter().zip(&outputs) {
            write_lines(path, out.lines(shard))?;
            if out.record_count(shard) == 0 {
                warn!(%table, %shard, "shard received no records");
            }
        }

        let summary = TableSummary {
            table,
            source,
            outputs,
            records: out.records,
            shard1_records: out.record_count(Shard::One),
            shard2_records: out.record_count(Shard::Two),
        };
        info!(
            %table,
            records = summary.records,
            shard1 = summary.shard1_records,
            shard2 = summary.shard2_records,
            "table sharded"
        );
        Ok((summary, out.keys))
    }
}
