use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};

use sharding::{RunSummary, ShardConfig, Sharder};

/// Split the user, article and user_read dumps into two shards.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding user.sql, article.sql and user_read.sql; shards are written next to them
    #[arg(short, long)]
    source: PathBuf,

    /// YAML file overriding the input file names
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write a JSON summary of the run to this path
    #[arg(long)]
    summary: Option<PathBuf>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> Level {
        if self.quiet {
            return Level::WARN;
        }
        match self.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

fn shard(cli: &Cli) -> Result<RunSummary> {
    let config = match &cli.config {
        Some(path) => ShardConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ShardConfig::default(),
    };

    let sharder = Sharder::new(&cli.source, config)
        .with_context(|| format!("Invalid source directory {}", cli.source.display()))?;
    sharder
        .run()
        .with_context(|| format!("Failed to shard {}", cli.source.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .init();

    let summary = shard(&cli)?;
    for table in &summary.tables {
        info!(
            table = %table.table,
            shard1 = %table.outputs[0].display(),
            shard2 = %table.outputs[1].display(),
            "wrote shards"
        );
    }

    if let Some(path) = &cli.summary {
        summary
            .save(path)
            .with_context(|| format!("Failed to save summary {}", path.display()))?;
        info!(path = %path.display(), "saved summary");
    }

    Ok(())
}
