use std::path::Path;

use tracing::debug;

use crate::error::{Result, ShardError};

pub const INSERT_MARKER: &str = "INSERT INTO";
pub const STATEMENT_TERMINATOR: char = ';';

/// A source file's lines split into the framing and the record run.
///
/// `preamble` ends with the `INSERT INTO` line, `records` ends with the
/// first line whose trimmed form ends in `;`, `suffix` is everything after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regions<'a> {
    pub preamble: &'a [String],
    pub records: &'a [String],
    pub suffix: &'a [String],
}

impl<'a> Regions<'a> {
    /// Splits `lines` read from `source` into its three regions.
    pub fn scan(lines: &'a [String], source: &Path) -> Result<Self> {
        let marker = lines
            .iter()
            .position(|line| line.starts_with(INSERT_MARKER))
            .ok_or_else(|| {
                ShardError::malformed(source, format!("no line starts with `{INSERT_MARKER}`"))
            })?;
        let (preamble, rest) = lines.split_at(marker + 1);

        let terminator = rest
            .iter()
            .position(|line| line.trim_end().ends_with(STATEMENT_TERMINATOR))
            .ok_or_else(|| {
                ShardError::malformed(
                    source,
                    format!(
                        "records after line {} are never terminated by `{STATEMENT_TERMINATOR}`",
                        preamble.len()
                    ),
                )
            })?;
        let (records, suffix) = rest.split_at(terminator + 1);

        debug!(
            source = %source.display(),
            preamble = preamble.len(),
            records = records.len(),
            suffix = suffix.len(),
            "scanned regions"
        );

        Ok(Self {
            preamble,
            records,
            suffix,
        })
    }

    /// 1-based line number of the record at `index` within the source file.
    pub fn record_line_number(&self, index: usize) -> usize {
        self.preamble.len() + index + 1
    }
}
