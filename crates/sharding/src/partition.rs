use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use serde::Serialize;
use tracing::warn;

use crate::error::{Result, ShardError};
use crate::fields::Record;
use crate::region::Regions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Shard {
    One,
    Two,
}

impl Shard {
    pub const ALL: [Shard; 2] = [Shard::One, Shard::Two];

    pub fn number(self) -> u8 {
        match self {
            Shard::One => 1,
            Shard::Two => 2,
        }
    }

    fn index(self) -> usize {
        usize::from(self.number() - 1)
    }
}

impl fmt::Display for Shard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shard{}", self.number())
    }
}

/// Where a single record line goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Only(Shard),
    Both,
}

impl Route {
    pub fn includes(self, shard: Shard) -> bool {
        match self {
            Route::Only(s) => s == shard,
            Route::Both => true,
        }
    }
}

/// Key field values, quotes included, as they appear in the dump.
pub type KeySet = BTreeSet<String>;

/// Keys routed to each shard while partitioning one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShardKeys {
    shard1: KeySet,
    shard2: KeySet,
}

impl ShardKeys {
    pub fn get(&self, shard: Shard) -> &KeySet {
        match shard {
            Shard::One => &self.shard1,
            Shard::Two => &self.shard2,
        }
    }

    /// First shard holding `key`, checking shard 1 before shard 2.
    pub fn assignment(&self, key: &str) -> Option<Shard> {
        Shard::ALL
            .into_iter()
            .find(|&shard| self.get(shard).contains(key))
    }

    /// Keys present in both shards.
    pub fn overlap(&self) -> impl Iterator<Item = &str> + '_ {
        self.shard1.intersection(&self.shard2).map(String::as_str)
    }

    fn insert(&mut self, shard: Shard, key: &str) {
        let set = match shard {
            Shard::One => &mut self.shard1,
            Shard::Two => &mut self.shard2,
        };
        set.insert(key.to_string());
    }
}

/// Location of the record being classified, for diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct RecordContext<'s> {
    pub source: &'s Path,
    pub line: usize,
}

impl RecordContext<'_> {
    /// Field `index` of `record`, or `MalformedInput` naming the field.
    pub fn field<'r>(&self, record: &Record<'r>, index: usize, name: &str) -> Result<&'r str> {
        record.get(index).ok_or_else(|| {
            ShardError::malformed(
                self.source,
                format!(
                    "line {}: record has {} fields, `{name}` expected at index {index}",
                    self.line,
                    record.len()
                ),
            )
        })
    }
}

/// Per-table routing rule.
pub trait Classifier {
    /// Index of the field collected into the key sets.
    fn key_index(&self) -> usize;

    fn route(&self, record: &Record<'_>, ctx: &RecordContext<'_>) -> Result<Route>;
}

/// The two outputs of one table, framing included.
#[derive(Debug, Clone, Default)]
pub struct Partition<'a> {
    shard1: Vec<&'a str>,
    shard2: Vec<&'a str>,
    routed: [usize; 2],
    pub keys: ShardKeys,
    pub records: usize,
}

impl<'a> Partition<'a> {
    pub fn lines(&self, shard: Shard) -> &[&'a str] {
        match shard {
            Shard::One => &self.shard1,
            Shard::Two => &self.shard2,
        }
    }

    /// Number of record lines routed to `shard`, framing excluded.
    pub fn record_count(&self, shard: Shard) -> usize {
        self.routed[shard.index()]
    }

    fn push(&mut self, shard: Shard, line: &'a str) {
        match shard {
            Shard::One => self.shard1.push(line),
            Shard::Two => self.shard2.push(line),
        }
    }

    fn push_framing(&mut self, lines: &'a [String]) {
        for line in lines {
            for shard in Shard::ALL {
                self.push(shard, line);
            }
        }
    }
}

/// Routes every record of `regions` with `classifier`, copying the preamble
/// and suffix into both shards.
pub fn partition<'a, C>(regions: &Regions<'a>, classifier: &C, source: &Path) -> Result<Partition<'a>>
where
    C: Classifier + ?Sized,
{
    let mut out = Partition::default();
    out.push_framing(regions.preamble);

    for (index, line) in regions.records.iter().enumerate() {
        let ctx = RecordContext {
            source,
            line: regions.record_line_number(index),
        };
        let record = Record::split(line);
        let route = classifier.route(&record, &ctx)?;
        let key = ctx.field(&record, classifier.key_index(), "key")?;

        if let Route::Only(shard) = route {
            let other = Shard::ALL.into_iter().find(|&s| s != shard);
            if let Some(other) = other.filter(|&s| out.keys.get(s).contains(key)) {
                warn!(
                    source = %source.display(),
                    line = ctx.line,
                    key,
                    %shard,
                    %other,
                    "key already routed to the other shard"
                );
            }
        }

        for shard in Shard::ALL.into_iter().filter(|&s| route.includes(s)) {
            out.push(shard, line);
            out.keys.insert(shard, key);
            out.routed[shard.index()] += 1;
        }
        out.records += 1;
    }

    out.push_framing(regions.suffix);
    Ok(out)
}
