use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Result, ShardError};

/// Reads a UTF-8 file into lines that keep their terminators, so that
/// concatenating them reproduces the file byte for byte.
pub fn read_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| ShardError::io(path, e))?;
    Ok(split_lines(&content))
}

pub(crate) fn split_lines(content: &str) -> Vec<String> {
    content.split_inclusive('\n').map(str::to_string).collect()
}

/// Writes `lines` verbatim to `path`, replacing any existing file.
pub fn write_lines<P, I, S>(path: P, lines: I) -> Result<()>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| ShardError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writer
            .write_all(line.as_ref().as_bytes())
            .map_err(|e| ShardError::io(path, e))?;
    }
    // BufWriter swallows errors on drop
    writer.flush().map_err(|e| ShardError::io(path, e))?;
    Ok(())
}
