//! JSON result file
//!
//! The file holds one array of `{"title", "link"}` objects, indented with two
//! spaces and terminated by a newline. An existing file is overwritten.

use crate::crawler::Record;
use crate::output::{OutputError, OutputResult};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Writes records to `path` as a pretty-printed JSON array
pub fn write_records(path: &Path, records: &[Record]) -> OutputResult<()> {
    let write_error = |source| OutputError::Write {
        path: path.display().to_string(),
        source,
    };

    let file = File::create(path).map_err(write_error)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n").map_err(write_error)?;
    writer.flush().map_err(write_error)?;

    tracing::debug!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Reads records back from a file written by [`write_records`]
pub fn load_records(path: &Path) -> OutputResult<Vec<Record>> {
    let file = File::open(path).map_err(|source| OutputError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
