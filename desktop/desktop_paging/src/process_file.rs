use std::{fs, path::Path};

use paging_sim::ProcessRecord;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessFileError {
    #[error("could not read process file: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: expected \"<id> <size>\", got \"{content}\"")]
    Malformed { line: usize, content: String },
}

pub fn load_process_records<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<ProcessRecord>, ProcessFileError> {
    let content = fs::read_to_string(path)?;
    parse_process_records(&content)
}

/// Parses one `"<id> <size>"` record per line. Blank lines and `#` comments are skipped.
///
/// Sizes are not checked here, that happens when the records are turned into processes.
pub fn parse_process_records(content: &str) -> Result<Vec<ProcessRecord>, ProcessFileError> {
    let mut records = vec![];

    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let malformed = || ProcessFileError::Malformed {
            line: i + 1,
            content: line.to_string(),
        };

        let mut fields = line.split_whitespace();
        let (Some(id), Some(size), None) = (fields.next(), fields.next(), fields.next()) else {
            return Err(malformed());
        };

        records.push(ProcessRecord {
            id: id.parse().map_err(|_| malformed())?,
            size: size.parse().map_err(|_| malformed())?,
        });
    }

    Ok(records)
}
