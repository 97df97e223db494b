// Primitives for reading delimited text files.

use std::fs::File;
use std::path::Path;

use crate::vizzard::*;

/// One line of a delimited file, split into fields.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TabularRecord {
    /// Line of the file where the record starts, starting at 1. Blank lines
    /// produce no record but are counted.
    pub lineno: usize,
    pub fields: Vec<String>,
}

/// The lines of a delimited file, read lazily.
///
/// No quoting or escaping: a line is split on every delimiter. Lines are
/// not validated, checking the number of fields is left to the caller.
/// Bytes that are not valid UTF-8 are replaced, the rest of the line is kept.
pub struct TabularRecords {
    path: String,
    records: csv::ByteRecordsIntoIter<File>,
    lineno: usize,
}

impl Iterator for TabularRecords {
    type Item = VizzardResult<TabularRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let record_r = self.records.next()?;
        Some(
            record_r
                .context(CsvReadSnafu {
                    path: self.path.clone(),
                })
                .map(|record| {
                    self.lineno = match record.position() {
                        Some(pos) => pos.line() as usize,
                        None => self.lineno + 1,
                    };
                    TabularRecord {
                        lineno: self.lineno,
                        fields: record
                            .iter()
                            .map(|b| String::from_utf8_lossy(b).into_owned())
                            .collect(),
                    }
                }),
        )
    }
}

pub fn ensure_exists(path: &str) -> VizzardResult<()> {
    ensure!(Path::new(path).exists(), FileNotFoundSnafu { path });
    Ok(())
}

/// Opens a delimited file. Fails before reading anything if the file does not exist.
pub fn open_records(path: &str, delimiter: u8) -> VizzardResult<TabularRecords> {
    ensure_exists(path)?;
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .delimiter(delimiter)
        .from_path(path)
        .context(CsvReadSnafu { path })?;
    debug!("open_records: opened {:?}", path);
    Ok(TabularRecords {
        path: path.to_string(),
        records: rdr.into_byte_records(),
        lineno: 0,
    })
}
