//! Relationship table loader
//!
//! Reads `ProjectKey,ConnectedProject,LinkCount` style CSV into
//! [`RelationshipRecord`]s. Columns are located by header name, so extra
//! columns and any column order are accepted. Weight cleaning is left to
//! [`RelationshipRecord::parse`].

use crate::config::ColumnNames;
use crate::graph::RelationshipRecord;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Errors raised while reading a relationship table
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Input has no header row")]
    MissingHeader,

    #[error("Header has no column named {0:?}")]
    MissingColumn(String),

    #[error("Line {line}: expected at least {expected} fields, found {found}")]
    Row {
        line: u64,
        expected: usize,
        found: usize,
    },
}

pub type LoadResult<T> = Result<T, LoadError>;

/// Read records from any reader
pub fn read_records<R: Read>(reader: R, columns: &ColumnNames) -> LoadResult<Vec<RelationshipRecord>> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let header: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();
    if header.iter().all(String::is_empty) {
        return Err(LoadError::MissingHeader);
    }

    let position = |name: &str| {
        header
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
    };
    let source_col = position(&columns.source)?;
    let target_col = position(&columns.target)?;
    let weight_col = position(&columns.weight)?;
    let expected = source_col.max(target_col).max(weight_col) + 1;

    let mut records = Vec::new();
    let mut skipped = 0;
    for row in rdr.records() {
        let row = row?;
        let line = row.position().map_or(0, |p| p.line());
        if row.iter().all(str::is_empty) {
            continue;
        }
        if row.len() < expected {
            return Err(LoadError::Row {
                line,
                expected,
                found: row.len(),
            });
        }

        let (source, target) = (&row[source_col], &row[target_col]);
        if source.is_empty() || target.is_empty() {
            warn!(line, "row without source or target skipped");
            skipped += 1;
            continue;
        }
        records.push(RelationshipRecord::parse(source, target, &row[weight_col]));
    }

    info!(records = records.len(), skipped, "relationship table loaded");
    Ok(records)
}

/// Read records from a CSV file
pub fn load_records(path: impl AsRef<Path>, columns: &ColumnNames) -> LoadResult<Vec<RelationshipRecord>> {
    let file = File::open(path)?;
    read_records(file, columns)
}
