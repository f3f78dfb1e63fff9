//! CSV reader for raw score files.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tracing::{debug, info};

use crate::error::{AnalyzerError, Result};
use crate::records::{ColumnSet, RawRecord, RawTable};

/// Reads a header row plus data rows into a [`RawTable`].
///
/// Cells are whitespace-trimmed and rows may be ragged; a short row simply
/// leaves its trailing columns empty. Column presence is not checked here.
///
/// # Errors
///
/// Returns [`AnalyzerError::DuplicateColumn`] if the header row repeats a
/// column name, or a CSV error if the input is not readable as CSV.
pub fn parse_csv<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let columns = ColumnSet::new(rdr.headers()?.iter());
    if let Some(column) = columns.duplicate() {
        return Err(AnalyzerError::DuplicateColumn {
            column: column.to_string(),
        });
    }
    let mut rows = Vec::new();

    for result in rdr.deserialize() {
        let record: RawRecord = result?;
        rows.push(record);
    }

    debug!(rows = rows.len(), "Parsed raw CSV rows");
    Ok(RawTable { columns, rows })
}

/// Opens `path` and parses it with [`parse_csv`].
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn read_csv(path: &Path) -> Result<RawTable> {
    let file = File::open(path)?;
    let table = parse_csv(file)?;
    info!(rows = table.rows.len(), "Loaded data");
    Ok(table)
}
