//! CSV boundary for tables and reference files.

use crate::errors::{EacvError, EacvResult};
use crate::table::{parse_number, Cell, Table};
use crate::FloatValue;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;
use tracing::{debug, warn};

fn open(path: &Path) -> EacvResult<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| EacvError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Header text with any byte-order mark and surrounding whitespace removed.
fn clean_header(header: &str) -> String {
    header.trim_start_matches('\u{feff}').trim().to_string()
}

impl Table {
    /// Read a table from CSV with a header row.
    ///
    /// Header strings are kept exactly (apart from surrounding whitespace);
    /// fields are classified with [`Cell::parse`].
    pub fn from_reader<R: Read>(reader: R) -> EacvResult<Self> {
        let mut reader = csv::ReaderBuilder::new().from_reader(reader);
        let columns = reader.headers()?.iter().map(clean_header).collect();

        let mut table = Table::new(columns);
        for record in reader.records() {
            let record = record?;
            table.push_row(record.iter().map(Cell::parse).collect())?;
        }
        Ok(table)
    }

    pub fn from_path(path: impl AsRef<Path>) -> EacvResult<Self> {
        Self::from_reader(open(path.as_ref())?)
    }

    /// Write the table as CSV, nulls as empty fields.
    pub fn write_csv<W: Write>(&self, writer: W) -> EacvResult<()> {
        let mut writer = csv::WriterBuilder::new().from_writer(writer);

        writer.write_record(self.columns())?;
        for row in self.rows() {
            writer.write_record(
                self.columns()
                    .iter()
                    .map(|c| row.cell(c).map(Cell::to_string).unwrap_or_default()),
            )?;
        }

        writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

/// Deserialize an optional numeric field of a reference file.
///
/// Accepts a decimal comma. Blank fields and text that is not a number
/// become `None`.
pub fn reference_number<'de, D>(deserializer: D) -> Result<Option<FloatValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let field = Option::<String>::deserialize(deserializer)?;
    let field = match field.as_deref().map(str::trim) {
        Some(field) if !field.is_empty() => field,
        _ => return Ok(None),
    };
    let value = parse_number(field);
    if value.is_none() {
        debug!(field, "Non-numeric reference value treated as missing");
    }
    Ok(value)
}

/// Deserialize every record of a CSV reference file.
///
/// Blank fields deserialize to `None` for optional fields. Records that
/// cannot be deserialized are skipped; malformed CSV fails the whole file.
pub fn read_records<T, R>(reader: R) -> EacvResult<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: csv::StringRecord = reader.headers()?.iter().map(clean_header).collect();
    reader.set_headers(headers);

    let mut records = Vec::new();
    for record in reader.deserialize() {
        match record {
            Ok(record) => records.push(record),
            Err(e) if matches!(e.kind(), csv::ErrorKind::Deserialize { .. }) => {
                warn!(error = %e, "Skipping unreadable reference record");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(records)
}

pub fn read_records_from_path<T: DeserializeOwned>(path: impl AsRef<Path>) -> EacvResult<Vec<T>> {
    read_records(open(path.as_ref())?)
}
