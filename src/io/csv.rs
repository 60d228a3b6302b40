use csv::{ReaderBuilder, Writer};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use crate::dataframe::{DataFrame, Value};
use crate::error::Result;

/// Read a CSV file with a header row into a DataFrame
///
/// Every cell is kept as raw text; blank cells become NA.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
    let file = File::open(path.as_ref())?;
    read_csv_from_reader(file)
}

/// Read CSV data with a header row from any reader
///
/// Rows may be ragged: short rows are padded with NA. Blank header names
/// become `Unnamed: <i>` and repeated names get a `.<n>` suffix, so every
/// column stays addressable.
pub fn read_csv_from_reader<R: Read>(reader: R) -> Result<DataFrame> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = unique_headers(rdr.headers()?.iter());

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let mut row: Vec<Value> = record.iter().map(Value::from_raw).collect();
        // Trailing cells beyond the header carry no column
        row.truncate(headers.len());
        rows.push(row);
    }

    DataFrame::from_rows(headers, rows)
}

fn unique_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut headers = Vec::new();
    for (i, name) in raw.enumerate() {
        let base = if name.is_empty() {
            format!("Unnamed: {}", i)
        } else {
            name.to_string()
        };
        let mut candidate = base.clone();
        let mut n = 1;
        while seen.contains(&candidate) {
            candidate = format!("{}.{}", base, n);
            n += 1;
        }
        seen.insert(candidate.clone());
        headers.push(candidate);
    }
    headers
}

/// Write a DataFrame to a CSV file with a header row
///
/// Missing parent directories are created. NA cells are written empty.
pub fn write_csv<P: AsRef<Path>>(df: &DataFrame, path: P) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path.as_ref())?;
    write_csv_to_writer(df, file)
}

/// Write a DataFrame as CSV to any writer
pub fn write_csv_to_writer<W: Write>(df: &DataFrame, writer: W) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(df.column_names())?;
    for row in df.rows() {
        wtr.write_record(row.iter().map(|v| v.to_string()))?;
    }
    wtr.flush()?;
    Ok(())
}
