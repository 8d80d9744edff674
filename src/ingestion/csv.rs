//! CSV ingestion implementation.

use std::path::Path;

use crate::error::{SuiteError, SuiteResult};
use crate::types::{DataSet, DataType, Field, Schema, Value, cell};

/// Low-level options for a single CSV parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    /// Treat the first record as column names. Without headers, columns are named `0`, `1`, ...
    pub has_headers: bool,
    /// Field delimiter.
    pub delimiter: u8,
    /// Accept records whose length differs from the header (padded with nulls / truncated).
    pub flexible: bool,
    /// Type columns whose every non-null cell is a plain integer/float.
    pub infer_types: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            has_headers: true,
            delimiter: b',',
            flexible: false,
            infer_types: false,
        }
    }
}

impl CsvOptions {
    /// A `csv::ReaderBuilder` configured from these options.
    pub fn reader_builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .has_headers(self.has_headers)
            .delimiter(self.delimiter)
            .flexible(self.flexible);
        builder
    }
}

/// Ingest a CSV file into an in-memory [`DataSet`].
///
/// Rules:
///
/// - Input must be valid UTF-8 (see [`super::ingest_from_path`] for the encoding fallback).
/// - Every cell is read as text; empty cells (after trimming) become [`Value::Null`].
/// - Duplicate header names get a `.1`, `.2`, ... suffix; blank ones become `Unnamed: <idx>`.
pub fn ingest_csv_from_path(path: impl AsRef<Path>, options: &CsvOptions) -> SuiteResult<DataSet> {
    let mut rdr = options.reader_builder().from_path(path)?;
    ingest_csv_from_reader(&mut rdr, options)
}

/// Ingest CSV text that is already decoded.
pub fn ingest_csv_from_str(input: &str, options: &CsvOptions) -> SuiteResult<DataSet> {
    let mut rdr = options.reader_builder().from_reader(input.as_bytes());
    ingest_csv_from_reader(&mut rdr, options)
}

/// Ingest CSV data from an existing CSV reader.
///
/// Only `options.infer_types` is read here; the reader's own configuration decides headers,
/// delimiter and flexibility.
pub fn ingest_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    options: &CsvOptions,
) -> SuiteResult<DataSet> {
    let headers: Option<Vec<String>> = if rdr.has_headers() {
        Some(rdr.headers()?.iter().map(|h| h.trim().to_owned()).collect())
    } else {
        None
    };

    let mut records: Vec<csv::StringRecord> = Vec::new();
    for result in rdr.records() {
        records.push(result?);
    }

    let names = match headers {
        Some(h) => dedupe_names(h),
        None => {
            let width = records.iter().map(|r| r.len()).max().unwrap_or(0);
            (0..width).map(|i| i.to_string()).collect()
        }
    };

    if names.is_empty() {
        return Err(SuiteError::EmptyInput {
            message: "no columns to parse".to_string(),
        });
    }

    let width = names.len();
    let rows: Vec<Vec<Value>> = records
        .iter()
        .map(|record| {
            (0..width)
                .map(|i| text_cell(record.get(i).unwrap_or("")))
                .collect()
        })
        .collect();

    let ds = DataSet::new(Schema::utf8(names), rows);
    Ok(if options.infer_types { infer_column_types(&ds) } else { ds })
}

fn text_cell(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Value::Null
    } else {
        Value::Utf8(trimmed.to_owned())
    }
}

fn dedupe_names(raw: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for (idx, name) in raw.into_iter().enumerate() {
        let base = if name.is_empty() { format!("Unnamed: {idx}") } else { name };
        let mut candidate = base.clone();
        let mut n = 1;
        while out.contains(&candidate) {
            candidate = format!("{base}.{n}");
            n += 1;
        }
        out.push(candidate);
    }
    out
}

/// Re-type text columns whose every non-null cell parses as a plain `i64` (or `f64`).
///
/// Parsing is strict: locale-formatted text such as `1.234,56` keeps the column as text.
pub fn infer_column_types(ds: &DataSet) -> DataSet {
    let types: Vec<DataType> = (0..ds.column_count())
        .map(|idx| infer_type(ds.column(idx)))
        .collect();

    let schema = Schema::new(
        ds.schema
            .fields
            .iter()
            .zip(&types)
            .map(|(f, t)| Field::new(f.name.clone(), *t))
            .collect(),
    );

    ds.map_rows(schema, |row| {
        types
            .iter()
            .enumerate()
            .map(|(i, t)| coerce(cell(row, i), *t))
            .collect()
    })
}

fn infer_type<'a>(cells: impl Iterator<Item = &'a Value>) -> DataType {
    let mut seen = false;
    let mut all_int = true;
    for cell in cells {
        let text = match cell {
            Value::Null => continue,
            Value::Utf8(s) => s.as_str(),
            Value::Int64(_) => {
                seen = true;
                continue;
            }
            Value::Float64(_) => {
                seen = true;
                all_int = false;
                continue;
            }
        };
        seen = true;
        if all_int && text.parse::<i64>().is_ok() {
            continue;
        }
        all_int = false;
        if text.parse::<f64>().is_err() {
            return DataType::Utf8;
        }
    }
    match (seen, all_int) {
        (false, _) => DataType::Utf8,
        (true, true) => DataType::Int64,
        (true, false) => DataType::Float64,
    }
}

fn coerce(value: &Value, data_type: DataType) -> Value {
    match (value, data_type) {
        (Value::Utf8(s), DataType::Int64) => s.parse().map(Value::Int64).unwrap_or(Value::Null),
        (Value::Utf8(s), DataType::Float64) => s.parse().map(Value::Float64).unwrap_or(Value::Null),
        (Value::Int64(v), DataType::Float64) => Value::Float64(*v as f64),
        (other, _) => other.clone(),
    }
}
