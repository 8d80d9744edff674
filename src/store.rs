//! SQLite-backed table store.
//!
//! Tables are written with every cell as `TEXT` (nulls as SQL `NULL`) and read back with the same
//! plain-number inference the CSV loader uses, so cleaned numeric columns come back numeric.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;
use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, OptionalExtension, params_from_iter};

use crate::error::{SuiteError, SuiteResult};
use crate::ingestion::csv::infer_column_types;
use crate::types::{DataSet, Schema, Value};

lazy_static! {
    static ref NON_WORD_RE: Regex = Regex::new(r"\W+").expect("static regex");
}

/// How [`TableStore::save`] treats an existing table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Drop and recreate the table.
    #[default]
    Replace,
    /// Add rows to the table, creating it if needed. Column names must match.
    Append,
}

/// A local SQLite database holding one table per cleaned dataset.
#[derive(Debug)]
pub struct TableStore {
    conn: Connection,
}

impl TableStore {
    /// Open (or create) a database file.
    pub fn open(path: impl AsRef<Path>) -> SuiteResult<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(Self { conn })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> SuiteResult<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Write `ds` to table `name`. Returns the number of rows written.
    ///
    /// Column names are sanitized with [`sanitize_column_name`]. All rows go in one transaction.
    pub fn save(&mut self, name: &str, ds: &DataSet, mode: WriteMode) -> SuiteResult<usize> {
        validate_table_name(name)?;
        let columns = sanitized_columns(&ds.schema)?;
        let existing = self.table_columns(name)?;

        let tx = self.conn.transaction()?;
        match (mode, existing) {
            (WriteMode::Append, Some(cols)) if cols != columns => {
                return Err(SuiteError::SchemaMismatch {
                    message: format!("table '{name}' has columns {cols:?}, data has {columns:?}"),
                });
            }
            (WriteMode::Append, Some(_)) => {}
            (WriteMode::Replace, _) | (WriteMode::Append, None) => {
                tx.execute_batch(&format!(
                    "DROP TABLE IF EXISTS {table}; CREATE TABLE {table} ({cols});",
                    table = quote_ident(name),
                    cols = columns
                        .iter()
                        .map(|c| format!("{} TEXT", quote_ident(c)))
                        .collect::<Vec<_>>()
                        .join(", "),
                ))?;
            }
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(name),
            columns.iter().map(|c| quote_ident(c)).collect::<Vec<_>>().join(", "),
            vec!["?"; columns.len()].join(", "),
        );
        {
            let mut stmt = tx.prepare(&sql)?;
            for row in &ds.rows {
                stmt.execute(params_from_iter(row.iter().map(to_sql_value)))?;
            }
        }
        tx.commit()?;

        tracing::info!(table = name, rows = ds.row_count(), ?mode, "table saved");
        Ok(ds.row_count())
    }

    /// User table names, sorted.
    pub fn list_tables(&self) -> SuiteResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    /// Read a whole table. Columns whose cells all look like plain numbers come back numeric.
    pub fn load(&self, name: &str) -> SuiteResult<DataSet> {
        validate_table_name(name)?;
        let mut stmt = self.conn.prepare(&format!("SELECT * FROM {}", quote_ident(name)))?;
        let names: Vec<String> = stmt.column_names().into_iter().map(str::to_owned).collect();
        let width = names.len();

        let rows = stmt
            .query_map([], |row| {
                (0..width)
                    .map(|i| row.get::<_, SqlValue>(i).map(from_sql_value))
                    .collect::<Result<Vec<_>, _>>()
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(infer_column_types(&DataSet::new(Schema::utf8(names), rows)))
    }

    /// Drop a table if it exists.
    pub fn drop_table(&self, name: &str) -> SuiteResult<()> {
        validate_table_name(name)?;
        self.conn
            .execute_batch(&format!("DROP TABLE IF EXISTS {}", quote_ident(name)))?;
        tracing::info!(table = name, "table dropped");
        Ok(())
    }

    /// Column names of an existing table, or `None` if it does not exist.
    fn table_columns(&self, name: &str) -> SuiteResult<Option<Vec<String>>> {
        let exists = self
            .conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [name],
                |_| Ok(()),
            )
            .optional()?;
        if exists.is_none() {
            return Ok(None);
        }

        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info({})", quote_ident(name)))?;
        let cols = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(cols))
    }
}

/// Trim, replace spaces with `_` and lower-case a column name.
pub fn sanitize_column_name(name: &str) -> String {
    name.trim().replace(' ', "_").to_lowercase()
}

/// Table name for an uploaded file: the file name up to its first `.`, without non-word chars.
///
/// `"Mi Cartera-2024.v2.csv"` becomes `"MiCartera2024"`.
pub fn table_name_for_upload(file_name: &str) -> SuiteResult<String> {
    let base = Path::new(file_name)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    let stem = base.split('.').next().unwrap_or_default();
    let name = NON_WORD_RE.replace_all(stem, "").into_owned();
    if name.is_empty() {
        return Err(SuiteError::InvalidName {
            name: file_name.to_owned(),
            message: "no word characters before the extension".to_string(),
        });
    }
    Ok(name)
}

fn sanitized_columns(schema: &Schema) -> SuiteResult<Vec<String>> {
    let columns: Vec<String> = schema.field_names().map(sanitize_column_name).collect();
    let mut seen = HashSet::new();
    for (raw, col) in schema.field_names().zip(&columns) {
        if col.is_empty() {
            return Err(SuiteError::InvalidName {
                name: raw.to_owned(),
                message: "column name is blank".to_string(),
            });
        }
        if !seen.insert(col.as_str()) {
            return Err(SuiteError::SchemaMismatch {
                message: format!("column '{raw}' collides with another column as '{col}'"),
            });
        }
    }
    Ok(columns)
}

fn validate_table_name(name: &str) -> SuiteResult<()> {
    if name.trim().is_empty() {
        return Err(SuiteError::InvalidName {
            name: name.to_owned(),
            message: "table name is blank".to_string(),
        });
    }
    Ok(())
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn to_sql_value(v: &Value) -> SqlValue {
    match v {
        Value::Null => SqlValue::Null,
        other => SqlValue::Text(other.to_string()),
    }
}

fn from_sql_value(v: SqlValue) -> Value {
    match v {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(i) => Value::Utf8(i.to_string()),
        SqlValue::Real(f) => Value::Utf8(f.to_string()),
        SqlValue::Text(s) => Value::Utf8(s),
        SqlValue::Blob(b) => Value::Utf8(String::from_utf8_lossy(&b).into_owned()),
    }
}
