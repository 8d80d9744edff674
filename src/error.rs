use thiserror::Error;

/// Convenience result type used across the crate.
pub type SuiteResult<T> = Result<T, SuiteError>;

/// Error type returned by ingestion, processing and storage functions.
///
/// Numeric normalization never produces one of these; invalid numbers collapse to `0.0`.
#[derive(Debug, Error)]
pub enum SuiteError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// SQLite error raised by the table store.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Input bytes could not be decoded as text.
    #[error("encoding error: {message}")]
    Encoding { message: String },

    /// A pipeline configuration file could not be parsed.
    #[error("config error: {0}")]
    Json(#[from] serde_json::Error),

    /// The data does not have the expected shape (duplicate names, append column mismatch, etc.).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A column referenced by name does not exist in the table.
    #[error("unknown column '{column}'. columns={available:?}")]
    UnknownColumn {
        column: String,
        available: Vec<String>,
    },

    /// A row range is not valid for the table.
    #[error("invalid row range {start}..{end} for {rows} rows")]
    InvalidRange { start: usize, end: usize, rows: usize },

    /// A table or column name cannot be used.
    #[error("invalid name '{name}': {message}")]
    InvalidName { name: String, message: String },

    /// The input contained nothing to work with.
    #[error("empty input: {message}")]
    EmptyInput { message: String },
}

impl SuiteError {
    pub(crate) fn unknown_column(column: &str, available: impl Iterator<Item = impl Into<String>>) -> Self {
        Self::UnknownColumn {
            column: column.to_owned(),
            available: available.map(Into::into).collect(),
        }
    }
}
