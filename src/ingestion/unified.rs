//! Fallback loader for uploaded exports.
//!
//! [`ingest_from_path`] / [`ingest_from_bytes`] first parse the input as UTF-8 CSV with the
//! configured (or default `,`) delimiter. If that fails, the bytes are decoded as Latin-1 (unless
//! they are valid UTF-8), the delimiter is sniffed, and the parse is retried once with ragged rows
//! allowed. A second failure is returned unchanged.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{SuiteError, SuiteResult};
use crate::types::DataSet;

use super::csv::{CsvOptions, ingest_csv_from_str};
use super::encoding::{decode_latin1, decode_utf8, sniff_delimiter};
use super::observability::{IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats};

/// Options controlling unified ingestion behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestionOptions {
    /// Treat the first record as column names.
    pub has_headers: bool,
    /// Force a delimiter. If `None`, `,` is tried first and the fallback sniffs one.
    pub delimiter: Option<u8>,
    /// Type columns whose every non-null cell is a plain number.
    pub infer_types: bool,
    /// Retry with Latin-1 decoding and delimiter sniffing when the first parse fails.
    pub fallback: bool,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("has_headers", &self.has_headers)
            .field("delimiter", &self.delimiter)
            .field("infer_types", &self.infer_types)
            .field("fallback", &self.fallback)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            has_headers: true,
            delimiter: None,
            infer_types: false,
            fallback: true,
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

/// Load a delimited file from disk.
///
/// A missing or unreadable file fails immediately (no fallback). When an observer is
/// configured, this function reports:
///
/// - `on_success` on success, with row/column counts and the delimiter used
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// ```no_run
/// use dollar_suite::ingestion::{ingest_from_path, IngestionOptions};
///
/// # fn main() -> Result<(), dollar_suite::SuiteError> {
/// let ds = ingest_from_path("carteras.csv", &IngestionOptions::default())?;
/// println!("rows={} columns={:?}", ds.row_count(), ds.column_names());
/// # Ok(())
/// # }
/// ```
pub fn ingest_from_path(path: impl AsRef<Path>, options: &IngestionOptions) -> SuiteResult<DataSet> {
    let path = path.as_ref();
    let ctx = IngestionContext {
        path: path.to_path_buf(),
    };

    let result = std::fs::read(path)
        .map_err(SuiteError::from)
        .and_then(|bytes| load_with_fallback(&bytes, &ctx, options));
    report(result, &ctx, options)
}

/// Load an in-memory upload. `name` is only used for logging and observer context.
pub fn ingest_from_bytes(bytes: &[u8], name: &str, options: &IngestionOptions) -> SuiteResult<DataSet> {
    let ctx = IngestionContext {
        path: PathBuf::from(name),
    };
    let result = load_with_fallback(bytes, &ctx, options);
    report(result, &ctx, options)
}

fn load_with_fallback(
    bytes: &[u8],
    ctx: &IngestionContext,
    options: &IngestionOptions,
) -> SuiteResult<(DataSet, IngestionStats)> {
    let strict = CsvOptions {
        has_headers: options.has_headers,
        delimiter: options.delimiter.unwrap_or(b','),
        flexible: false,
        infer_types: options.infer_types,
    };

    let first = match decode_utf8(bytes) {
        Some(text) => ingest_csv_from_str(&text, &strict),
        None => Err(SuiteError::Encoding {
            message: "input is not valid utf-8".to_string(),
        }),
    };

    let err = match first {
        Ok(ds) => {
            let stats = stats_for(&ds, strict.delimiter, false);
            return Ok((ds, stats));
        }
        Err(e) if !options.fallback => return Err(e),
        Err(e) => e,
    };

    // Valid UTF-8 that failed for structural reasons keeps its encoding.
    let (text, encoding) = match decode_utf8(bytes) {
        Some(text) => (text, "utf-8"),
        None => (decode_latin1(bytes), "latin-1"),
    };
    let delimiter = options.delimiter.unwrap_or_else(|| sniff_delimiter(&text));
    let shown = (delimiter as char).escape_default();
    tracing::warn!(
        path = %ctx.path.display(),
        error = %err,
        encoding,
        delimiter = %shown,
        "strict parse failed; retrying with sniffed delimiter"
    );

    let relaxed = CsvOptions {
        delimiter,
        flexible: true,
        ..strict
    };
    let ds = ingest_csv_from_str(&text, &relaxed)?;
    let stats = stats_for(&ds, delimiter, true);
    Ok((ds, stats))
}

fn stats_for(ds: &DataSet, delimiter: u8, fallback_used: bool) -> IngestionStats {
    IngestionStats {
        rows: ds.row_count(),
        columns: ds.column_count(),
        delimiter,
        fallback_used,
    }
}

fn report(
    result: SuiteResult<(DataSet, IngestionStats)>,
    ctx: &IngestionContext,
    options: &IngestionOptions,
) -> SuiteResult<DataSet> {
    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok((_, stats)) => obs.on_success(ctx, *stats),
            Err(e) => {
                let sev = IngestionSeverity::for_error(e);
                obs.on_failure(ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(ctx, sev, e);
                }
            }
        }
    }
    result.map(|(ds, _)| ds)
}
