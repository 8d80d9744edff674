//! Ingestion entrypoints and implementations.
//!
//! Most callers should use [`ingest_from_path`] (from [`unified`]) which:
//!
//! - parses the file as UTF-8 CSV
//! - on failure, retries once as Latin-1 with a sniffed delimiter
//! - optionally reports success/failure/alerts to an [`IngestionObserver`]
//!
//! Lower-level building blocks live in [`csv`] and [`encoding`].

pub mod csv;
pub mod encoding;
pub mod observability;
pub mod unified;

pub use observability::{
    CompositeObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats, TracingObserver,
};
pub use unified::{IngestionOptions, ingest_from_bytes, ingest_from_path};
