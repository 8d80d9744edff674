//! `dollar-suite` ingests delimited financial exports, cleans locale-formatted numeric text,
//! stores the cleaned tables in SQLite and charts a chosen numeric series over time.
//!
//! The work is split into explicit stages. Each stage takes the previous [`types::DataSet`] and
//! returns a new one:
//!
//! 1. [`ingestion::ingest_from_path`]: UTF-8 CSV first, then a Latin-1 / sniffed-delimiter
//!    fallback
//! 2. [`processing::CleaningPipeline`]: row range, renames, column selection, null handling and
//!    number normalization, driven by a [`processing::PipelineConfig`]
//! 3. [`store::TableStore`]: replace or append into a local SQLite file
//! 4. [`chart::render_svg`] and [`processing::describe()`]: a line chart and summary statistics
//!
//! ## Normalizing numbers
//!
//! [`normalize::clean_number`] is the one piece with real rules. It reads both `1.234,56` and
//! `7.15` correctly and never fails: anything unparsable becomes `0.0`.
//!
//! ```rust
//! use dollar_suite::normalize::clean_number;
//! use dollar_suite::types::Value;
//!
//! assert_eq!(clean_number(&Value::from("1.234,56")), 1234.56);
//! assert_eq!(clean_number(&Value::from("7.15")), 7.15);
//! assert_eq!(clean_number(&Value::Null), 0.0);
//! ```
//!
//! ## End to end
//!
//! ```no_run
//! use dollar_suite::chart::{render_svg, ChartOptions, TimeSeries};
//! use dollar_suite::ingestion::{ingest_from_path, IngestionOptions};
//! use dollar_suite::processing::{CleaningPipeline, PipelineConfig};
//! use dollar_suite::store::{table_name_for_upload, TableStore, WriteMode};
//!
//! # fn main() -> Result<(), dollar_suite::SuiteError> {
//! let raw = ingest_from_path("carteras.csv", &IngestionOptions::default())?;
//! let clean = CleaningPipeline::new(PipelineConfig::default()).run(&raw)?;
//!
//! let mut store = TableStore::open("datos_proyecto.db")?;
//! store.save(&table_name_for_upload("carteras.csv")?, &clean, WriteMode::Replace)?;
//!
//! let series = TimeSeries::from_dataset(&clean, "Fecha", "Cartera A")?;
//! std::fs::write("cartera_a.svg", render_svg(&series, &ChartOptions::default()))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`types`]: schema + in-memory table types
//! - [`normalize`]: locale-aware number cleaning
//! - [`ingestion`]: CSV loading, encoding fallback, delimiter sniffing, observers
//! - [`processing`]: cleaning stages, the pipeline, reductions and summaries
//! - [`store`]: SQLite persistence
//! - [`chart`]: series extraction and SVG rendering
//! - [`preview`]: text tables for the terminal
//! - [`error`]: the shared error type

pub mod chart;
pub mod error;
pub mod ingestion;
pub mod normalize;
pub mod preview;
pub mod processing;
pub mod store;
pub mod types;

pub use error::{SuiteError, SuiteResult};
