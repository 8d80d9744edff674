//! Cleaning stages, the pipeline that chains them, and column statistics.
//!
//! Each stage is a pure `&DataSet -> DataSet` step; nothing is mutated in place.
//!
//! - [`slice_rows`], [`rename_columns`], [`select_columns`], [`apply_null_policy`],
//!   [`normalize_columns`]: the individual stages
//! - [`CleaningPipeline`] + [`PipelineConfig`]: all stages in order from one config
//! - [`reduce()`] and [`describe()`]: column reductions and the summary table
//!
//! ## Example
//!
//! ```rust
//! use dollar_suite::processing::{describe, CleaningPipeline, PipelineConfig};
//! use dollar_suite::types::{DataSet, Schema, Value};
//!
//! let ds = DataSet::new(
//!     Schema::utf8(["fecha", "cartera"]),
//!     vec![
//!         vec![Value::from("2024-01"), Value::from("1.234,56")],
//!         vec![Value::from("2024-02"), Value::from("1.300,00")],
//!     ],
//! );
//!
//! let clean = CleaningPipeline::new(PipelineConfig::default()).run(&ds).unwrap();
//! let summary = describe(&clean, "cartera").unwrap();
//! assert_eq!(summary.max, 1300.0);
//! ```

pub mod describe;
pub mod pipeline;
pub mod reduce;
pub mod stages;

pub use describe::{Summary, describe};
pub use pipeline::{CleaningPipeline, PipelineConfig};
pub use reduce::{ReduceOp, reduce};
pub use stages::{
    NullPolicy, apply_null_policy, normalize_columns, numeric_candidates, rename_columns, select_columns,
    slice_rows,
};
