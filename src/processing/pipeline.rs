//! The cleaning pipeline: one config, five ordered stages.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SuiteResult;
use crate::types::DataSet;

use super::stages::{
    NullPolicy, apply_null_policy, normalize_columns, numeric_candidates, rename_columns, select_columns,
    slice_rows,
};

/// Configuration for [`CleaningPipeline`].
///
/// Every field is optional in JSON; an empty object `{}` runs only the normalizer over
/// [`numeric_candidates`].
///
/// ```json
/// {
///   "row_range": [0, 120],
///   "rename": { "Fecha": "fecha", "Cartera A": "cartera_a" },
///   "keep_columns": ["fecha", "cartera_a"],
///   "nulls": "fill_zero",
///   "numeric_columns": ["cartera_a"]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Keep rows `[start, end)` by position.
    pub row_range: Option<(usize, usize)>,
    /// Old name -> new name.
    pub rename: BTreeMap<String, String>,
    /// Columns to keep (after renaming), in output order.
    pub keep_columns: Option<Vec<String>>,
    /// Missing-cell handling.
    pub nulls: NullPolicy,
    /// Columns to normalize. `None` means every column but the first.
    pub numeric_columns: Option<Vec<String>>,
}

impl PipelineConfig {
    /// Parse a config from JSON text.
    pub fn from_json_str(text: &str) -> SuiteResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> SuiteResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

/// Applies slice -> rename -> select -> nulls -> normalize to a table.
#[derive(Debug, Clone, Default)]
pub struct CleaningPipeline {
    config: PipelineConfig,
}

impl CleaningPipeline {
    /// Pipeline that runs `config`.
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// The config this pipeline was built with.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run all stages. The input is left untouched.
    pub fn run(&self, input: &DataSet) -> SuiteResult<DataSet> {
        let cfg = &self.config;

        let ds = match cfg.row_range {
            Some((start, end)) => slice_rows(input, start, end)?,
            None => input.clone(),
        };
        tracing::debug!(rows = ds.row_count(), "stage slice");

        let ds = if cfg.rename.is_empty() {
            ds
        } else {
            rename_columns(&ds, &cfg.rename)?
        };
        tracing::debug!(columns = ?ds.column_names(), "stage rename");

        let ds = match &cfg.keep_columns {
            Some(names) => select_columns(&ds, names.as_slice())?,
            None => ds,
        };
        tracing::debug!(columns = ds.column_count(), "stage select");

        let ds = apply_null_policy(&ds, cfg.nulls);
        tracing::debug!(rows = ds.row_count(), policy = ?cfg.nulls, "stage nulls");

        let numeric = match &cfg.numeric_columns {
            Some(cols) => cols.clone(),
            None => numeric_candidates(&ds),
        };
        let ds = normalize_columns(&ds, numeric.as_slice())?;
        tracing::debug!(columns = ?numeric, "stage normalize");

        Ok(ds)
    }
}
