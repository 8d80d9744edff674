//! Summary statistics for one numeric column.

use std::fmt;

use crate::types::DataSet;

/// Count, mean, sample standard deviation and quartiles of a column.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1). `NaN` for a single value.
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

/// Summarize the non-null numeric cells of `column`.
///
/// Returns `None` if the column is missing or holds no numeric cells. Text cells are skipped, so
/// run the normalizer first to include them.
pub fn describe(dataset: &DataSet, column: &str) -> Option<Summary> {
    let idx = dataset.schema.index_of(column)?;
    let mut values: Vec<f64> = dataset.column(idx).filter_map(|v| v.as_f64()).collect();
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let std = if count > 1 {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (count - 1) as f64).sqrt()
    } else {
        f64::NAN
    };

    Some(Summary {
        count,
        mean,
        std,
        min: values[0],
        p25: quantile(&values, 0.25),
        p50: quantile(&values, 0.50),
        p75: quantile(&values, 0.75),
        max: values[count - 1],
    })
}

/// Linear-interpolated quantile of sorted, non-empty `values`.
fn quantile(values: &[f64], q: f64) -> f64 {
    let pos = q * (values.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    values[lo] + (values[hi] - values[lo]) * (pos - lo as f64)
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "count  {}", self.count)?;
        writeln!(f, "mean   {:.6}", self.mean)?;
        writeln!(f, "std    {:.6}", self.std)?;
        writeln!(f, "min    {:.6}", self.min)?;
        writeln!(f, "25%    {:.6}", self.p25)?;
        writeln!(f, "50%    {:.6}", self.p50)?;
        writeln!(f, "75%    {:.6}", self.p75)?;
        write!(f, "max    {:.6}", self.max)
    }
}
