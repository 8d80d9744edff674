//! Reduction operations for [`crate::types::DataSet`].

use crate::types::{DataSet, DataType, Value, cell};

/// Built-in reduction operations over a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    /// Count all rows (including nulls).
    Count,
    /// Sum numeric values, ignoring nulls.
    Sum,
    /// Minimum numeric value, ignoring nulls.
    Min,
    /// Maximum numeric value, ignoring nulls.
    Max,
}

/// Reduce a column using a built-in [`ReduceOp`].
///
/// - Returns `None` if `column` does not exist in the schema.
/// - For `Sum`/`Min`/`Max`, returns `Some(Value::Null)` if there are no non-null values or the
///   column is not numeric. An integer `Sum` that overflows `i64` is also `Some(Value::Null)`.
/// - For `Count`, always returns `Some(Value::Int64(row_count))`.
pub fn reduce(dataset: &DataSet, column: &str, op: ReduceOp) -> Option<Value> {
    let idx = dataset.schema.index_of(column)?;

    match op {
        ReduceOp::Count => Some(Value::Int64(dataset.row_count() as i64)),
        ReduceOp::Sum | ReduceOp::Min | ReduceOp::Max => {
            let data_type = dataset.schema.fields[idx].data_type;
            Some(reduce_numeric_typed(dataset, idx, data_type, op))
        }
    }
}

/// Fold one value into the accumulator. `None` means the sum overflowed.
fn fold_op<T: PartialOrd + Copy>(op: ReduceOp, acc: Option<T>, v: T, add: impl Fn(T, T) -> Option<T>) -> Option<T> {
    match (op, acc) {
        (_, None) => Some(v),
        (ReduceOp::Sum, Some(a)) => add(a, v),
        (ReduceOp::Min, Some(a)) => Some(if v < a { v } else { a }),
        (ReduceOp::Max, Some(a)) => Some(if v > a { v } else { a }),
        (ReduceOp::Count, Some(a)) => Some(a),
    }
}

fn reduce_numeric_typed(dataset: &DataSet, idx: usize, data_type: DataType, op: ReduceOp) -> Value {
    // Outer `None` marks an overflowed integer sum; inner `None` means no values yet.
    match data_type {
        DataType::Int64 => {
            let acc = dataset.reduce_rows(Some(None), |acc: Option<Option<i64>>, row| {
                acc.and_then(|acc| match cell(row, idx) {
                    Value::Int64(v) => fold_op(op, acc, *v, i64::checked_add).map(Some),
                    _ => Some(acc),
                })
            });
            acc.flatten().map(Value::Int64).unwrap_or(Value::Null)
        }
        DataType::Float64 => {
            let acc = dataset.reduce_rows(Some(None), |acc: Option<Option<f64>>, row| {
                acc.and_then(|acc| match cell(row, idx) {
                    Value::Float64(v) => fold_op(op, acc, *v, |a, b| Some(a + b)).map(Some),
                    _ => Some(acc),
                })
            });
            acc.flatten().map(Value::Float64).unwrap_or(Value::Null)
        }
        DataType::Utf8 => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::{ReduceOp, reduce};
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn numeric_dataset_with_nulls() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("id", DataType::Int64),
            Field::new("score", DataType::Float64),
        ]);

        let rows = vec![
            vec![Value::Int64(1), Value::Float64(10.0)],
            vec![Value::Int64(2), Value::Null],
            vec![Value::Int64(3), Value::Float64(5.5)],
        ];

        DataSet::new(schema, rows)
    }

    #[test]
    fn reduce_count_counts_rows() {
        let ds = numeric_dataset_with_nulls();
        assert_eq!(reduce(&ds, "score", ReduceOp::Count), Some(Value::Int64(3)));
    }

    #[test]
    fn reduce_sum_ignores_nulls_and_preserves_type() {
        let ds = numeric_dataset_with_nulls();
        assert_eq!(reduce(&ds, "score", ReduceOp::Sum), Some(Value::Float64(15.5)));
        assert_eq!(reduce(&ds, "id", ReduceOp::Sum), Some(Value::Int64(6)));
    }

    #[test]
    fn reduce_min_max_ignore_nulls() {
        let ds = numeric_dataset_with_nulls();
        assert_eq!(reduce(&ds, "score", ReduceOp::Min), Some(Value::Float64(5.5)));
        assert_eq!(reduce(&ds, "score", ReduceOp::Max), Some(Value::Float64(10.0)));
        assert_eq!(reduce(&ds, "id", ReduceOp::Min), Some(Value::Int64(1)));
        assert_eq!(reduce(&ds, "id", ReduceOp::Max), Some(Value::Int64(3)));
    }

    #[test]
    fn reduce_returns_none_for_missing_column() {
        let ds = numeric_dataset_with_nulls();
        assert_eq!(reduce(&ds, "missing", ReduceOp::Count), None);
        assert_eq!(reduce(&ds, "missing", ReduceOp::Sum), None);
    }

    #[test]
    fn reduce_text_column_is_null() {
        let ds = DataSet::new(Schema::utf8(["fecha"]), vec![vec![Value::from("2024")]]);
        assert_eq!(reduce(&ds, "fecha", ReduceOp::Sum), Some(Value::Null));
    }

    #[test]
    fn reduce_int_sum_overflow_is_null() {
        let schema = Schema::new(vec![Field::new("n", DataType::Int64)]);
        let ds = DataSet::new(schema, vec![vec![Value::Int64(i64::MAX)], vec![Value::Int64(1)]]);
        assert_eq!(reduce(&ds, "n", ReduceOp::Sum), Some(Value::Null));
        assert_eq!(reduce(&ds, "n", ReduceOp::Max), Some(Value::Int64(i64::MAX)));
    }
}
