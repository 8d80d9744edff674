//! Individual cleaning stages.
//!
//! Every stage takes the previous table by reference and returns a new one.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{SuiteError, SuiteResult};
use crate::normalize::clean_number;
use crate::types::{DataSet, DataType, Field, Schema, Value, cell};

/// What to do with missing cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullPolicy {
    /// Leave nulls in place.
    #[default]
    Keep,
    /// Remove every row that contains at least one null.
    Drop,
    /// Replace nulls with a zero of the column's type.
    FillZero,
}

/// Keep rows `[start, end)` by position.
///
/// Both bounds are clamped to the row count, so a range past the last row is empty. Only
/// `start > end` is an error.
pub fn slice_rows(ds: &DataSet, start: usize, end: usize) -> SuiteResult<DataSet> {
    if start > end {
        return Err(SuiteError::InvalidRange {
            start,
            end,
            rows: ds.row_count(),
        });
    }
    let end = end.min(ds.row_count());
    let start = start.min(end);
    Ok(DataSet::new(ds.schema.clone(), ds.rows[start..end].to_vec()))
}

/// Rename columns by label. Target names are trimmed; a blank target keeps the old name.
pub fn rename_columns(ds: &DataSet, mapping: &BTreeMap<String, String>) -> SuiteResult<DataSet> {
    for old in mapping.keys() {
        ds.schema.require_index(old)?;
    }

    let fields: Vec<Field> = ds
        .schema
        .fields
        .iter()
        .map(|f| {
            let name = match mapping.get(&f.name).map(|n| n.trim()) {
                Some(new) if !new.is_empty() => new.to_owned(),
                _ => f.name.clone(),
            };
            Field::new(name, f.data_type)
        })
        .collect();

    let mut seen = HashSet::new();
    for f in &fields {
        if !seen.insert(f.name.as_str()) {
            return Err(SuiteError::SchemaMismatch {
                message: format!("rename produces duplicate column '{}'", f.name),
            });
        }
    }

    Ok(DataSet::new(Schema::new(fields), ds.rows.clone()))
}

/// Keep only `names`, in the order given.
pub fn select_columns<S: AsRef<str>>(ds: &DataSet, names: &[S]) -> SuiteResult<DataSet> {
    let idxs = names
        .iter()
        .map(|n| ds.schema.require_index(n.as_ref()))
        .collect::<SuiteResult<Vec<usize>>>()?;

    let schema = Schema::new(idxs.iter().map(|&i| ds.schema.fields[i].clone()).collect());
    Ok(ds.map_rows(schema, |row| {
        idxs.iter()
            .map(|&i| cell(row, i).clone())
            .collect()
    }))
}

/// Apply a [`NullPolicy`].
pub fn apply_null_policy(ds: &DataSet, policy: NullPolicy) -> DataSet {
    match policy {
        NullPolicy::Keep => ds.clone(),
        NullPolicy::Drop => {
            let width = ds.column_count();
            ds.filter_rows(|row| (0..width).all(|i| !cell(row, i).is_null()))
        }
        NullPolicy::FillZero => {
            let types: Vec<DataType> = ds.schema.fields.iter().map(|f| f.data_type).collect();
            ds.map_rows(ds.schema.clone(), |row| {
                types
                    .iter()
                    .enumerate()
                    .map(|(i, t)| match (cell(row, i), t) {
                        (Value::Null, DataType::Int64) => Value::Int64(0),
                        (Value::Null, DataType::Float64) => Value::Float64(0.0),
                        (Value::Null, DataType::Utf8) => Value::Utf8("0".to_string()),
                        (other, _) => other.clone(),
                    })
                    .collect()
            })
        }
    }
}

/// Run every cell of exactly `columns` through [`clean_number`] and type them `Float64`.
///
/// Other columns are returned untouched.
pub fn normalize_columns<S: AsRef<str>>(ds: &DataSet, columns: &[S]) -> SuiteResult<DataSet> {
    let mut targets = vec![false; ds.column_count()];
    for c in columns {
        targets[ds.schema.require_index(c.as_ref())?] = true;
    }

    let schema = Schema::new(
        ds.schema
            .fields
            .iter()
            .zip(&targets)
            .map(|(f, &t)| {
                let data_type = if t { DataType::Float64 } else { f.data_type };
                Field::new(f.name.clone(), data_type)
            })
            .collect(),
    );

    Ok(ds.map_rows(schema, |row| {
        targets
            .iter()
            .enumerate()
            .map(|(i, &t)| {
                let v = cell(row, i);
                if t { Value::Float64(clean_number(v)) } else { v.clone() }
            })
            .collect()
    }))
}

/// Every column except the first, which is taken to be the time axis.
pub fn numeric_candidates(ds: &DataSet) -> Vec<String> {
    ds.schema.field_names().skip(1).map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataSet {
        DataSet::new(
            Schema::utf8(["Fecha", "Cartera A", "Cartera B"]),
            vec![
                vec![Value::from("01/01/2024"), Value::from("1.234,56"), Value::from("7.15")],
                vec![Value::from("02/01/2024"), Value::Null, Value::from("7,20")],
                vec![Value::from("03/01/2024"), Value::from("1234,56"), Value::from("abc")],
                vec![Value::Null, Value::from("10"), Value::from("")],
            ],
        )
    }

    #[test]
    fn slice_rows_by_position_and_clamps_end() {
        let ds = sample();
        let out = slice_rows(&ds, 1, 3).unwrap();
        assert_eq!(out.row_count(), 2);
        assert_eq!(out.rows[0][0], Value::from("02/01/2024"));

        let out = slice_rows(&ds, 2, 100).unwrap();
        assert_eq!(out.row_count(), 2);

        let out = slice_rows(&ds, 4, 4).unwrap();
        assert_eq!(out.row_count(), 0);
    }

    #[test]
    fn slice_rows_past_the_end_is_empty() {
        let ds = sample().head(2);
        let out = slice_rows(&ds, 5, 10).unwrap();
        assert_eq!(out.row_count(), 0);
        assert_eq!(out.schema, ds.schema);
    }

    #[test]
    fn slice_rows_rejects_inverted_range() {
        let err = slice_rows(&sample(), 3, 1).unwrap_err();
        assert!(err.to_string().contains("invalid row range 3..1"));
    }

    #[test]
    fn rename_trims_and_keeps_blank_targets() {
        let ds = sample();
        let mapping = BTreeMap::from([
            ("Fecha".to_string(), "  date ".to_string()),
            ("Cartera B".to_string(), "   ".to_string()),
        ]);
        let out = rename_columns(&ds, &mapping).unwrap();
        assert_eq!(out.column_names(), vec!["date", "Cartera A", "Cartera B"]);
        assert_eq!(out.rows, ds.rows);
    }

    #[test]
    fn rename_rejects_unknown_and_duplicates() {
        let ds = sample();
        let unknown = BTreeMap::from([("Nope".to_string(), "x".to_string())]);
        assert!(matches!(
            rename_columns(&ds, &unknown),
            Err(SuiteError::UnknownColumn { .. })
        ));

        let dup = BTreeMap::from([("Cartera B".to_string(), "Cartera A".to_string())]);
        let err = rename_columns(&ds, &dup).unwrap_err();
        assert!(err.to_string().contains("duplicate column 'Cartera A'"));
    }

    #[test]
    fn select_columns_in_requested_order() {
        let ds = sample();
        let out = select_columns(&ds, &["Cartera B", "Fecha"]).unwrap();
        assert_eq!(out.column_names(), vec!["Cartera B", "Fecha"]);
        assert_eq!(out.rows[0], vec![Value::from("7.15"), Value::from("01/01/2024")]);
        assert!(select_columns(&ds, &["missing"]).is_err());
    }

    #[test]
    fn null_policies() {
        let ds = sample();
        assert_eq!(apply_null_policy(&ds, NullPolicy::Keep), ds);

        let dropped = apply_null_policy(&ds, NullPolicy::Drop);
        assert_eq!(dropped.row_count(), 2);
        assert_eq!(dropped.rows[1][0], Value::from("03/01/2024"));

        let filled = apply_null_policy(&ds, NullPolicy::FillZero);
        assert_eq!(filled.rows[1][1], Value::from("0"));
        assert_eq!(filled.rows[3][0], Value::from("0"));
    }

    #[test]
    fn fill_zero_respects_numeric_types() {
        let ds = DataSet::new(
            Schema::new(vec![
                Field::new("i", DataType::Int64),
                Field::new("f", DataType::Float64),
            ]),
            vec![vec![Value::Null, Value::Null]],
        );
        let out = apply_null_policy(&ds, NullPolicy::FillZero);
        assert_eq!(out.rows[0], vec![Value::Int64(0), Value::Float64(0.0)]);
    }

    #[test]
    fn normalize_touches_only_selected_columns() {
        let ds = sample();
        let out = normalize_columns(&ds, &["Cartera A"]).unwrap();

        assert_eq!(out.schema.fields[0].data_type, DataType::Utf8);
        assert_eq!(out.schema.fields[1].data_type, DataType::Float64);
        assert_eq!(out.schema.fields[2].data_type, DataType::Utf8);

        let a: Vec<Value> = out.column(1).cloned().collect();
        assert_eq!(
            a,
            vec![
                Value::Float64(1234.56),
                Value::Float64(0.0),
                Value::Float64(1234.56),
                Value::Float64(10.0),
            ]
        );
        assert_eq!(out.rows[2][2], Value::from("abc"));
        assert_eq!(out.rows[3][0], Value::Null);
    }

    #[test]
    fn normalize_candidates_skip_time_axis() {
        let ds = sample();
        let cols = numeric_candidates(&ds);
        assert_eq!(cols, vec!["Cartera A", "Cartera B"]);

        let out = normalize_columns(&ds, &cols).unwrap();
        let b: Vec<Value> = out.column(2).cloned().collect();
        assert_eq!(
            b,
            vec![
                Value::Float64(7.15),
                Value::Float64(7.2),
                Value::Float64(0.0),
                Value::Float64(0.0),
            ]
        );
    }

    #[test]
    fn normalize_rejects_unknown_column() {
        assert!(normalize_columns(&sample(), &["nope"]).is_err());
    }

    #[test]
    fn short_rows_are_padded_with_nulls() {
        let ds = DataSet::new(
            Schema::utf8(["t", "v", "w"]),
            vec![vec![Value::from("2024")], vec![Value::from("2025"), Value::from("1,5")]],
        );

        let out = normalize_columns(&ds, &["v"]).unwrap();
        assert_eq!(out.rows[0], vec![Value::from("2024"), Value::Float64(0.0), Value::Null]);
        assert_eq!(out.rows[1], vec![Value::from("2025"), Value::Float64(1.5), Value::Null]);

        let filled = apply_null_policy(&ds, NullPolicy::FillZero);
        assert_eq!(filled.rows[0], vec![Value::from("2024"), Value::from("0"), Value::from("0")]);

        // Missing trailing cells count as nulls.
        assert_eq!(apply_null_policy(&ds, NullPolicy::Drop).row_count(), 0);

        let selected = select_columns(&ds, &["w", "t"]).unwrap();
        assert_eq!(selected.rows[0], vec![Value::Null, Value::from("2024")]);
    }
}
