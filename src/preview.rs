//! Plain-text table rendering for terminal previews.

use crate::types::{DataSet, Value, cell};

const MAX_CELL_WIDTH: usize = 24;

/// Render up to `max_rows` rows as an aligned text table with a header and a row index.
///
/// Nulls print as `NaN`, cells longer than the column cap are cut with `…`, and a trailing
/// `[shown of total rows]` line is added when rows were omitted.
pub fn format_table(ds: &DataSet, max_rows: usize) -> String {
    let shown = ds.row_count().min(max_rows);
    let index_width = shown.saturating_sub(1).to_string().len();

    let header: Vec<String> = ds.schema.field_names().map(truncate).collect();
    let body: Vec<Vec<String>> = ds.rows[..shown]
        .iter()
        .map(|row| {
            (0..header.len())
                .map(|i| match cell(row, i) {
                    Value::Null => "NaN".to_string(),
                    v => truncate(&v.to_string()),
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|i| {
            body.iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(header[i].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    out.push_str(&" ".repeat(index_width));
    for (cell, w) in header.iter().zip(&widths) {
        out.push_str("  ");
        out.push_str(&pad(cell, *w));
    }
    out.push('\n');

    for (i, row) in body.iter().enumerate() {
        out.push_str(&format!("{i:>index_width$}"));
        for (cell, w) in row.iter().zip(&widths) {
            out.push_str("  ");
            out.push_str(&pad(cell, *w));
        }
        out.push('\n');
    }

    if shown < ds.row_count() {
        out.push_str(&format!("[{shown} of {} rows]\n", ds.row_count()));
    }
    out
}

fn truncate(s: &str) -> String {
    if s.chars().count() <= MAX_CELL_WIDTH {
        s.to_owned()
    } else {
        let mut t: String = s.chars().take(MAX_CELL_WIDTH - 1).collect();
        t.push('…');
        t
    }
}

/// Right-pad to `width` characters (counting chars, not bytes).
fn pad(s: &str, width: usize) -> String {
    let n = s.chars().count();
    format!("{s}{}", " ".repeat(width.saturating_sub(n)))
}
