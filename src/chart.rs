//! Time-series extraction and SVG line-chart rendering.

use std::fmt;

use crate::error::SuiteResult;
use crate::normalize::clean_number;
use crate::types::DataSet;

/// One numeric column plotted against a label column, in row order.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    /// Name of the time (x) column.
    pub x_label: String,
    /// Name of the value (y) column.
    pub y_label: String,
    /// `(time label, value)` pairs.
    pub points: Vec<(String, f64)>,
}

impl TimeSeries {
    /// Build a series from two columns of a table.
    ///
    /// Time cells are used as text (`Null` becomes an empty label); value cells go through
    /// [`clean_number`], so an uncleaned table plots the same as a cleaned one.
    pub fn from_dataset(ds: &DataSet, time_column: &str, value_column: &str) -> SuiteResult<Self> {
        let x = ds.schema.require_index(time_column)?;
        let y = ds.schema.require_index(value_column)?;
        let points = ds
            .column(x)
            .zip(ds.column(y))
            .map(|(t, v)| (t.to_string(), clean_number(v)))
            .collect();
        Ok(Self {
            x_label: time_column.to_owned(),
            y_label: value_column.to_owned(),
            points,
        })
    }

    /// Smallest and largest value, or `None` for an empty series.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.points.iter().map(|(_, v)| *v).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

/// Size and labelling knobs for [`render_svg`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartOptions {
    pub width: f64,
    pub height: f64,
    /// Upper bound on x-axis labels drawn; the rest are skipped evenly.
    pub max_x_labels: usize,
    pub markers: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 480.0,
            max_x_labels: 12,
            markers: true,
        }
    }
}

const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 48.0;
const MARGIN_BOTTOM: f64 = 64.0;
const LINE_COLOR: &str = "#03A9F4";

/// Render a standalone SVG document with a line (and optional markers) for `series`.
pub fn render_svg(series: &TimeSeries, opts: &ChartOptions) -> String {
    let mut svg = String::new();
    // Writing into a `String` cannot fail.
    write_svg(&mut svg, series, opts).map(|()| svg).unwrap_or_default()
}

/// Write the SVG document for `series` into any [`fmt::Write`] sink.
pub fn write_svg<W: fmt::Write>(svg: &mut W, series: &TimeSeries, opts: &ChartOptions) -> fmt::Result {
    let (w, h) = (opts.width, opts.height);
    let plot_w = (w - MARGIN_LEFT - MARGIN_RIGHT).max(1.0);
    let plot_h = (h - MARGIN_TOP - MARGIN_BOTTOM).max(1.0);
    let bottom = MARGIN_TOP + plot_h;

    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif" font-size="12">"#
    )?;
    writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#)?;
    writeln!(
        svg,
        r#"<text x="{:.2}" y="28" text-anchor="middle" font-size="16">Evolution: {}</text>"#,
        w / 2.0,
        escape_xml(&series.y_label)
    )?;
    writeln!(
        svg,
        r#"<line x1="{MARGIN_LEFT}" y1="{bottom:.2}" x2="{:.2}" y2="{bottom:.2}" stroke="black"/>"#,
        MARGIN_LEFT + plot_w
    )?;
    writeln!(
        svg,
        r#"<line x1="{MARGIN_LEFT}" y1="{MARGIN_TOP}" x2="{MARGIN_LEFT}" y2="{bottom:.2}" stroke="black"/>"#
    )?;
    writeln!(
        svg,
        r#"<text x="{:.2}" y="{:.2}" text-anchor="middle">{}</text>"#,
        MARGIN_LEFT + plot_w / 2.0,
        h - 12.0,
        escape_xml(&series.x_label)
    )?;
    writeln!(
        svg,
        r#"<text x="16" y="{:.2}" text-anchor="middle" transform="rotate(-90 16 {:.2})">Value</text>"#,
        MARGIN_TOP + plot_h / 2.0,
        MARGIN_TOP + plot_h / 2.0
    )?;

    let Some((lo, hi)) = series.value_range() else {
        writeln!(
            svg,
            r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" fill="gray">no data</text>"#,
            MARGIN_LEFT + plot_w / 2.0,
            MARGIN_TOP + plot_h / 2.0
        )?;
        return svg.write_str("</svg>\n");
    };
    // Flat series get a unit range centred on the value.
    let (lo, hi) = if hi > lo { (lo, hi) } else { (lo - 0.5, hi + 0.5) };

    let n = series.points.len();
    let x_at = |i: usize| {
        if n == 1 {
            MARGIN_LEFT + plot_w / 2.0
        } else {
            MARGIN_LEFT + plot_w * i as f64 / (n - 1) as f64
        }
    };
    let y_at = |v: f64| MARGIN_TOP + (hi - v) / (hi - lo) * plot_h;

    for v in [lo, (lo + hi) / 2.0, hi] {
        let y = y_at(v);
        writeln!(
            svg,
            r##"<line x1="{MARGIN_LEFT}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}" stroke="#e0e0e0"/>"##,
            MARGIN_LEFT + plot_w
        )?;
        writeln!(
            svg,
            r#"<text x="{:.2}" y="{:.2}" text-anchor="end">{}</text>"#,
            MARGIN_LEFT - 6.0,
            y + 4.0,
            format_tick(v)
        )?;
    }

    let step = n.div_ceil(opts.max_x_labels.max(1));
    for (i, (label, _)) in series.points.iter().enumerate().step_by(step) {
        writeln!(
            svg,
            r#"<text x="{:.2}" y="{:.2}" text-anchor="middle">{}</text>"#,
            x_at(i),
            bottom + 18.0,
            escape_xml(label)
        )?;
    }

    let points = series
        .points
        .iter()
        .enumerate()
        .map(|(i, (_, v))| format!("{:.2},{:.2}", x_at(i), y_at(*v)))
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(
        svg,
        r#"<polyline points="{points}" fill="none" stroke="{LINE_COLOR}" stroke-width="2"/>"#
    )?;

    if opts.markers {
        for (i, (label, v)) in series.points.iter().enumerate() {
            writeln!(
                svg,
                r#"<circle cx="{:.2}" cy="{:.2}" r="3" fill="{LINE_COLOR}"><title>{}: {}</title></circle>"#,
                x_at(i),
                y_at(*v),
                escape_xml(label),
                v
            )?;
        }
    }

    svg.write_str("</svg>\n")
}

fn format_tick(v: f64) -> String {
    if v.abs() >= 1000.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
