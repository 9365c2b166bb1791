//! Plain-text tables for frames, correlation matrices, and summaries.

use chrono::NaiveDate;

use crate::frame::{ColumnSummary, CorrMatrix, DateFrame, MissingViews};

const VALUE_WIDTH: usize = 10;
const DATE_WIDTH: usize = 10;

/// Format the first `n` rows of a frame as an aligned table.
///
/// Missing cells print as `NaN`, matching the way the tables read when the
/// cache files are opened in other tools.
pub fn format_frame_head(frame: &DateFrame, n: usize) -> String {
    let mut out = String::new();

    out.push_str(&format!("{:<DATE_WIDTH$}", "Date"));
    for label in frame.columns() {
        out.push_str(&format!(" {label:>VALUE_WIDTH$}"));
    }
    out.push('\n');

    for (r, date) in frame.dates().iter().take(n).enumerate() {
        out.push_str(&format!("{date:<DATE_WIDTH$}"));
        for c in 0..frame.n_cols() {
            out.push_str(&format!(" {:>VALUE_WIDTH$}", fmt_cell(frame.value(r, c))));
        }
        out.push('\n');
    }

    if frame.n_rows() > n {
        out.push_str(&format!("... {} rows total\n", frame.n_rows()));
    }
    out
}

/// Format the first `n` points of a plain series.
pub fn format_series_head(label: &str, series: &[(NaiveDate, f64)], n: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<DATE_WIDTH$} {label:>VALUE_WIDTH$}\n", "Date"));
    for (date, value) in series.iter().take(n) {
        out.push_str(&format!("{date:<DATE_WIDTH$} {value:>VALUE_WIDTH$.2}\n"));
    }
    if series.len() > n {
        out.push_str(&format!("... {} points total\n", series.len()));
    }
    out
}

/// Format the full correlation matrix with row/column labels.
pub fn format_corr_matrix(matrix: &CorrMatrix) -> String {
    let label_width = matrix
        .labels
        .iter()
        .map(String::len)
        .max()
        .unwrap_or(4)
        .max(4);

    let mut out = String::new();
    out.push_str(&" ".repeat(label_width));
    for label in &matrix.labels {
        out.push_str(&format!(" {label:>8}"));
    }
    out.push('\n');

    for (i, label) in matrix.labels.iter().enumerate() {
        out.push_str(&format!("{label:<label_width$}"));
        for value in &matrix.values[i] {
            if value.is_finite() {
                out.push_str(&format!(" {value:>8.4}"));
            } else {
                out.push_str(&format!(" {:>8}", "NaN"));
            }
        }
        out.push('\n');
    }
    out
}

/// Format per-column summaries the way `describe()` tables usually read.
pub fn format_describe(summaries: &[ColumnSummary]) -> String {
    let label_width = summaries
        .iter()
        .map(|s| s.label.len())
        .max()
        .unwrap_or(5)
        .max(5);

    let mut out = String::new();
    out.push_str(&format!(
        "{:<label_width$} {:>6} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9}\n",
        "", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    ));
    for s in summaries {
        out.push_str(&format!(
            "{:<label_width$} {:>6} {} {} {} {} {} {} {}\n",
            s.label,
            s.count,
            fmt_stat(s.mean),
            fmt_stat(s.std),
            fmt_stat(s.min),
            fmt_stat(s.q25),
            fmt_stat(s.q50),
            fmt_stat(s.q75),
            fmt_stat(s.max),
        ));
    }
    out
}

/// Format all five missing-data views of a frame, head-only.
pub fn format_missing_views(views: &MissingViews, n: usize) -> String {
    let mut out = String::new();
    for (title, view) in [
        ("After dropping rows with missing cells in any column", &views.dropped_any),
        ("After dropping rows where every column is missing", &views.dropped_all),
        ("After replacing missing cells with the sentinel", &views.filled_const),
        ("After filling forward", &views.filled_forward),
        ("After filling backward", &views.filled_backward),
    ] {
        out.push_str(title);
        out.push('\n');
        out.push_str(&format_frame_head(view, n));
        out.push('\n');
    }
    out
}

fn fmt_cell(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "NaN".to_string(),
    }
}

fn fmt_stat(value: f64) -> String {
    if value.is_finite() {
        format!("{value:>9.4}")
    } else {
        format!("{:>9}", "NaN")
    }
}
