//! CSV persistence for `DateFrame`.
//!
//! The cache format is a plain delimited table: header row `Date,<col>,...`,
//! then one row per date with ISO dates in the first column and one value
//! column per series. Missing cells are written as empty fields and read
//! back as missing, so a persist/load round trip is value-equivalent.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::error::AppError;
use crate::frame::DateFrame;

const DATE_HEADER: &str = "Date";

/// Write a frame to a CSV cache file.
pub fn write_frame_csv(path: &Path, frame: &DateFrame) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::config(format!("Failed to create cache CSV '{}': {e}", path.display()))
    })?;
    let mut writer = csv::Writer::from_writer(file);

    let mut header = vec![DATE_HEADER.to_string()];
    header.extend(frame.columns().iter().cloned());
    writer
        .write_record(&header)
        .map_err(|e| AppError::config(format!("Failed to write CSV header: {e}")))?;

    for (r, date) in frame.dates().iter().enumerate() {
        let mut record = vec![date.to_string()];
        for c in 0..frame.n_cols() {
            record.push(match frame.value(r, c) {
                Some(v) => format_cell(v),
                None => String::new(),
            });
        }
        writer
            .write_record(&record)
            .map_err(|e| AppError::config(format!("Failed to write CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::config(format!("Failed to flush CSV '{}': {e}", path.display())))?;
    Ok(())
}

/// Read a frame back from a CSV cache file.
///
/// The first column must hold ISO dates; every other header becomes a
/// column label. Contents are trusted as-is (no re-validation against the
/// requested keys).
pub fn read_frame_csv(path: &Path) -> Result<DateFrame, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::config(format!("Failed to open cache CSV '{}': {e}", path.display()))
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::config(format!("Failed to read CSV headers: {e}")))?
        .clone();
    if headers.is_empty() {
        return Err(AppError::data(format!(
            "Cache CSV '{}' has no header row.",
            path.display()
        )));
    }
    let columns: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header; CSV lines are 1-based.
        let line = idx + 2;
        let record =
            result.map_err(|e| AppError::data(format!("CSV parse error on line {line}: {e}")))?;
        rows.push(parse_row(&record, columns.len(), line)?);
    }

    Ok(DateFrame::from_parts(columns, rows))
}

fn parse_row(
    record: &StringRecord,
    n_cols: usize,
    line: usize,
) -> Result<(NaiveDate, Vec<Option<f64>>), AppError> {
    let raw_date = record
        .get(0)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::data(format!("Missing date on line {line}.")))?;
    let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
        .map_err(|e| AppError::data(format!("Invalid date '{raw_date}' on line {line}: {e}")))?;

    let mut cells = Vec::with_capacity(n_cols);
    for c in 0..n_cols {
        let raw = record.get(c + 1).map(str::trim).unwrap_or("");
        if raw.is_empty() {
            cells.push(None);
            continue;
        }
        let value = raw.parse::<f64>().map_err(|e| {
            AppError::data(format!("Invalid value '{raw}' on line {line}: {e}"))
        })?;
        cells.push(value.is_finite().then_some(value));
    }

    Ok((date, cells))
}

/// Format a cell without losing round-trip precision.
///
/// `{}` on f64 is shortest-round-trip in Rust, which is exactly what a
/// cache file needs.
fn format_cell(v: f64) -> String {
    format!("{v}")
}
