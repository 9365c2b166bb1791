//! Date-indexed table of named float columns with missing cells.
//!
//! `DateFrame` is the in-memory shape shared by the whole pipeline:
//!
//! - rows are calendar dates, kept sorted ascending
//! - columns are named series (state codes, benchmark label, ...)
//! - cells are `Option<f64>` so joins can leave holes where date ranges
//!   don't overlap
//!
//! Derived views (`fill`), resampling (`resample`) and correlation (`corr`)
//! all consume this type without mutating it.

use std::collections::BTreeSet;
use std::collections::HashMap;

use chrono::NaiveDate;

pub mod corr;
pub mod fill;
pub mod resample;

pub use corr::*;
pub use fill::*;
pub use resample::*;

/// A date-indexed table. Rows are sorted by date; cells may be missing.
#[derive(Debug, Clone, PartialEq)]
pub struct DateFrame {
    dates: Vec<NaiveDate>,
    columns: Vec<String>,
    /// Row-major cells: `cells[row][col]`.
    cells: Vec<Vec<Option<f64>>>,
}

impl DateFrame {
    /// An empty frame (no rows, no columns).
    pub fn new() -> Self {
        Self {
            dates: Vec::new(),
            columns: Vec::new(),
            cells: Vec::new(),
        }
    }

    /// Build a single-column frame from raw observations.
    ///
    /// Observations are sorted by date; duplicates are kept last-wins.
    pub fn from_series(name: &str, observations: &[(NaiveDate, f64)]) -> Self {
        let mut sorted = observations.to_vec();
        sorted.sort_by_key(|(d, _)| *d);

        let mut dates: Vec<NaiveDate> = Vec::with_capacity(sorted.len());
        let mut cells: Vec<Vec<Option<f64>>> = Vec::with_capacity(sorted.len());
        for (date, value) in sorted {
            if dates.last() == Some(&date) {
                if let Some(last) = cells.last_mut() {
                    *last = vec![Some(value)];
                }
            } else {
                dates.push(date);
                cells.push(vec![Some(value)]);
            }
        }

        Self {
            dates,
            columns: vec![name.to_string()],
            cells,
        }
    }

    /// Build a frame from parsed parts (used by the CSV loader).
    ///
    /// Rows are re-sorted by date; column/row shapes must already agree.
    pub fn from_parts(
        columns: Vec<String>,
        rows: Vec<(NaiveDate, Vec<Option<f64>>)>,
    ) -> Self {
        let mut rows = rows;
        rows.sort_by_key(|(d, _)| *d);

        let mut dates = Vec::with_capacity(rows.len());
        let mut cells = Vec::with_capacity(rows.len());
        for (date, row) in rows {
            dates.push(date);
            cells.push(row);
        }

        Self {
            dates,
            columns,
            cells,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn n_rows(&self) -> usize {
        self.dates.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell accessor; `None` for a missing value.
    pub fn value(&self, row: usize, col: usize) -> Option<f64> {
        self.cells[row][col]
    }

    /// One whole row of cells.
    pub fn row(&self, row: usize) -> &[Option<f64>] {
        &self.cells[row]
    }

    /// One column as `(date, value)` pairs, including missing cells.
    pub fn column(&self, name: &str) -> Option<Vec<(NaiveDate, Option<f64>)>> {
        let col = self.column_index(name)?;
        Some(
            self.dates
                .iter()
                .zip(self.cells.iter())
                .map(|(d, row)| (*d, row[col]))
                .collect(),
        )
    }

    /// Non-missing values of one column, in date order.
    pub fn column_values(&self, name: &str) -> Option<Vec<(NaiveDate, f64)>> {
        let col = self.column_index(name)?;
        Some(
            self.dates
                .iter()
                .zip(self.cells.iter())
                .filter_map(|(d, row)| row[col].map(|v| (*d, v)))
                .collect(),
        )
    }

    /// Outer-join two frames on date.
    ///
    /// The result's row set is the union of both date sets; cells are missing
    /// wherever a date is absent in one input. Column order is `self`'s
    /// columns followed by `other`'s.
    pub fn outer_join(&self, other: &DateFrame) -> DateFrame {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }

        let union: BTreeSet<NaiveDate> = self
            .dates
            .iter()
            .chain(other.dates.iter())
            .copied()
            .collect();

        let left_rows: HashMap<NaiveDate, usize> =
            self.dates.iter().enumerate().map(|(i, d)| (*d, i)).collect();
        let right_rows: HashMap<NaiveDate, usize> = other
            .dates
            .iter()
            .enumerate()
            .map(|(i, d)| (*d, i))
            .collect();

        let mut columns = self.columns.clone();
        columns.extend(other.columns.iter().cloned());

        let mut dates = Vec::with_capacity(union.len());
        let mut cells = Vec::with_capacity(union.len());
        for date in union {
            let mut row: Vec<Option<f64>> = match left_rows.get(&date) {
                Some(&i) => self.cells[i].clone(),
                None => vec![None; self.n_cols()],
            };
            match right_rows.get(&date) {
                Some(&i) => row.extend(other.cells[i].iter().copied()),
                None => row.extend(std::iter::repeat(None).take(other.n_cols())),
            }
            dates.push(date);
            cells.push(row);
        }

        DateFrame {
            dates,
            columns,
            cells,
        }
    }

    /// A copy restricted to the named columns (in the given order).
    ///
    /// Unknown names are silently skipped; rows are kept as-is.
    pub fn select(&self, names: &[&str]) -> DateFrame {
        let indices: Vec<usize> = names
            .iter()
            .filter_map(|n| self.column_index(n))
            .collect();

        DateFrame {
            dates: self.dates.clone(),
            columns: indices.iter().map(|&i| self.columns[i].clone()).collect(),
            cells: self
                .cells
                .iter()
                .map(|row| indices.iter().map(|&i| row[i]).collect())
                .collect(),
        }
    }
}

impl Default for DateFrame {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}
