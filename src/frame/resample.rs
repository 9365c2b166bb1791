//! Downsample a monthly column into calendar-year buckets.

use chrono::{Datelike, NaiveDate};

use crate::error::AppError;
use crate::frame::DateFrame;

impl DateFrame {
    /// Average one column over `years`-sized calendar buckets.
    ///
    /// Buckets are anchored at the column's first observation year and
    /// labeled with the last day of their final year. Missing source cells
    /// are simply excluded from the bucket mean (mean-skip-missing); a
    /// bucket with no observations produces no output point. No
    /// interpolation is performed.
    pub fn resample_mean(&self, column: &str, years: u32) -> Result<Vec<(NaiveDate, f64)>, AppError> {
        if years == 0 {
            return Err(AppError::config("Resample period must be at least 1 year."));
        }
        let col = self
            .column_index(column)
            .ok_or_else(|| AppError::data(format!("Unknown column '{column}'.")))?;

        let mut anchor_year: Option<i32> = None;
        // bucket index -> (sum, count)
        let mut buckets: Vec<(f64, usize)> = Vec::new();

        for (r, date) in self.dates().iter().enumerate() {
            let Some(value) = self.value(r, col) else {
                continue;
            };
            let anchor = *anchor_year.get_or_insert(date.year());
            let idx = ((date.year() - anchor) / years as i32) as usize;
            if idx >= buckets.len() {
                buckets.resize(idx + 1, (0.0, 0));
            }
            buckets[idx].0 += value;
            buckets[idx].1 += 1;
        }

        let Some(anchor) = anchor_year else {
            return Ok(Vec::new());
        };

        let mut out = Vec::new();
        for (idx, (sum, count)) in buckets.into_iter().enumerate() {
            if count == 0 {
                continue;
            }
            let end_year = anchor + (idx as i32 + 1) * years as i32 - 1;
            let label = NaiveDate::from_ymd_opt(end_year, 12, 31)
                .ok_or_else(|| AppError::data(format!("Invalid bucket year {end_year}.")))?;
            out.push((label, sum / count as f64));
        }
        Ok(out)
    }
}
