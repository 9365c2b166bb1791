//! Pairwise-complete Pearson correlation across frame columns.
//!
//! For each column pair only rows where *both* cells are present enter the
//! computation, so partially overlapping series still correlate over their
//! common segment. Pairs with fewer than two common points (or a constant
//! series) yield `NaN`.

use rayon::prelude::*;

use crate::frame::DateFrame;

/// A symmetric correlation matrix with its column labels.
#[derive(Debug, Clone)]
pub struct CorrMatrix {
    pub labels: Vec<String>,
    /// `values[i][j]` is the correlation between labels `i` and `j`.
    pub values: Vec<Vec<f64>>,
}

/// Per-column summary of a correlation matrix (count/mean/std/quartiles).
#[derive(Debug, Clone)]
pub struct ColumnSummary {
    pub label: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

impl DateFrame {
    /// Correlation between every pair of columns.
    ///
    /// The upper triangle is computed in parallel; the diagonal is 1.0 for
    /// any column with at least one observation.
    pub fn corr_matrix(&self) -> CorrMatrix {
        let n = self.n_cols();

        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| (i..n).map(move |j| (i, j)))
            .collect();

        let computed: Vec<((usize, usize), f64)> = pairs
            .into_par_iter()
            .map(|(i, j)| ((i, j), self.pairwise_corr(i, j)))
            .collect();

        let mut values = vec![vec![f64::NAN; n]; n];
        for ((i, j), r) in computed {
            values[i][j] = r;
            values[j][i] = r;
        }

        CorrMatrix {
            labels: self.columns().to_vec(),
            values,
        }
    }

    fn pairwise_corr(&self, a: usize, b: usize) -> f64 {
        let mut xs = Vec::new();
        let mut ys = Vec::new();
        for r in 0..self.n_rows() {
            if let (Some(x), Some(y)) = (self.value(r, a), self.value(r, b)) {
                xs.push(x);
                ys.push(y);
            }
        }

        if a == b {
            return if xs.is_empty() { f64::NAN } else { 1.0 };
        }

        let n = xs.len();
        if n < 2 {
            return f64::NAN;
        }

        let mean_x = xs.iter().sum::<f64>() / n as f64;
        let mean_y = ys.iter().sum::<f64>() / n as f64;

        let mut cov = 0.0;
        let mut var_x = 0.0;
        let mut var_y = 0.0;
        for (x, y) in xs.iter().zip(ys.iter()) {
            let dx = x - mean_x;
            let dy = y - mean_y;
            cov += dx * dy;
            var_x += dx * dx;
            var_y += dy * dy;
        }

        if var_x <= 0.0 || var_y <= 0.0 {
            return f64::NAN;
        }
        cov / (var_x.sqrt() * var_y.sqrt())
    }
}

impl CorrMatrix {
    /// Summarize each matrix column over its finite entries.
    pub fn describe(&self) -> Vec<ColumnSummary> {
        self.labels
            .iter()
            .enumerate()
            .map(|(j, label)| {
                let mut values: Vec<f64> = self
                    .values
                    .iter()
                    .map(|row| row[j])
                    .filter(|v| v.is_finite())
                    .collect();
                values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
                summarize(label, &values)
            })
            .collect()
    }
}

fn summarize(label: &str, sorted: &[f64]) -> ColumnSummary {
    let count = sorted.len();
    if count == 0 {
        return ColumnSummary {
            label: label.to_string(),
            count,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q25: f64::NAN,
            q50: f64::NAN,
            q75: f64::NAN,
            max: f64::NAN,
        };
    }

    let mean = sorted.iter().sum::<f64>() / count as f64;
    let std = if count < 2 {
        f64::NAN
    } else {
        let var = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count as f64 - 1.0);
        var.sqrt()
    };

    ColumnSummary {
        label: label.to_string(),
        count,
        mean,
        std,
        min: sorted[0],
        q25: percentile(sorted, 0.25),
        q50: percentile(sorted, 0.50),
        q75: percentile(sorted, 0.75),
        max: sorted[count - 1],
    }
}

/// Linear-interpolated percentile over an ascending-sorted slice.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let h = (n as f64 - 1.0) * p;
    let lo = h.floor() as usize;
    let frac = h - lo as f64;
    if lo + 1 >= n {
        return sorted[n - 1];
    }
    sorted[lo] + frac * (sorted[lo + 1] - sorted[lo])
}
