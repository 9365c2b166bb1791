//! Missing-data views of a `DateFrame`.
//!
//! Each policy derives an independent copy; nothing mutates the source
//! frame. The five-view bundle mirrors the comparison table the `missing`
//! subcommand prints.

use crate::domain::FillPolicy;
use crate::frame::DateFrame;

/// The five independent missing-data views of one frame.
#[derive(Debug, Clone)]
pub struct MissingViews {
    pub dropped_any: DateFrame,
    pub dropped_all: DateFrame,
    pub filled_const: DateFrame,
    pub filled_forward: DateFrame,
    pub filled_backward: DateFrame,
}

impl DateFrame {
    /// Derive a view of this frame under one missing-data policy.
    pub fn with_policy(&self, policy: FillPolicy) -> DateFrame {
        match policy {
            FillPolicy::DropAny => self.retain_rows(|row| row.iter().all(Option::is_some)),
            FillPolicy::DropAll => self.retain_rows(|row| row.iter().any(Option::is_some)),
            FillPolicy::Constant(v) => self.map_columns(|cells| {
                for cell in cells.iter_mut() {
                    if cell.is_none() {
                        *cell = Some(v);
                    }
                }
            }),
            FillPolicy::Forward => self.map_columns(|cells| {
                let mut last = None;
                for cell in cells.iter_mut() {
                    match *cell {
                        Some(v) => last = Some(v),
                        None => *cell = last,
                    }
                }
            }),
            FillPolicy::Backward => self.map_columns(|cells| {
                let mut next = None;
                for cell in cells.iter_mut().rev() {
                    match *cell {
                        Some(v) => next = Some(v),
                        None => *cell = next,
                    }
                }
            }),
        }
    }

    /// All five policy views at once, for side-by-side inspection.
    pub fn missing_views(&self, sentinel: f64) -> MissingViews {
        MissingViews {
            dropped_any: self.with_policy(FillPolicy::DropAny),
            dropped_all: self.with_policy(FillPolicy::DropAll),
            filled_const: self.with_policy(FillPolicy::Constant(sentinel)),
            filled_forward: self.with_policy(FillPolicy::Forward),
            filled_backward: self.with_policy(FillPolicy::Backward),
        }
    }

    fn retain_rows(&self, keep: impl Fn(&[Option<f64>]) -> bool) -> DateFrame {
        let mut rows = Vec::new();
        for (r, date) in self.dates().iter().enumerate() {
            if keep(self.row(r)) {
                rows.push((*date, self.row(r).to_vec()));
            }
        }
        DateFrame::from_parts(self.columns().to_vec(), rows)
    }

    /// Apply a per-column transform over a copy of the cells.
    fn map_columns(&self, f: impl Fn(&mut [Option<f64>])) -> DateFrame {
        let n_rows = self.n_rows();
        let n_cols = self.n_cols();

        let mut by_col: Vec<Vec<Option<f64>>> = (0..n_cols)
            .map(|c| (0..n_rows).map(|r| self.value(r, c)).collect())
            .collect();
        for cells in by_col.iter_mut() {
            f(cells);
        }

        let rows = self
            .dates()
            .iter()
            .enumerate()
            .map(|(r, date)| (*date, (0..n_cols).map(|c| by_col[c][r]).collect()))
            .collect();
        DateFrame::from_parts(self.columns().to_vec(), rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::d;

    /// A: gap at t1 (middle), B: leading gap at t0 and trailing gap at t3.
    fn gappy() -> DateFrame {
        DateFrame::from_parts(
            vec!["A".to_string(), "B".to_string()],
            vec![
                (d(2020, 1, 1), vec![Some(1.0), None]),
                (d(2020, 2, 1), vec![None, Some(20.0)]),
                (d(2020, 3, 1), vec![Some(3.0), Some(30.0)]),
                (d(2020, 4, 1), vec![Some(4.0), None]),
                (d(2020, 5, 1), vec![None, None]),
            ],
        )
    }

    fn has_missing(frame: &DateFrame) -> bool {
        (0..frame.n_rows())
            .any(|r| (0..frame.n_cols()).any(|c| frame.value(r, c).is_none()))
    }

    #[test]
    fn drop_any_leaves_no_missing_cells() {
        let view = gappy().with_policy(FillPolicy::DropAny);
        assert_eq!(view.n_rows(), 1);
        assert_eq!(view.dates(), &[d(2020, 3, 1)]);
        assert!(!has_missing(&view));
    }

    #[test]
    fn drop_all_keeps_partially_filled_rows() {
        let view = gappy().with_policy(FillPolicy::DropAll);
        // Only the all-missing row at t4 goes away.
        assert_eq!(view.n_rows(), 4);
        assert!(view.dates().iter().all(|&dt| dt != d(2020, 5, 1)));
    }

    #[test]
    fn constant_fill_uses_sentinel() {
        let view = gappy().with_policy(FillPolicy::Constant(-999.0));
        assert!(!has_missing(&view));
        assert_eq!(view.value(0, 1), Some(-999.0));
        assert_eq!(view.value(4, 0), Some(-999.0));
    }

    #[test]
    fn forward_fill_leaves_leading_gaps() {
        let view = gappy().with_policy(FillPolicy::Forward);
        // A's middle gap takes the prior value; B's leading gap stays.
        assert_eq!(view.value(1, 0), Some(1.0));
        assert_eq!(view.value(0, 1), None);
        // Trailing gaps carry the last observation forward.
        assert_eq!(view.value(4, 0), Some(4.0));
        assert_eq!(view.value(4, 1), Some(30.0));
    }

    #[test]
    fn backward_fill_leaves_trailing_gaps() {
        let view = gappy().with_policy(FillPolicy::Backward);
        assert_eq!(view.value(1, 0), Some(3.0));
        assert_eq!(view.value(0, 1), Some(20.0));
        assert_eq!(view.value(4, 0), None);
        assert_eq!(view.value(4, 1), None);
    }

    #[test]
    fn views_do_not_disturb_each_other_or_the_source() {
        let frame = gappy();
        let views = frame.missing_views(-999.0);

        // Source untouched.
        assert_eq!(frame, gappy());
        // Each view is independent.
        assert!(has_missing(&views.filled_forward));
        assert!(!has_missing(&views.filled_const));
        assert_eq!(views.dropped_all.n_rows(), 4);
    }

    #[test]
    fn forward_then_backward_matches_original_on_covered_segment() {
        let frame = gappy();
        let ffb = frame
            .with_policy(FillPolicy::Forward)
            .with_policy(FillPolicy::Backward);

        // Everywhere the original had a value, the composed view agrees.
        for r in 0..frame.n_rows() {
            for c in 0..frame.n_cols() {
                if let Some(v) = frame.value(r, c) {
                    assert_eq!(ffb.value(r, c), Some(v));
                }
            }
        }
    }

    #[test]
    fn forward_fill_with_no_prior_value_stays_missing() {
        // AK has no value before t0, so forward fill leaves t0 missing.
        let tx = DateFrame::from_series(
            "TX",
            &[(d(2020, 1, 1), 100.0), (d(2020, 2, 1), 110.0), (d(2020, 3, 1), 121.0)],
        );
        let ak = DateFrame::from_series("AK", &[(d(2020, 2, 1), 50.0), (d(2020, 3, 1), 55.0)]);
        let joined = tx.outer_join(&ak);

        let filled = joined.with_policy(FillPolicy::Forward);
        assert_eq!(filled.value(0, 1), None);
        assert_eq!(filled.value(1, 1), Some(50.0));
        assert_eq!(filled.value(2, 1), Some(55.0));
    }
}
