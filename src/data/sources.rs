//! `CachedSource` implementations for the HPI panel and benchmark.

use std::path::{Path, PathBuf};

use crate::cache::CachedSource;
use crate::data::{SeriesProvider, rebase_to_100};
use crate::domain::BENCHMARK_LABEL;
use crate::error::AppError;
use crate::frame::DateFrame;
use crate::io::{read_frame_csv, write_frame_csv};

/// The joined per-state panel: one rebased column per state code.
pub struct PanelSource<'a> {
    pub cache_path: PathBuf,
    pub states: &'a [String],
    pub provider: &'a dyn SeriesProvider,
}

impl CachedSource for PanelSource<'_> {
    type Value = DateFrame;

    fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    fn load(&self) -> Result<DateFrame, AppError> {
        // Cached contents are returned verbatim; nothing checks that the
        // columns still match the requested state list.
        read_frame_csv(&self.cache_path)
    }

    fn fetch_remote(&self) -> Result<DateFrame, AppError> {
        let mut panel = DateFrame::new();
        for state in self.states {
            eprintln!("fetching HPI for {state}");
            let mut observations = self.provider.fetch_series(state)?;
            rebase_to_100(&mut observations)?;
            let column = DateFrame::from_series(state, &observations);
            panel = panel.outer_join(&column);
        }
        if panel.is_empty() {
            return Err(AppError::data("No state series were fetched."));
        }
        Ok(panel)
    }

    fn persist(&self, value: &DateFrame) -> Result<(), AppError> {
        write_frame_csv(&self.cache_path, value)
    }
}

/// The single national-average benchmark series.
pub struct BenchmarkSource<'a> {
    pub cache_path: PathBuf,
    pub provider: &'a dyn SeriesProvider,
}

/// Dataset code for the national aggregate.
const BENCHMARK_CODE: &str = "USA";

impl CachedSource for BenchmarkSource<'_> {
    type Value = DateFrame;

    fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    fn load(&self) -> Result<DateFrame, AppError> {
        read_frame_csv(&self.cache_path)
    }

    fn fetch_remote(&self) -> Result<DateFrame, AppError> {
        eprintln!("fetching national average HPI");
        let mut observations = self.provider.fetch_series(BENCHMARK_CODE)?;
        rebase_to_100(&mut observations)?;
        Ok(DateFrame::from_series(BENCHMARK_LABEL, &observations))
    }

    fn persist(&self, value: &DateFrame) -> Result<(), AppError> {
        write_frame_csv(&self.cache_path, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::load_or_fetch;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// Serves fixed raw series keyed by code.
    struct FixedProvider;

    impl SeriesProvider for FixedProvider {
        fn fetch_series(&self, code: &str) -> Result<Vec<(NaiveDate, f64)>, AppError> {
            match code {
                "TX" => Ok(vec![
                    (d(2020, 1, 1), 50.0),
                    (d(2020, 2, 1), 55.0),
                    (d(2020, 3, 1), 60.5),
                ]),
                "AK" => Ok(vec![(d(2020, 2, 1), 200.0), (d(2020, 3, 1), 220.0)]),
                "USA" => Ok(vec![(d(2020, 1, 1), 4.0), (d(2020, 2, 1), 5.0)]),
                other => Err(AppError::remote(format!("unknown code {other}"))),
            }
        }
    }

    fn states() -> Vec<String> {
        vec!["TX".to_string(), "AK".to_string()]
    }

    #[test]
    fn panel_fetch_rebases_and_joins() {
        let dir = tempfile::tempdir().unwrap();
        let states = states();
        let source = PanelSource {
            cache_path: dir.path().join("panel.csv"),
            states: &states,
            provider: &FixedProvider,
        };

        let panel = load_or_fetch(&source).unwrap();
        assert_eq!(panel.columns(), &["TX".to_string(), "AK".to_string()]);
        assert_eq!(panel.n_rows(), 3);

        // Every column is independently rebased to 100 at its own start.
        assert_eq!(panel.value(0, 0), Some(100.0));
        assert_eq!(panel.value(1, 1), Some(100.0));
        // AK has no observation at the panel's first date.
        assert_eq!(panel.value(0, 1), None);
    }

    #[test]
    fn panel_cache_hit_skips_the_provider() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panel.csv");
        let states = states();

        let fetched = load_or_fetch(&PanelSource {
            cache_path: path.clone(),
            states: &states,
            provider: &FixedProvider,
        })
        .unwrap();

        // Second run with a provider that refuses every code: must load.
        struct FailingProvider;
        impl SeriesProvider for FailingProvider {
            fn fetch_series(&self, _: &str) -> Result<Vec<(NaiveDate, f64)>, AppError> {
                Err(AppError::remote("network should not be touched"))
            }
        }

        let cached = load_or_fetch(&PanelSource {
            cache_path: path,
            states: &states,
            provider: &FailingProvider,
        })
        .unwrap();
        assert_eq!(cached, fetched);
    }

    #[test]
    fn benchmark_fetch_rebases_single_column() {
        let dir = tempfile::tempdir().unwrap();
        let source = BenchmarkSource {
            cache_path: dir.path().join("avg.csv"),
            provider: &FixedProvider,
        };

        let benchmark = load_or_fetch(&source).unwrap();
        assert_eq!(benchmark.columns(), &[BENCHMARK_LABEL.to_string()]);
        assert_eq!(benchmark.value(0, 0), Some(100.0));
        assert_eq!(benchmark.value(1, 0), Some(125.0));
    }

    #[test]
    fn empty_state_list_is_a_data_error() {
        let dir = tempfile::tempdir().unwrap();
        let states: Vec<String> = Vec::new();
        let source = PanelSource {
            cache_path: dir.path().join("panel.csv"),
            states: &states,
            provider: &FixedProvider,
        };
        assert_eq!(load_or_fetch(&source).unwrap_err().exit_code(), 3);
    }
}
