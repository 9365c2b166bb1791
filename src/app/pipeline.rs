//! Shared pipeline logic used by every subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! credential -> state list -> panel cache-or-fetch -> benchmark cache-or-fetch
//!
//! The subcommand handlers can then focus on presentation (printing vs
//! plotting).

use crate::cache::load_or_fetch;
use crate::data::{
    BenchmarkSource, PanelSource, QuandlClient, SampleHpi, SeriesProvider, StateListSource,
    sample,
};
use crate::domain::{RunConfig, load_credential};
use crate::error::AppError;
use crate::frame::{DateFrame, MissingViews};

/// Everything a run loads before analysis starts.
#[derive(Debug, Clone)]
pub struct PanelOutput {
    pub states: Vec<String>,
    pub panel: DateFrame,
    pub benchmark: DateFrame,
}

/// Resolve the state list and load (or fetch) the panel and benchmark.
pub fn load_panel(config: &RunConfig) -> Result<PanelOutput, AppError> {
    let states = resolve_states(config)?;
    if states.is_empty() {
        return Err(AppError::data("No state codes resolved."));
    }

    let provider: Box<dyn SeriesProvider> = if config.sample {
        Box::new(SampleHpi::new(config.sample_seed))
    } else {
        Box::new(QuandlClient::new(load_credential(&config.key_file)?))
    };

    let panel = load_or_fetch(&PanelSource {
        cache_path: config.panel_cache_path(),
        states: &states,
        provider: provider.as_ref(),
    })?;

    let benchmark = load_or_fetch(&BenchmarkSource {
        cache_path: config.benchmark_cache_path(),
        provider: provider.as_ref(),
    })?;

    Ok(PanelOutput {
        states,
        panel,
        benchmark,
    })
}

/// The ordered state list: explicit flag, sample default, or cache-or-fetch.
fn resolve_states(config: &RunConfig) -> Result<Vec<String>, AppError> {
    if !config.states.is_empty() {
        return Ok(config
            .states
            .iter()
            .map(|s| s.trim().to_ascii_uppercase())
            .filter(|s| !s.is_empty())
            .collect());
    }
    if config.sample {
        return Ok(sample::DEFAULT_STATES.iter().map(|s| s.to_string()).collect());
    }
    load_or_fetch(&StateListSource::new(config.states_cache_path()))
}

/// Join a state's annual mean column into the panel and derive the five
/// missing-data views.
///
/// The annual column is labeled `<STATE>_A` and sits on year-end dates that
/// the monthly index does not contain, so the join itself manufactures the
/// gaps the views are meant to demonstrate.
pub fn missing_views_for_state(
    panel: &DateFrame,
    state: &str,
    sentinel: f64,
) -> Result<(DateFrame, MissingViews), AppError> {
    let annual = panel.resample_mean(state, 1)?;
    let label = format!("{state}_A");
    let joined = panel.outer_join(&DateFrame::from_series(&label, &annual));
    let views = joined.missing_views(sentinel);
    Ok((joined, views))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BENCHMARK_LABEL, FILL_SENTINEL};

    fn sample_config(dir: &std::path::Path) -> RunConfig {
        RunConfig {
            cache_dir: dir.to_path_buf(),
            key_file: dir.join("quandl.key"),
            states: vec!["tx".to_string(), "ak".to_string()],
            sample: true,
            sample_seed: 42,
            top: 5,
        }
    }

    #[test]
    fn sample_run_builds_rebased_panel_and_benchmark() {
        let dir = tempfile::tempdir().unwrap();
        let out = load_panel(&sample_config(dir.path())).unwrap();

        assert_eq!(out.states, vec!["TX", "AK"]);
        assert_eq!(out.panel.columns(), &["TX".to_string(), "AK".to_string()]);
        assert_eq!(out.benchmark.columns(), &[BENCHMARK_LABEL.to_string()]);

        // Every column rebased to 100 at its first observation.
        assert_eq!(out.panel.value(0, 0), Some(100.0));
        assert_eq!(out.benchmark.value(0, 0), Some(100.0));

        // Cache files were written for the next run.
        assert!(dir.path().join(crate::domain::PANEL_CACHE_FILE).exists());
        assert!(dir.path().join(crate::domain::BENCHMARK_CACHE_FILE).exists());
    }

    #[test]
    fn second_sample_run_reads_back_the_same_panel() {
        let dir = tempfile::tempdir().unwrap();
        let config = sample_config(dir.path());

        let first = load_panel(&config).unwrap();
        let second = load_panel(&config).unwrap();

        assert_eq!(first.panel.columns(), second.panel.columns());
        assert_eq!(first.panel.n_rows(), second.panel.n_rows());
        for r in 0..first.panel.n_rows() {
            for c in 0..first.panel.n_cols() {
                match (first.panel.value(r, c), second.panel.value(r, c)) {
                    (Some(a), Some(b)) => assert!((a - b).abs() < 1e-12),
                    (a, b) => assert_eq!(a, b),
                }
            }
        }
    }

    #[test]
    fn missing_views_demonstrate_gaps_from_the_annual_join() {
        let dir = tempfile::tempdir().unwrap();
        let out = load_panel(&sample_config(dir.path())).unwrap();

        let (joined, views) =
            missing_views_for_state(&out.panel, "AK", FILL_SENTINEL).unwrap();

        // The annual column adds year-end rows the monthly index lacks.
        assert!(joined.n_rows() > out.panel.n_rows());
        assert!(joined.column_index("AK_A").is_some());

        // DropAny removes every row (monthly rows miss AK_A, annual rows
        // miss the states) while DropAll keeps them all.
        assert_eq!(views.dropped_any.n_rows(), 0);
        assert_eq!(views.dropped_all.n_rows(), joined.n_rows());
    }
}
