//! Remote data sources and their cache-or-fetch wiring.
//!
//! - `quandl`: authenticated HPI time-series fetches
//! - `states`: state-abbreviation list scraped from an HTML table
//! - `sample`: deterministic offline sample generation
//! - `sources`: `CachedSource` implementations for the panel and benchmark

use chrono::NaiveDate;

use crate::error::AppError;

pub mod quandl;
pub mod sample;
pub mod sources;
pub mod states;

pub use quandl::QuandlClient;
pub use sample::SampleHpi;
pub use sources::{BenchmarkSource, PanelSource};
pub use states::StateListSource;

/// Anything that can produce a raw (un-rebased) series for a dataset code.
///
/// Implemented by the live `QuandlClient` and the offline `SampleHpi`
/// generator so the panel/benchmark sources don't care where data comes
/// from.
pub trait SeriesProvider {
    fn fetch_series(&self, code: &str) -> Result<Vec<(NaiveDate, f64)>, AppError>;
}

/// Rebase a series so its first (earliest) value becomes exactly 100.
///
/// Observations must be in ascending date order; a zero first value cannot
/// be rebased.
pub fn rebase_to_100(observations: &mut [(NaiveDate, f64)]) -> Result<(), AppError> {
    let Some(&(_, base)) = observations.first() else {
        return Err(AppError::data("Cannot rebase an empty series."));
    };
    if base == 0.0 || !base.is_finite() {
        return Err(AppError::data(format!(
            "Cannot rebase a series whose first value is {base}."
        )));
    }
    for (_, value) in observations.iter_mut() {
        *value = 100.0 * *value / base;
    }
    Ok(())
}
