//! Deterministic offline HPI sample generation.
//!
//! `--sample` swaps the live client for a seeded random-walk generator so
//! the whole pipeline (rebase, join, persist, analysis) can run without a
//! credential or network access.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::{Datelike, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::data::SeriesProvider;
use crate::error::AppError;

/// Monthly observations generated per series.
const SAMPLE_MONTHS: usize = 360;
/// First observation date of every generated series.
const SAMPLE_START: (i32, u32) = (1995, 1);
/// Mean monthly log-drift of the walk (gentle long-run appreciation).
const DRIFT: f64 = 0.003;
/// Monthly log-volatility of the walk.
const VOL: f64 = 0.012;

/// All 50 two-letter state codes, in the order the scraped table lists them.
pub const DEFAULT_STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY",
];

/// Offline sample provider; one seeded random walk per dataset code.
pub struct SampleHpi {
    seed: u64,
}

impl SampleHpi {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    fn series_seed(&self, code: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        code.hash(&mut hasher);
        hasher.finish()
    }
}

impl SeriesProvider for SampleHpi {
    fn fetch_series(&self, code: &str) -> Result<Vec<(NaiveDate, f64)>, AppError> {
        let mut rng = StdRng::seed_from_u64(self.series_seed(code));
        let normal = Normal::new(DRIFT, VOL)
            .map_err(|e| AppError::data(format!("Noise distribution error: {e}")))?;

        // Each series gets its own starting level so rebasing is observable.
        let mut level = rng.gen_range(80.0..220.0);

        let mut date = NaiveDate::from_ymd_opt(SAMPLE_START.0, SAMPLE_START.1, 1)
            .ok_or_else(|| AppError::data("Invalid sample start date."))?;
        let mut out = Vec::with_capacity(SAMPLE_MONTHS);
        for _ in 0..SAMPLE_MONTHS {
            out.push((date, level));
            level *= normal.sample(&mut rng).exp();
            date = next_month(date)
                .ok_or_else(|| AppError::data("Sample date overflowed the calendar."))?;
        }
        Ok(out)
    }
}

fn next_month(date: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}
