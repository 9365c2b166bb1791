//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be passed
//! through the whole pipeline instead of living as ambient globals.

use std::path::{Path, PathBuf};

/// State-abbreviation list cache, one code per line.
pub const STATES_CACHE_FILE: &str = "dat_states_abbv.dat";
/// Joined per-state HPI panel cache (CSV, date-indexed).
pub const PANEL_CACHE_FILE: &str = "dat_hpi_per_state.csv";
/// National-average benchmark cache (CSV, single column).
pub const BENCHMARK_CACHE_FILE: &str = "dat_hpi_national_avg.csv";

/// Column label used for the national benchmark series.
pub const BENCHMARK_LABEL: &str = "HPI_AVG";

/// Default sentinel used by `FillPolicy::Constant` in reports.
pub const FILL_SENTINEL: f64 = -999.0;

/// An opaque API token.
///
/// Loaded once at startup and passed by value to fetch calls. Deliberately
/// does not implement `Debug`/`Display` so it cannot leak into logs.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// How missing cells are handled when deriving a view of a frame.
///
/// The five variants are independent strategies for inspection/comparison;
/// they are never composed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FillPolicy {
    /// Remove every row containing at least one missing cell.
    DropAny,
    /// Remove only rows where every cell is missing.
    DropAll,
    /// Replace every missing cell with a fixed sentinel value.
    Constant(f64),
    /// Carry the most recent preceding value down each column.
    ///
    /// Leading gaps (no prior value exists) remain missing.
    Forward,
    /// Carry the next following value up each column.
    ///
    /// Trailing gaps remain missing.
    Backward,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory holding (and receiving) the cache files.
    pub cache_dir: PathBuf,
    /// Single-line API key file.
    pub key_file: PathBuf,
    /// Explicit state codes; empty means "resolve via cache-or-fetch".
    pub states: Vec<String>,
    /// Generate deterministic offline sample data instead of fetching.
    pub sample: bool,
    /// Seed for sample generation.
    pub sample_seed: u64,
    /// Number of rows shown when printing table heads.
    pub top: usize,
}

impl RunConfig {
    pub fn states_cache_path(&self) -> PathBuf {
        self.cache_dir.join(STATES_CACHE_FILE)
    }

    pub fn panel_cache_path(&self) -> PathBuf {
        self.cache_dir.join(PANEL_CACHE_FILE)
    }

    pub fn benchmark_cache_path(&self) -> PathBuf {
        self.cache_dir.join(BENCHMARK_CACHE_FILE)
    }
}

/// Read a single-line credential file, stripping surrounding whitespace.
///
/// A `QUANDL_API_KEY` environment variable (optionally via `.env`) takes
/// precedence over the file. A missing/empty credential is a fatal startup
/// condition with no recovery.
pub fn load_credential(key_file: &Path) -> Result<Credential, crate::error::AppError> {
    dotenvy::dotenv().ok();
    if let Ok(token) = std::env::var("QUANDL_API_KEY") {
        let token = token.trim();
        if !token.is_empty() {
            return Ok(Credential::new(token));
        }
    }

    let raw = std::fs::read_to_string(key_file).map_err(|e| {
        crate::error::AppError::config(format!(
            "Failed to read key file '{}': {e}",
            key_file.display()
        ))
    })?;

    let token = raw.trim();
    if token.is_empty() {
        return Err(crate::error::AppError::config(format!(
            "Key file '{}' is empty.",
            key_file.display()
        )));
    }

    Ok(Credential::new(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn credential_file_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quandl.key");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "  sEcReT-token \n").unwrap();

        let cred = load_credential(&path).unwrap();
        assert_eq!(cred.as_str(), "sEcReT-token");
    }

    #[test]
    fn missing_credential_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_credential(&dir.path().join("nope.key")).err().unwrap();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn empty_credential_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quandl.key");
        std::fs::write(&path, "   \n").unwrap();
        let err = load_credential(&path).err().unwrap();
        assert_eq!(err.exit_code(), 2);
    }
}
