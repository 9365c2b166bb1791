//! File-backed cache-or-fetch orchestration.
//!
//! Every remote data source in the pipeline (state list, per-state panel,
//! national benchmark) follows the same pattern: if its cache file exists,
//! load it verbatim; otherwise fetch from the remote source, persist, and
//! return. `CachedSource` captures that shape once so each source is just a
//! configuration of it.
//!
//! Presence of the file is the only cache-hit signal. Contents are trusted
//! unconditionally: there is no invalidation, no timestamp, no check that a
//! cached panel matches the currently requested keys.

use std::path::Path;

use crate::error::AppError;

/// One cacheable remote data source.
pub trait CachedSource {
    type Value;

    /// Where this source's cache file lives.
    fn cache_path(&self) -> &Path;

    /// Parse the cache file into a value.
    fn load(&self) -> Result<Self::Value, AppError>;

    /// Fetch the value from the remote source.
    fn fetch_remote(&self) -> Result<Self::Value, AppError>;

    /// Write the value to the cache file for future runs.
    fn persist(&self, value: &Self::Value) -> Result<(), AppError>;
}

/// Load from cache if the file exists, otherwise fetch-persist-return.
pub fn load_or_fetch<S: CachedSource>(source: &S) -> Result<S::Value, AppError> {
    if source.cache_path().exists() {
        return source.load();
    }
    let value = source.fetch_remote()?;
    source.persist(&value)?;
    Ok(value)
}
