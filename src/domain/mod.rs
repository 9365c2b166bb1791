//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the run configuration derived from CLI flags (`RunConfig`)
//! - the API credential (`Credential`)
//! - the missing-data policy enum (`FillPolicy`)
//! - cache file name constants

pub mod types;

pub use types::*;
