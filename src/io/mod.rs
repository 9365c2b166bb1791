//! Input/output helpers.
//!
//! - date-indexed frame CSV read/write (`table_csv`)

pub mod table_csv;

pub use table_csv::*;
