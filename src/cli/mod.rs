//! Command-line parsing for the HPI pipeline.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the data/analysis code.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::FillPolicy;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "hpi", version, about = "US housing-price-index fetch/cache/analysis")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Full pipeline: state list, panel, benchmark, correlation, resample,
    /// missing-data views.
    Run(FetchArgs),
    /// Correlation matrix + summary only.
    Corr(FetchArgs),
    /// Resample one state's column over calendar-year buckets.
    Resample(ResampleArgs),
    /// Print missing-data views of the panel for one state.
    Missing(MissingArgs),
}

/// Common options for anything that needs the cached panel.
#[derive(Debug, Parser, Clone)]
pub struct FetchArgs {
    /// Directory where cache files live (and are written on first fetch).
    #[arg(long, default_value = ".")]
    pub cache_dir: PathBuf,

    /// Single-line API key file (`QUANDL_API_KEY` overrides it).
    #[arg(long, default_value = "quandl.key")]
    pub key_file: PathBuf,

    /// Comma-separated state codes to use instead of the scraped list.
    #[arg(long, value_delimiter = ',')]
    pub states: Vec<String>,

    /// Generate deterministic offline sample data instead of fetching.
    #[arg(long)]
    pub sample: bool,

    /// Seed for --sample generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of rows shown when printing table heads.
    #[arg(long, default_value_t = 5)]
    pub top: usize,
}

/// Options for the `resample` subcommand.
#[derive(Debug, Parser)]
pub struct ResampleArgs {
    #[command(flatten)]
    pub fetch: FetchArgs,

    /// State column to resample.
    #[arg(short, long, default_value = "TX")]
    pub state: String,

    /// Bucket size in calendar years.
    #[arg(long, default_value_t = 1)]
    pub years: u32,

    /// Render an ASCII chart of the original and resampled series.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

/// Options for the `missing` subcommand.
#[derive(Debug, Parser)]
pub struct MissingArgs {
    #[command(flatten)]
    pub fetch: FetchArgs,

    /// State column to inspect (its annual mean column is joined in to
    /// create gaps, the way the comparison is usually demonstrated).
    #[arg(short, long, default_value = "AK")]
    pub state: String,

    /// Show a single policy view instead of all five.
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,

    /// Sentinel value used by the constant-fill policy.
    #[arg(long, default_value_t = crate::domain::FILL_SENTINEL, allow_negative_numbers = true)]
    pub sentinel: f64,
}

/// CLI-facing names for the missing-data policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Remove every row containing at least one missing cell.
    DropAny,
    /// Remove only rows where every cell is missing.
    DropAll,
    /// Replace missing cells with the sentinel value.
    Constant,
    /// Carry the previous value forward.
    Forward,
    /// Carry the next value backward.
    Backward,
}

impl PolicyArg {
    pub fn to_policy(self, sentinel: f64) -> FillPolicy {
        match self {
            PolicyArg::DropAny => FillPolicy::DropAny,
            PolicyArg::DropAll => FillPolicy::DropAll,
            PolicyArg::Constant => FillPolicy::Constant(sentinel),
            PolicyArg::Forward => FillPolicy::Forward,
            PolicyArg::Backward => FillPolicy::Backward,
        }
    }
}
