//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the cached (or freshly fetched) panel and benchmark
//! - runs correlation/resampling/missing-data analysis
//! - prints reports/plots

use clap::Parser;

use crate::cli::{Command, FetchArgs, MissingArgs, ResampleArgs};
use crate::domain::{FILL_SENTINEL, RunConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `hpi` binary.
pub fn run() -> Result<(), AppError> {
    // We want plain `hpi` (and `hpi --sample`) to behave like `hpi run ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Corr(args) => handle_corr(args),
        Command::Resample(args) => handle_resample(args),
        Command::Missing(args) => handle_missing(args),
    }
}

fn handle_run(args: FetchArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    let out = pipeline::load_panel(&config)?;

    println!("HPI panel ({} states)", out.states.len());
    println!("{}", crate::report::format_frame_head(&out.panel, config.top));
    println!("National benchmark");
    println!("{}", crate::report::format_frame_head(&out.benchmark, config.top));

    let corr = out.panel.corr_matrix();
    println!("HPI correlation between states");
    println!("{}", crate::report::format_corr_matrix(&corr));
    println!("HPI correlation (summary)");
    println!("{}", crate::report::format_describe(&corr.describe()));

    // Mirror the classic walkthrough: resample one state over four-year
    // buckets, then demonstrate the missing-data views on another.
    let resample_state = pick_state(&out, "TX");
    let resampled = out.panel.resample_mean(&resample_state, 4)?;
    println!("{resample_state} resampled over 4-year buckets");
    println!(
        "{}",
        crate::report::format_series_head(&resample_state, &resampled, config.top)
    );

    let missing_state = pick_state(&out, "AK");
    let annual_label = format!("{missing_state}_A");
    let (joined, views) =
        pipeline::missing_views_for_state(&out.panel, &missing_state, FILL_SENTINEL)?;
    println!("Panel with {missing_state}'s annual mean column joined in");
    println!(
        "{}",
        crate::report::format_frame_head(
            &joined.select(&[missing_state.as_str(), annual_label.as_str()]),
            config.top
        )
    );
    print_views(&views, &missing_state, config.top);

    Ok(())
}

fn handle_corr(args: FetchArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    let out = pipeline::load_panel(&config)?;

    let corr = out.panel.corr_matrix();
    println!("{}", crate::report::format_corr_matrix(&corr));
    println!("{}", crate::report::format_describe(&corr.describe()));
    Ok(())
}

fn handle_resample(args: ResampleArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args.fetch);
    let out = pipeline::load_panel(&config)?;

    let state = args.state.trim().to_ascii_uppercase();
    let resampled = out.panel.resample_mean(&state, args.years)?;

    println!("{state} resampled over {}-year buckets", args.years);
    println!(
        "{}",
        crate::report::format_series_head(&state, &resampled, config.top)
    );

    if args.plot {
        let original = out
            .panel
            .column_values(&state)
            .ok_or_else(|| AppError::data(format!("Unknown column '{state}'.")))?;
        let plot =
            crate::plot::render_series_plot(&original, &resampled, args.width, args.height);
        println!("{plot}");
    }
    Ok(())
}

fn handle_missing(args: MissingArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args.fetch);
    let out = pipeline::load_panel(&config)?;

    let state = args.state.trim().to_ascii_uppercase();
    let annual_label = format!("{state}_A");
    let (joined, views) =
        pipeline::missing_views_for_state(&out.panel, &state, args.sentinel)?;

    println!("Panel with {state}'s annual mean column joined in");
    println!(
        "{}",
        crate::report::format_frame_head(
            &joined.select(&[state.as_str(), annual_label.as_str()]),
            config.top
        )
    );

    match args.policy {
        Some(policy) => {
            let view = joined.with_policy(policy.to_policy(args.sentinel));
            println!(
                "{}",
                crate::report::format_frame_head(
                    &view.select(&[state.as_str(), annual_label.as_str()]),
                    config.top
                )
            );
        }
        None => print_views(&views, &state, config.top),
    }
    Ok(())
}

fn print_views(views: &crate::frame::MissingViews, state: &str, top: usize) {
    let annual = format!("{state}_A");
    let cols = [state, annual.as_str()];
    let narrowed = crate::frame::MissingViews {
        dropped_any: views.dropped_any.select(&cols),
        dropped_all: views.dropped_all.select(&cols),
        filled_const: views.filled_const.select(&cols),
        filled_forward: views.filled_forward.select(&cols),
        filled_backward: views.filled_backward.select(&cols),
    };
    println!("{}", crate::report::format_missing_views(&narrowed, top));
}

/// Prefer a familiar state for the walkthrough, else the first column.
fn pick_state(out: &pipeline::PanelOutput, preferred: &str) -> String {
    if out.panel.column_index(preferred).is_some() {
        return preferred.to_string();
    }
    out.panel
        .columns()
        .first()
        .cloned()
        .unwrap_or_else(|| preferred.to_string())
}

pub fn run_config_from_args(args: &FetchArgs) -> RunConfig {
    RunConfig {
        cache_dir: args.cache_dir.clone(),
        key_file: args.key_file.clone(),
        states: args.states.clone(),
        sample: args.sample,
        sample_seed: args.seed,
        top: args.top,
    }
}

/// Rewrite argv so `hpi` defaults to `hpi run`.
///
/// Rules:
/// - `hpi`                     -> `hpi run`
/// - `hpi --sample ...`        -> `hpi run --sample ...`
/// - `hpi --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "run" | "corr" | "resample" | "missing");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "run flags".
    if arg1.starts_with('-') {
        argv.insert(1, "run".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
