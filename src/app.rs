//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - initializes logging
//! - fetches (or reads) the gold and CPI series
//! - runs the real-price computation
//! - prints the summary and writes CSV/SVG outputs, or opens the TUI

use std::time::Duration;

use clap::Parser;

use crate::cli::{Command, RunArgs};
use crate::domain::{InputSource, RunConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `gold` binary.
pub fn run() -> Result<(), AppError> {
    // Environment-backed flags (GOLD_OUT_DIR, ...) may come from `.env`.
    dotenvy::dotenv().ok();

    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Run(args) => {
            crate::logging::init("info");
            handle_run(run_config_from_args(&args, InputSource::Remote)?)
        }
        Command::Analyze(args) => {
            crate::logging::init("info");
            let source = InputSource::Snapshots {
                gold: args.gold.clone(),
                cpi: args.cpi.clone(),
            };
            handle_run(run_config_from_args(&args.common, source)?)
        }
        Command::View(args) => {
            // Keep the alternate screen clean unless asked otherwise.
            crate::logging::init("warn");
            let source = match (args.gold.clone(), args.cpi.clone()) {
                (Some(gold), Some(cpi)) => InputSource::Snapshots { gold, cpi },
                _ => InputSource::Remote,
            };
            handle_view(run_config_from_args(&args.common, source)?)
        }
    }
}

fn handle_run(config: RunConfig) -> Result<(), AppError> {
    let inputs = pipeline::load_inputs(&config)?;
    let run = pipeline::compute(inputs, &config)?;
    let written = pipeline::write_outputs(&run, &config)?;

    println!("{}", crate::report::format_run_summary(&run.analysis));
    println!("{}", crate::report::format_yearly_table(&run.analysis.yearly));
    println!("Merged table: {}", written.csv.merged.display());
    for chart in &written.charts {
        println!("Chart: {}", chart.display());
    }
    Ok(())
}

fn handle_view(config: RunConfig) -> Result<(), AppError> {
    let inputs = pipeline::load_inputs(&config)?;
    let run = pipeline::compute(inputs, &config)?;
    crate::tui::run(run)
}

/// Resolve CLI arguments into a validated run configuration.
pub fn run_config_from_args(args: &RunArgs, source: InputSource) -> Result<RunConfig, AppError> {
    if args.chart_width == 0 || args.chart_height == 0 {
        return Err(AppError::config("Chart width and height must be positive."));
    }
    if args.timeout_secs == 0 {
        return Err(AppError::config("HTTP timeout must be at least one second."));
    }

    Ok(RunConfig {
        source,
        start: args.start,
        out_dir: args.out_dir.clone(),
        charts: !args.no_charts,
        chart_width: args.chart_width,
        chart_height: args.chart_height,
        dbnomics_url: args.dbnomics_url.clone(),
        cpi_url: args.cpi_url.clone(),
        timeout: Duration::from_secs(args.timeout_secs),
    })
}

/// Rewrite argv so `gold` defaults to `gold run`.
///
/// Rules:
/// - `gold`                      -> `gold run`
/// - `gold --start 2010-01-01`   -> `gold run --start 2010-01-01`
/// - `gold --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "run" | "analyze" | "view");
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
