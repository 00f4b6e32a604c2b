//! Command-line parsing for the real gold price analysis.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the data and math code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::data::dbnomics::DEFAULT_BASE_URL;
use crate::data::ine::DEFAULT_CPI_URL;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "gold", version, about = "Inflation-adjusted gold price (EUR, Spanish CPI)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch gold and CPI data, compute real prices, write CSVs and charts.
    Run(RunArgs),
    /// Same as `run`, but from previously written snapshot CSVs (no network).
    Analyze(AnalyzeArgs),
    /// Browse the charts in an interactive terminal UI (writes nothing).
    View(ViewArgs),
}

/// Options shared by every command.
#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    /// First month of the gold series to keep (YYYY-MM-DD).
    #[arg(long, default_value = "2000-01-01")]
    pub start: NaiveDate,

    /// Directory for CSV and SVG outputs.
    #[arg(long, env = "GOLD_OUT_DIR", default_value = "output")]
    pub out_dir: PathBuf,

    /// Skip SVG chart rendering.
    #[arg(long)]
    pub no_charts: bool,

    /// Chart width (pixels).
    #[arg(long, default_value_t = 1000)]
    pub chart_width: u32,

    /// Chart height (pixels).
    #[arg(long, default_value_t = 500)]
    pub chart_height: u32,

    /// DBnomics API base URL.
    #[arg(long, env = "GOLD_DBNOMICS_URL", default_value = DEFAULT_BASE_URL)]
    pub dbnomics_url: String,

    /// INE CPI CSV URL.
    #[arg(long, env = "GOLD_CPI_URL", default_value = DEFAULT_CPI_URL)]
    pub cpi_url: String,

    /// HTTP timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}

/// Options for offline analysis.
#[derive(Debug, Args, Clone)]
pub struct AnalyzeArgs {
    /// Gold snapshot CSV (`period,value`).
    #[arg(long, value_name = "CSV")]
    pub gold: PathBuf,

    /// CPI snapshot CSV (`period,rate`).
    #[arg(long, value_name = "CSV")]
    pub cpi: PathBuf,

    #[command(flatten)]
    pub common: RunArgs,
}

/// Options for the TUI.
#[derive(Debug, Args, Clone)]
pub struct ViewArgs {
    /// Gold snapshot CSV; requires `--cpi`. Fetches live data when omitted.
    #[arg(long, value_name = "CSV", requires = "cpi")]
    pub gold: Option<PathBuf>,

    /// CPI snapshot CSV; requires `--gold`.
    #[arg(long, value_name = "CSV", requires = "gold")]
    pub cpi: Option<PathBuf>,

    #[command(flatten)]
    pub common: RunArgs,
}
