//! Shared pipeline logic used by the `run`, `analyze` and `view` commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load inputs -> filter/join/deflate -> CAGR -> chart specs -> outputs
//!
//! Every stage takes its inputs as parameters and returns owned values;
//! nothing is written until the whole computation has succeeded.

use std::fs::create_dir_all;
use std::path::PathBuf;

use tracing::info;

use crate::data::{CpiSource, DbnomicsClient, IneCpiClient, SeriesFetcher, fetch_gold};
use crate::domain::{Analysis, CpiRecord, InputSource, PricePoint, RunConfig};
use crate::engine::{analyze, filter_from};
use crate::error::AppError;
use crate::io::OutputPaths;
use crate::plot::{ChartSpec, build_all};

/// Raw series as fetched or read from snapshots.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub gold: Vec<PricePoint>,
    pub cpi: Vec<CpiRecord>,
}

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Gold prices on or after the configured start.
    pub gold: Vec<PricePoint>,
    pub cpi: Vec<CpiRecord>,
    pub analysis: Analysis,
    pub charts: Vec<ChartSpec>,
}

/// Files produced by [`write_outputs`].
#[derive(Debug, Clone)]
pub struct WrittenFiles {
    pub csv: OutputPaths,
    pub charts: Vec<PathBuf>,
}

/// Load both input series according to `config.source`.
pub fn load_inputs(config: &RunConfig) -> Result<Inputs, AppError> {
    match &config.source {
        InputSource::Remote => {
            let gold = DbnomicsClient::new(config.dbnomics_url.clone(), config.timeout)?;
            let cpi = IneCpiClient::new(config.cpi_url.clone(), config.timeout)?;
            fetch_inputs(&gold, &cpi)
        }
        InputSource::Snapshots { gold, cpi } => {
            let inputs = Inputs {
                gold: crate::io::read_gold_snapshot(gold)?,
                cpi: crate::io::read_cpi_snapshot(cpi)?,
            };
            info!(gold = inputs.gold.len(), cpi = inputs.cpi.len(), "read snapshots");
            Ok(inputs)
        }
    }
}

/// Fetch both series from the given sources.
pub fn fetch_inputs(fetcher: &dyn SeriesFetcher, cpi: &dyn CpiSource) -> Result<Inputs, AppError> {
    let gold = fetch_gold(fetcher)?;
    let cpi = cpi.load()?;
    Ok(Inputs { gold, cpi })
}

/// Compute the analysis and chart specs; performs no I/O.
pub fn compute(inputs: Inputs, config: &RunConfig) -> Result<RunOutput, AppError> {
    let analysis = analyze(&inputs.gold, &inputs.cpi, config.start)?;
    let charts = build_all(&analysis);
    ensure_plottable(&charts)?;
    Ok(RunOutput {
        gold: filter_from(&inputs.gold, config.start),
        cpi: inputs.cpi,
        analysis,
        charts,
    })
}

/// Every chart must have finite bounds before anything is written.
pub fn ensure_plottable(charts: &[ChartSpec]) -> Result<(), AppError> {
    match charts.iter().find(|c| c.bounds().is_none()) {
        Some(chart) => Err(AppError::math(format!(
            "Chart '{}' has no finite values to plot.",
            chart.title
        ))),
        None => Ok(()),
    }
}

/// Persist the snapshots, the merged table, the CAGR table and (optionally) the charts.
pub fn write_outputs(run: &RunOutput, config: &RunConfig) -> Result<WrittenFiles, AppError> {
    create_dir_all(&config.out_dir).map_err(|e| {
        AppError::io(format!(
            "Failed to create output dir '{}': {e}",
            config.out_dir.display()
        ))
    })?;

    let csv = OutputPaths::in_dir(&config.out_dir);
    crate::io::write_gold_snapshot(&csv.gold, &run.gold)?;
    crate::io::write_cpi_snapshot(&csv.cpi, &run.cpi)?;
    crate::io::write_merged_csv(&csv.merged, &run.analysis.records)?;
    crate::io::write_yearly_csv(&csv.yearly, &run.analysis.yearly)?;

    let charts = if config.charts {
        crate::plot::render_all_svg(
            &run.charts,
            &config.out_dir,
            (config.chart_width, config.chart_height),
        )?
    } else {
        Vec::new()
    };

    info!(
        dir = %config.out_dir.display(),
        charts = charts.len(),
        "wrote outputs"
    );
    Ok(WrittenFiles { csv, charts })
}

/// Fetch from the given sources, compute, and write every output.
pub fn run_with_sources(
    fetcher: &dyn SeriesFetcher,
    cpi: &dyn CpiSource,
    config: &RunConfig,
) -> Result<(RunOutput, WrittenFiles), AppError> {
    let inputs = fetch_inputs(fetcher, cpi)?;
    let run = compute(inputs, config)?;
    let written = write_outputs(&run, config)?;
    Ok((run, written))
}
