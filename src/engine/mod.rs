//! Alignment & real-value engine.
//!
//! Turns a nominal gold series and a CPI variation series into the merged
//! real-price table plus per-year and whole-period CAGR.
//!
//! Modules:
//! - `series`: filter, join, CPI index, deflation and growth columns
//! - `cagr`: compound annual growth summaries

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::domain::{Analysis, CpiRecord, PricePoint};
use crate::error::AppError;

pub mod cagr;
pub mod series;

pub use cagr::{cagr_per_year, whole_period_cagr};
pub use series::{JoinedRow, build_records, cumulative_index, deflate, filter_from, join};

/// Run the full computation.
///
/// `prices` and `cpi` must each be sorted by period and unique per period;
/// the engine never reorders its inputs.
pub fn analyze(prices: &[PricePoint], cpi: &[CpiRecord], start: NaiveDate) -> Result<Analysis, AppError> {
    let prices = filter_from(prices, start);
    if prices.is_empty() {
        return Err(AppError::insufficient_data(format!(
            "Insufficient data: no gold prices on or after {start}."
        )));
    }
    if cpi.is_empty() {
        return Err(AppError::insufficient_data("Insufficient data: CPI series is empty."));
    }

    let rows = join(&prices, cpi);
    debug!(prices = prices.len(), cpi = cpi.len(), joined = rows.len(), "joined series");
    if rows.is_empty() {
        return Err(AppError::insufficient_data(
            "Insufficient data: no overlapping periods between gold and CPI series.",
        ));
    }

    let records = build_records(&rows)?;
    let yearly = cagr_per_year(&records)?;
    let cagr = whole_period_cagr(&records)?;

    info!(
        months = records.len(),
        years = yearly.len(),
        cagr_pct = cagr * 100.0,
        "computed real gold series"
    );

    Ok(Analysis { records, yearly, cagr })
}
