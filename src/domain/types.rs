//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory while computing the real-price series
//! - exported to CSV snapshots
//! - reloaded later for offline re-analysis

use std::path::PathBuf;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Nominal monthly gold price (EUR).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// First day of the month.
    pub period: NaiveDate,
    pub value: f64,
}

/// Monthly CPI variation, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CpiRecord {
    /// First day of the month.
    pub period: NaiveDate,
    pub rate: f64,
}

/// One row of the gold/CPI inner join with every derived column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergedRecord {
    pub period: NaiveDate,
    /// Nominal price.
    pub value: f64,
    /// Monthly CPI variation (%).
    pub rate: f64,
    /// Cumulative CPI index.
    pub index: f64,
    /// Price deflated to the purchasing power of the first period.
    pub value_real: f64,
    /// Real month-over-month change (%); `None` for the first period.
    pub monthly_change_real: Option<f64>,
    /// Real change since the first period (%).
    pub cumulative_change_real: f64,
    /// Monthly real change compounded over twelve months (%); `None` for the first period.
    pub annualized_change_real: Option<f64>,
}

impl MergedRecord {
    pub fn year(&self) -> i32 {
        self.period.year()
    }
}

/// Compound annual growth of the real price within one calendar year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearlyCagr {
    pub year: i32,
    /// Number of joined months observed in the year.
    pub months: usize,
    /// Growth rate as a fraction (0.05 = 5 %).
    pub cagr: f64,
}

impl YearlyCagr {
    pub fn cagr_pct(&self) -> f64 {
        self.cagr * 100.0
    }
}

/// Complete, immutable result of one analysis run.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub records: Vec<MergedRecord>,
    pub yearly: Vec<YearlyCagr>,
    /// Whole-period CAGR as a fraction.
    pub cagr: f64,
}

impl Analysis {
    pub fn cagr_pct(&self) -> f64 {
        self.cagr * 100.0
    }

    /// First and last joined periods.
    pub fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.records.first()?.period, self.records.last()?.period))
    }
}

/// Where the raw input series come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Fetch both series over HTTP.
    Remote,
    /// Read previously written snapshot CSVs.
    Snapshots { gold: PathBuf, cpi: PathBuf },
}

/// Resolved configuration for a run (CLI flags + environment).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub source: InputSource,
    pub start: NaiveDate,
    pub out_dir: PathBuf,
    pub charts: bool,
    pub chart_width: u32,
    pub chart_height: u32,
    pub dbnomics_url: String,
    pub cpi_url: String,
    pub timeout: Duration,
}

/// Normalize any date to the first day of its month.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Calendar month as a fractional year (`2000-07` -> `2000.5`), used as a chart x-coordinate.
pub fn fractional_year(date: NaiveDate) -> f64 {
    date.year() as f64 + date.month0() as f64 / 12.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_start_drops_day() {
        let d = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(month_start(d), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    }

    #[test]
    fn fractional_year_maps_months_into_unit_interval() {
        let jan = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let jul = NaiveDate::from_ymd_opt(2000, 7, 1).unwrap();
        assert_eq!(fractional_year(jan), 2000.0);
        assert!((fractional_year(jul) - 2000.5).abs() < 1e-12);
    }
}
