//! Data sources.
//!
//! - DBnomics API client for the LBMA monthly gold price (`dbnomics`)
//! - INE CSV loader for the Spanish general CPI (`ine`)
//!
//! The pipeline only talks to the [`SeriesFetcher`] and [`CpiSource`] traits,
//! so tests and offline runs can swap in other implementations.

use std::collections::BTreeMap;

use crate::domain::{CpiRecord, PricePoint};
use crate::error::AppError;

pub mod dbnomics;
pub mod ine;

pub use dbnomics::DbnomicsClient;
pub use ine::IneCpiClient;

/// Provider code of the London Bullion Market Association on DBnomics.
pub const GOLD_PROVIDER: &str = "LBMA";
/// Monthly gold price dataset.
pub const GOLD_DATASET: &str = "gold_M";

/// Retrieves a named economic time series.
pub trait SeriesFetcher {
    /// Fetch the series selected by `provider`/`dataset`/`dimensions`, ordered by period.
    fn fetch(
        &self,
        provider: &str,
        dataset: &str,
        dimensions: &BTreeMap<String, Vec<String>>,
    ) -> Result<Vec<PricePoint>, AppError>;
}

/// Retrieves monthly CPI variation rates.
pub trait CpiSource {
    fn load(&self) -> Result<Vec<CpiRecord>, AppError>;
}

/// Dimension selectors for the monthly average PM fixing in EUR.
pub fn gold_dimensions() -> BTreeMap<String, Vec<String>> {
    [
        ("frequency", "M"),
        ("unit", "EUR"),
        ("time", "PM"),
        ("price", "AVG"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), vec![v.to_string()]))
    .collect()
}

/// Fetch the nominal EUR gold series.
pub fn fetch_gold(fetcher: &dyn SeriesFetcher) -> Result<Vec<PricePoint>, AppError> {
    fetcher.fetch(GOLD_PROVIDER, GOLD_DATASET, &gold_dimensions())
}
