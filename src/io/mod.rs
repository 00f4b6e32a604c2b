//! Input/output helpers.
//!
//! - raw series snapshots, written and read back (`snapshot`)
//! - merged table and per-year CAGR exports (`export`)

use std::path::{Path, PathBuf};

pub mod export;
pub mod snapshot;

pub use export::*;
pub use snapshot::*;

pub const GOLD_SNAPSHOT_FILE: &str = "gold_price_eur.csv";
pub const CPI_SNAPSHOT_FILE: &str = "cpi_general.csv";
pub const MERGED_FILE: &str = "gold_real.csv";
pub const YEARLY_FILE: &str = "gold_cagr_per_year.csv";

/// Paths of every CSV written by a run.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub gold: PathBuf,
    pub cpi: PathBuf,
    pub merged: PathBuf,
    pub yearly: PathBuf,
}

impl OutputPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            gold: dir.join(GOLD_SNAPSHOT_FILE),
            cpi: dir.join(CPI_SNAPSHOT_FILE),
            merged: dir.join(MERGED_FILE),
            yearly: dir.join(YEARLY_FILE),
        }
    }
}
