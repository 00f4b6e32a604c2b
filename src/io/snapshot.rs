//! Flat CSV snapshots of the raw input series.
//!
//! Snapshots let a run be repeated offline (`gold analyze`) against exactly
//! the data that was fetched.

use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::{CpiRecord, PricePoint};
use crate::error::AppError;

/// Write the nominal gold series as `period,value`.
pub fn write_gold_snapshot(path: &Path, points: &[PricePoint]) -> Result<(), AppError> {
    write_rows(create(path)?, points)
        .map_err(|e| AppError::io(format!("Failed to write gold snapshot '{}': {e}", path.display())))
}

/// Write the CPI series as `period,rate`.
pub fn write_cpi_snapshot(path: &Path, records: &[CpiRecord]) -> Result<(), AppError> {
    write_rows(create(path)?, records)
        .map_err(|e| AppError::io(format!("Failed to write CPI snapshot '{}': {e}", path.display())))
}

pub fn read_gold_snapshot(path: &Path) -> Result<Vec<PricePoint>, AppError> {
    read_rows(open(path)?)
        .map_err(|e| AppError::parse(format!("Invalid gold snapshot '{}': {e}", path.display())))
}

/// Read a CPI snapshot; a period may appear only once.
pub fn read_cpi_snapshot(path: &Path) -> Result<Vec<CpiRecord>, AppError> {
    let records: Vec<CpiRecord> = read_rows(open(path)?)
        .map_err(|e| AppError::parse(format!("Invalid CPI snapshot '{}': {e}", path.display())))?;

    let mut seen = HashSet::with_capacity(records.len());
    for (idx, record) in records.iter().enumerate() {
        if !seen.insert(record.period) {
            // Header is line 1.
            return Err(AppError::parse(format!(
                "CPI snapshot '{}' line {}: duplicate rate for period {}.",
                path.display(),
                idx + 2,
                record.period
            )));
        }
    }
    Ok(records)
}

pub fn write_rows<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn read_rows<R: Read, T: DeserializeOwned>(reader: R) -> Result<Vec<T>, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    rdr.deserialize().collect()
}

fn create(path: &Path) -> Result<File, AppError> {
    File::create(path).map_err(|e| AppError::io(format!("Failed to create '{}': {e}", path.display())))
}

fn open(path: &Path) -> Result<File, AppError> {
    File::open(path).map_err(|e| AppError::io(format!("Failed to open '{}': {e}", path.display())))
}
