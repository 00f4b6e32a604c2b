//! Alignment and deflation: filter -> join -> CPI index -> real values -> growth series.
//!
//! Every function is pure and works on slices so each step can be tested on
//! its own. Inputs are expected in ascending period order; nothing here sorts.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::{CpiRecord, MergedRecord, PricePoint};
use crate::error::AppError;

/// Base level of the cumulative CPI index.
pub const INDEX_BASE: f64 = 100.0;

/// A gold observation matched with the CPI rate of the same month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoinedRow {
    pub period: NaiveDate,
    pub value: f64,
    pub rate: f64,
}

/// Keep prices observed on or after `start`, preserving input order.
pub fn filter_from(points: &[PricePoint], start: NaiveDate) -> Vec<PricePoint> {
    points.iter().filter(|p| p.period >= start).copied().collect()
}

/// Inner join on exact period equality.
///
/// Output follows the order of `prices`; periods present in only one series
/// are dropped.
pub fn join(prices: &[PricePoint], cpi: &[CpiRecord]) -> Vec<JoinedRow> {
    let rates: HashMap<NaiveDate, f64> = cpi.iter().map(|r| (r.period, r.rate)).collect();
    prices
        .iter()
        .filter_map(|p| {
            rates.get(&p.period).map(|&rate| JoinedRow {
                period: p.period,
                value: p.value,
                rate,
            })
        })
        .collect()
}

/// Running product of `(1 + rate/100)` seeded at [`INDEX_BASE`].
///
/// The first rate is part of the product, so `index[0] = 100 * (1 + rate[0]/100)`.
pub fn cumulative_index(rates: &[f64]) -> Result<Vec<f64>, AppError> {
    let mut out = Vec::with_capacity(rates.len());
    let mut level = INDEX_BASE;
    for (i, &rate) in rates.iter().enumerate() {
        level *= 1.0 + rate / 100.0;
        if !(level.is_finite() && level > 0.0) {
            return Err(AppError::math(format!(
                "CPI index became non-positive at row {i} (rate {rate}%); cannot deflate prices."
            )));
        }
        out.push(level);
    }
    Ok(out)
}

/// Deflate nominal values to the purchasing power of the first period.
///
/// `value_real[i] = value[i] * index[0] / index[i]`; the first real value
/// equals the first nominal value exactly.
pub fn deflate(values: &[f64], index: &[f64]) -> Result<Vec<f64>, AppError> {
    if values.len() != index.len() {
        return Err(AppError::math(format!(
            "Deflation needs one index value per price ({} prices, {} index values).",
            values.len(),
            index.len()
        )));
    }
    let Some(&base) = index.first() else {
        return Ok(Vec::new());
    };

    let mut out = Vec::with_capacity(values.len());
    for (i, (&value, &level)) in values.iter().zip(index).enumerate() {
        let real = value * (base / level);
        if !(real.is_finite() && real > 0.0) {
            return Err(AppError::math(format!(
                "Real price at row {i} is non-positive ({real}); growth rates are undefined."
            )));
        }
        out.push(real);
    }
    Ok(out)
}

/// Month-over-month change in percent; the first entry has no predecessor.
pub fn monthly_changes(values_real: &[f64]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values_real.len());
    for i in 0..values_real.len() {
        if i == 0 {
            out.push(None);
        } else {
            out.push(Some((values_real[i] / values_real[i - 1] - 1.0) * 100.0));
        }
    }
    out
}

/// Change since the first observation, in percent.
pub fn cumulative_changes(values_real: &[f64]) -> Vec<f64> {
    let Some(&first) = values_real.first() else {
        return Vec::new();
    };
    values_real.iter().map(|v| (v / first - 1.0) * 100.0).collect()
}

/// Compound each monthly change over twelve months, in percent.
pub fn annualized_changes(monthly: &[Option<f64>]) -> Vec<Option<f64>> {
    monthly
        .iter()
        .map(|m| m.map(|pct| ((1.0 + pct / 100.0).powi(12) - 1.0) * 100.0))
        .collect()
}

/// Build the merged table from joined rows.
pub fn build_records(rows: &[JoinedRow]) -> Result<Vec<MergedRecord>, AppError> {
    let rates: Vec<f64> = rows.iter().map(|r| r.rate).collect();
    let values: Vec<f64> = rows.iter().map(|r| r.value).collect();

    let index = cumulative_index(&rates)?;
    let values_real = deflate(&values, &index)?;
    let monthly = monthly_changes(&values_real);
    let cumulative = cumulative_changes(&values_real);
    let annualized = annualized_changes(&monthly);

    let mut out = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        ensure_finite("monthly_change_real", i, row.period, monthly[i])?;
        ensure_finite("cumulative_change_real", i, row.period, Some(cumulative[i]))?;
        ensure_finite("annualized_change_real", i, row.period, annualized[i])?;
        out.push(MergedRecord {
            period: row.period,
            value: row.value,
            rate: row.rate,
            index: index[i],
            value_real: values_real[i],
            monthly_change_real: monthly[i],
            cumulative_change_real: cumulative[i],
            annualized_change_real: annualized[i],
        });
    }
    Ok(out)
}

fn ensure_finite(column: &str, row: usize, period: NaiveDate, value: Option<f64>) -> Result<(), AppError> {
    match value {
        Some(v) if !v.is_finite() => Err(AppError::math(format!(
            "Derived column '{column}' is not finite at row {row} ({period}): {v}."
        ))),
        _ => Ok(()),
    }
}
