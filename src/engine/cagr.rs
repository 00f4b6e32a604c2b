//! Compound annual growth of the real price.

use std::collections::HashMap;

use crate::domain::{MergedRecord, YearlyCagr};
use crate::error::AppError;

/// Average days per year, matching the usual act/365.25 convention.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Per-calendar-year CAGR, sorted by year.
///
/// A year with `n` observed months annualizes with exponent `12/n`. A year
/// with a single month therefore yields `1^12 - 1 = 0`.
pub fn cagr_per_year(records: &[MergedRecord]) -> Result<Vec<YearlyCagr>, AppError> {
    // (first real value, last real value, months) per year.
    let mut groups: HashMap<i32, (f64, f64, usize)> = HashMap::new();
    for r in records {
        groups
            .entry(r.year())
            .and_modify(|g| {
                g.1 = r.value_real;
                g.2 += 1;
            })
            .or_insert((r.value_real, r.value_real, 1));
    }

    let mut out = Vec::with_capacity(groups.len());
    for (year, (first, last, months)) in groups {
        let ratio = last / first;
        if !(ratio.is_finite() && ratio > 0.0) {
            return Err(AppError::math(format!(
                "Per-year CAGR for {year}: non-positive growth base ({last} / {first})."
            )));
        }
        let cagr = ratio.powf(12.0 / months as f64) - 1.0;
        if !cagr.is_finite() {
            return Err(AppError::math(format!("Per-year CAGR for {year} is not finite ({cagr}).")));
        }
        out.push(YearlyCagr { year, months, cagr });
    }
    out.sort_by_key(|y| y.year);
    Ok(out)
}

/// CAGR between the first and the last record of the series.
pub fn whole_period_cagr(records: &[MergedRecord]) -> Result<f64, AppError> {
    let (Some(first), Some(last)) = (records.first(), records.last()) else {
        return Err(AppError::insufficient_data(
            "Whole-period CAGR: no records to compute growth over.",
        ));
    };

    let years = (last.period - first.period).num_days() as f64 / DAYS_PER_YEAR;
    if years <= 0.0 {
        return Err(AppError::math(format!(
            "Whole-period CAGR: zero-duration period range ({} to {}).",
            first.period, last.period
        )));
    }

    let ratio = last.value_real / first.value_real;
    if !(ratio.is_finite() && ratio > 0.0) {
        return Err(AppError::math(format!(
            "Whole-period CAGR: non-positive growth base ({} / {}).",
            last.value_real, first.value_real
        )));
    }

    let cagr = ratio.powf(1.0 / years) - 1.0;
    if !cagr.is_finite() {
        return Err(AppError::math(format!("Whole-period CAGR is not finite ({cagr}).")));
    }
    Ok(cagr)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::error::ErrorKind;

    fn record(y: i32, m: u32, value_real: f64) -> MergedRecord {
        MergedRecord {
            period: NaiveDate::from_ymd_opt(y, m, 1).unwrap(),
            value: value_real,
            rate: 0.0,
            index: 100.0,
            value_real,
            monthly_change_real: None,
            cumulative_change_real: 0.0,
            annualized_change_real: None,
        }
    }

    #[test]
    fn single_month_year_is_zero() {
        let out = cagr_per_year(&[record(2001, 12, 250.0)]).unwrap();
        assert_eq!(out, vec![YearlyCagr { year: 2001, months: 1, cagr: 0.0 }]);
    }

    #[test]
    fn full_year_uses_first_and_last_month() {
        let mut records: Vec<MergedRecord> = (1..=12).map(|m| record(2003, m, 100.0)).collect();
        records[11].value_real = 110.0;
        records.push(record(2004, 1, 120.0));
        records.push(record(2004, 2, 120.0));

        let out = cagr_per_year(&records).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].year, 2003);
        assert_eq!(out[0].months, 12);
        assert!((out[0].cagr - 0.10).abs() < 1e-12);
        assert_eq!(out[1].year, 2004);
        assert_eq!(out[1].months, 2);
        assert_eq!(out[1].cagr, 0.0);
    }

    #[test]
    fn whole_period_doubles_in_four_years() {
        // 2000-01-01 .. 2004-01-01 spans 1461 days = 4 * 365.25.
        let records = vec![record(2000, 1, 100.0), record(2004, 1, 200.0)];
        let cagr = whole_period_cagr(&records).unwrap();
        assert!((cagr - (2f64.powf(0.25) - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn single_period_is_zero_duration_error() {
        let err = whole_period_cagr(&[record(2000, 1, 100.0)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Math);
        assert!(err.message().contains("zero-duration"));
    }

    #[test]
    fn non_positive_base_is_rejected() {
        let records = vec![record(2000, 1, 100.0), record(2001, 1, -5.0)];
        let err = whole_period_cagr(&records).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Math);

        let err = cagr_per_year(&[record(2000, 1, 100.0), record(2000, 2, -5.0)]).unwrap_err();
        assert!(err.message().contains("2000"));
    }
}
