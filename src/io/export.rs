//! Export the merged real-price table and the per-year CAGR table to CSV.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream scripts.
//! Undefined values (first-period growth rates) are written as empty cells.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{MergedRecord, YearlyCagr};
use crate::error::AppError;

pub const MERGED_HEADER: [&str; 9] = [
    "period",
    "value",
    "IPC",
    "index",
    "value_real",
    "monthly_change_real",
    "cumulative_change_real",
    "annualized_change_real",
    "year",
];

/// Write the merged table to a CSV file.
pub fn write_merged_csv(path: &Path, records: &[MergedRecord]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_merged(file, records)
        .map_err(|e| AppError::io(format!("Failed to write export CSV '{}': {e}", path.display())))
}

/// Write the per-year CAGR table (`year,months,cagr_pct`) to a CSV file.
pub fn write_yearly_csv(path: &Path, yearly: &[YearlyCagr]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_yearly(file, yearly)
        .map_err(|e| AppError::io(format!("Failed to write export CSV '{}': {e}", path.display())))
}

pub fn write_merged<W: Write>(writer: W, records: &[MergedRecord]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(MERGED_HEADER)?;
    for r in records {
        wtr.write_record([
            r.period.to_string(),
            r.value.to_string(),
            r.rate.to_string(),
            r.index.to_string(),
            r.value_real.to_string(),
            fmt_opt(r.monthly_change_real),
            r.cumulative_change_real.to_string(),
            fmt_opt(r.annualized_change_real),
            r.year().to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_yearly<W: Write>(writer: W, yearly: &[YearlyCagr]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["year", "months", "cagr_pct"])?;
    for y in yearly {
        wtr.write_record([y.year.to_string(), y.months.to_string(), y.cagr_pct().to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn first_row_leaves_undefined_growth_empty() {
        let records = vec![MergedRecord {
            period: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            value: 100.0,
            rate: 0.5,
            index: 100.5,
            value_real: 100.0,
            monthly_change_real: None,
            cumulative_change_real: 0.0,
            annualized_change_real: None,
        }];
        let mut buf = Vec::new();
        write_merged(&mut buf, &records).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "period,value,IPC,index,value_real,monthly_change_real,cumulative_change_real,annualized_change_real,year"
        );
        assert_eq!(lines.next().unwrap(), "2000-01-01,100,0.5,100.5,100,,0,,2000");
    }

    #[test]
    fn yearly_cagr_is_written_in_percent() {
        let mut buf = Vec::new();
        write_yearly(&mut buf, &[YearlyCagr { year: 2001, months: 12, cagr: 0.25 }]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "year,months,cagr_pct\n2001,12,25\n");
    }
}
