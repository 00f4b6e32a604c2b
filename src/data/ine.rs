//! INE (Spanish statistics institute) CPI loader.
//!
//! INE publishes its tables as `;`-delimited CSV with comma decimals, one
//! row per (data type, period). We keep only the monthly variation rows.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use chrono::NaiveDate;
use csv::StringRecord;
use reqwest::blocking::Client;
use tracing::{info, warn};

use crate::data::CpiSource;
use crate::domain::CpiRecord;
use crate::error::AppError;

/// General CPI variation rates (table 50911).
pub const DEFAULT_CPI_URL: &str = "https://www.ine.es/jaxiT3/files/t/csv_bdsc/50911.csv";

const COL_DATA_TYPE: &str = "tipo de dato";
const COL_PERIOD: &str = "periodo";
const COL_TOTAL: &str = "total";
const MONTHLY_VARIATION: &str = "variación mensual";

pub struct IneCpiClient {
    client: Client,
    url: String,
}

impl IneCpiClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::fetch(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl CpiSource for IneCpiClient {
    fn load(&self) -> Result<Vec<CpiRecord>, AppError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| AppError::fetch(format!("CPI download failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::fetch(format!(
                "CPI download from {} failed with status {}.",
                self.url,
                resp.status()
            )));
        }

        let bytes = resp
            .bytes()
            .map_err(|e| AppError::fetch(format!("Failed to read CPI response body: {e}")))?;
        let records = parse_cpi_csv(&decode_body(&bytes))?;
        info!(url = %self.url, records = records.len(), "loaded CPI series");
        Ok(records)
    }
}

/// Parse the INE CSV body into monthly variation records, in file order.
pub fn parse_cpi_csv(text: &str) -> Result<Vec<CpiRecord>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::parse(format!("Failed to read CPI CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let data_type_idx = require_column(&header_map, COL_DATA_TYPE, "Tipo de dato")?;
    let period_idx = require_column(&header_map, COL_PERIOD, "Periodo")?;
    let total_idx = require_column(&header_map, COL_TOTAL, "Total")?;

    let mut out = Vec::new();
    let mut seen = HashSet::new();
    let mut unpublished = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header; CSV lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| AppError::parse(format!("CPI CSV line {line}: {e}")))?;

        let data_type = record.get(data_type_idx).unwrap_or("");
        if data_type.to_lowercase() != MONTHLY_VARIATION {
            continue;
        }

        let raw_period = record.get(period_idx).unwrap_or("");
        let period = parse_period(raw_period).ok_or_else(|| {
            AppError::parse(format!(
                "CPI CSV line {line}, column 'Periodo': unexpected period '{raw_period}' (expected <year>M<month>)."
            ))
        })?;

        let raw_total = record.get(total_idx).unwrap_or("");
        if is_unpublished(raw_total) {
            unpublished += 1;
            continue;
        }
        let rate = parse_decimal_comma(raw_total).ok_or_else(|| {
            AppError::parse(format!(
                "CPI CSV line {line}, column 'Total': invalid rate '{raw_total}'."
            ))
        })?;

        if !seen.insert(period) {
            return Err(AppError::parse(format!(
                "CPI CSV line {line}: duplicate monthly variation for period {raw_period}."
            )));
        }
        out.push(CpiRecord { period, rate });
    }

    if unpublished > 0 {
        warn!(rows = unpublished, "skipped CPI rows without a published rate");
    }
    Ok(out)
}

/// Decode the response body; INE has served both UTF-8 and Latin-1 files.
fn decode_body(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    name.trim().trim_start_matches('\u{feff}').trim().to_lowercase()
}

fn require_column(map: &HashMap<String, usize>, key: &str, display: &str) -> Result<usize, AppError> {
    map.get(key)
        .copied()
        .ok_or_else(|| AppError::parse(format!("CPI CSV is missing required column '{display}'.")))
}

/// `2024M01` -> 2024-01-01.
fn parse_period(raw: &str) -> Option<NaiveDate> {
    let (year, month) = raw.trim().split_once('M')?;
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn is_unpublished(raw: &str) -> bool {
    matches!(raw.trim(), "" | ".." | "." | "-")
}

fn parse_decimal_comma(raw: &str) -> Option<f64> {
    let v = raw.trim().replace(',', ".").parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\u{feff}Total Nacional;Índice general;Tipo de dato;Periodo;Total\n\
        Total Nacional;Índice general;Variación mensual;2024M02;0,4\n\
        Total Nacional;Índice general;Variación anual;2024M02;2,8\n\
        Total Nacional;Índice general;Variación mensual;2024M01;-0,1\n\
        Total Nacional;Índice general;Variación mensual;2024M03;\n";

    #[test]
    fn keeps_monthly_variation_rows() {
        let records = parse_cpi_csv(SAMPLE).unwrap();
        assert_eq!(
            records,
            vec![
                CpiRecord { period: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(), rate: 0.4 },
                CpiRecord { period: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), rate: -0.1 },
            ]
        );
    }

    #[test]
    fn missing_column_is_named() {
        let err = parse_cpi_csv("Tipo de dato;Periodo\nVariación mensual;2024M01\n").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Parse);
        assert!(err.message().contains("'Total'"));
    }

    #[test]
    fn bad_period_reports_line_and_column() {
        let text = "Tipo de dato;Periodo;Total\nVariación mensual;2024-01;0,3\n";
        let err = parse_cpi_csv(text).unwrap_err();
        assert!(err.message().contains("line 2"));
        assert!(err.message().contains("Periodo"));
    }

    #[test]
    fn duplicate_period_is_rejected() {
        let text = "Tipo de dato;Periodo;Total\n\
            Variación mensual;2024M01;0,3\n\
            Variación mensual;2024M01;0,2\n";
        let err = parse_cpi_csv(text).unwrap_err();
        assert!(err.message().contains("line 3"));
    }

    #[test]
    fn latin1_body_is_decoded() {
        // "Variación" with 'ó' encoded as a single 0xF3 byte.
        let mut bytes = b"Tipo de dato;Periodo;Total\nVariaci".to_vec();
        bytes.push(0xF3);
        bytes.extend_from_slice(b"n mensual;2023M12;0,1\n");
        let records = parse_cpi_csv(&decode_body(&bytes)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].rate, 0.1);
    }
}
