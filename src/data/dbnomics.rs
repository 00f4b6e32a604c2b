//! DBnomics API integration for the LBMA gold series.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::data::SeriesFetcher;
use crate::domain::{PricePoint, month_start};
use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://api.db.nomics.world/v22";

pub struct DbnomicsClient {
    client: Client,
    base_url: String,
}

impl DbnomicsClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::fetch(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

impl SeriesFetcher for DbnomicsClient {
    fn fetch(
        &self,
        provider: &str,
        dataset: &str,
        dimensions: &BTreeMap<String, Vec<String>>,
    ) -> Result<Vec<PricePoint>, AppError> {
        let url = format!("{}/series/{provider}/{dataset}", self.base_url);
        let dims = serde_json::to_string(dimensions)
            .map_err(|e| AppError::config(format!("Invalid DBnomics dimensions: {e}")))?;
        debug!(%url, %dims, "requesting DBnomics series");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("dimensions", dims.as_str()),
                ("observations", "1"),
                ("format", "json"),
            ])
            .send()
            .map_err(|e| AppError::fetch(format!("DBnomics request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::fetch(format!(
                "DBnomics request for {provider}/{dataset} failed with status {}.",
                resp.status()
            )));
        }

        let body: SeriesResponse = resp
            .json()
            .map_err(|e| AppError::parse(format!("Failed to parse DBnomics response: {e}")))?;

        let points = points_from_response(body)?;
        info!(provider, dataset, observations = points.len(), "fetched gold series");
        Ok(points)
    }
}

#[derive(Debug, Deserialize)]
pub struct SeriesResponse {
    series: SeriesPage,
}

#[derive(Debug, Deserialize)]
struct SeriesPage {
    docs: Vec<SeriesDoc>,
}

#[derive(Debug, Deserialize)]
struct SeriesDoc {
    #[serde(default)]
    series_code: Option<String>,
    #[serde(default)]
    period: Vec<String>,
    #[serde(default)]
    period_start_day: Vec<String>,
    #[serde(default)]
    value: Vec<serde_json::Value>,
}

/// Convert a DBnomics response holding exactly one series into price points.
///
/// Missing observations (`"NA"`, null) are skipped.
pub fn points_from_response(body: SeriesResponse) -> Result<Vec<PricePoint>, AppError> {
    let mut docs = body.series.docs;
    if docs.len() != 1 {
        let codes: Vec<String> = docs.iter().filter_map(|d| d.series_code.clone()).collect();
        return Err(AppError::fetch(format!(
            "Expected exactly one DBnomics series for the selector, got {} [{}].",
            docs.len(),
            codes.join(", ")
        )));
    }
    let doc = docs.remove(0);

    if doc.value.len() != doc.period.len() {
        return Err(AppError::parse(format!(
            "DBnomics series has {} periods but {} values.",
            doc.period.len(),
            doc.value.len()
        )));
    }

    let mut out = Vec::with_capacity(doc.period.len());
    let mut skipped = 0usize;
    for (i, (period, raw)) in doc.period.iter().zip(&doc.value).enumerate() {
        let Some(value) = parse_value(raw) else {
            skipped += 1;
            continue;
        };
        let date = match doc.period_start_day.get(i) {
            Some(day) => NaiveDate::parse_from_str(day, "%Y-%m-%d")
                .map_err(|e| AppError::parse(format!("Invalid DBnomics period start '{day}': {e}")))?,
            None => parse_month(period)
                .ok_or_else(|| AppError::parse(format!("Invalid DBnomics period '{period}'.")))?,
        };
        out.push(PricePoint {
            period: month_start(date),
            value,
        });
    }

    if skipped > 0 {
        debug!(skipped, "skipped missing DBnomics observations");
    }
    Ok(out)
}

fn parse_value(raw: &serde_json::Value) -> Option<f64> {
    let v = match raw {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if v.is_finite() { Some(v) } else { None }
}

/// `YYYY-MM` -> first day of that month.
fn parse_month(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d").ok()
}
