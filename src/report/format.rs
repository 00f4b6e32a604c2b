//! Formatted terminal output.
//!
//! We keep formatting code in one place so the engine stays free of
//! presentation concerns and output changes are localized.

use crate::domain::{Analysis, YearlyCagr};

/// Format the run summary: span, first/last prices, whole-period CAGR.
pub fn format_run_summary(analysis: &Analysis) -> String {
    let mut out = String::new();

    out.push_str("=== gold - real gold price (EUR, CPI-adjusted) ===\n");
    if let Some((first, last)) = analysis.span() {
        out.push_str(&format!(
            "Periods: {first} .. {last} ({} months)\n",
            analysis.records.len()
        ));
    }
    if let (Some(first), Some(last)) = (analysis.records.first(), analysis.records.last()) {
        out.push_str(&format!(
            "Nominal: {:.2} -> {:.2} EUR\n",
            first.value, last.value
        ));
        out.push_str(&format!(
            "Real:    {:.2} -> {:.2} EUR ({:+.2}% cumulative)\n",
            first.value_real, last.value_real, last.cumulative_change_real
        ));
        out.push_str(&format!("CPI index: {:.3} -> {:.3}\n", first.index, last.index));
    }
    out.push_str(&format!(
        "Average annualized real growth (CAGR): {:.2}%\n",
        analysis.cagr_pct()
    ));

    out
}

/// Format the per-year CAGR table.
pub fn format_yearly_table(yearly: &[YearlyCagr]) -> String {
    let mut out = String::new();
    out.push_str("year  months  cagr_real\n");
    for y in yearly {
        out.push_str(&format!("{:<4}  {:>6}  {:>8.2}%\n", y.year, y.months, y.cagr_pct()));
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::MergedRecord;

    #[test]
    fn summary_reports_cagr_in_percent() {
        let rec = |y: i32, value: f64| MergedRecord {
            period: NaiveDate::from_ymd_opt(y, 1, 1).unwrap(),
            value,
            rate: 0.0,
            index: 100.0,
            value_real: value,
            monthly_change_real: None,
            cumulative_change_real: (value / 100.0 - 1.0) * 100.0,
            annualized_change_real: None,
        };
        let analysis = Analysis {
            records: vec![rec(2000, 100.0), rec(2010, 300.0)],
            yearly: Vec::new(),
            cagr: 0.1161,
        };
        let text = format_run_summary(&analysis);
        assert!(text.contains("2000-01-01 .. 2010-01-01 (2 months)"));
        assert!(text.contains("+200.00% cumulative"));
        assert!(text.contains("(CAGR): 11.61%"));
    }

    #[test]
    fn yearly_table_has_one_row_per_year() {
        let table = format_yearly_table(&[
            YearlyCagr { year: 2000, months: 12, cagr: 0.05 },
            YearlyCagr { year: 2001, months: 3, cagr: -0.125 },
        ]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "2000      12      5.00%");
        assert_eq!(lines[2], "2001       3    -12.50%");
    }
}
