//! Chart descriptions and Plotters drawing.
//!
//! Charts are built as plain data (`ChartSpec`) from an `Analysis`, then drawn
//! by `draw_chart` onto any Plotters backend: SVG files (`svg`) or the TUI.
//! Keeping the data prep separate makes the series easy to test without
//! rendering anything.

use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;

use crate::domain::{Analysis, MergedRecord, fractional_year};

pub mod svg;

pub use svg::{render_all_svg, render_svg};

/// The five charts produced by a run, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Nominal,
    NominalVsReal,
    CumulativeReal,
    AnnualizedReal,
    CagrPerYear,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::Nominal,
        ChartKind::NominalVsReal,
        ChartKind::CumulativeReal,
        ChartKind::AnnualizedReal,
        ChartKind::CagrPerYear,
    ];

    pub fn file_stem(self) -> &'static str {
        match self {
            ChartKind::Nominal => "gold_nominal",
            ChartKind::NominalVsReal => "gold_nominal_vs_real",
            ChartKind::CumulativeReal => "gold_cumulative_real_change",
            ChartKind::AnnualizedReal => "gold_annualized_real_change",
            ChartKind::CagrPerYear => "gold_cagr_per_year",
        }
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|&k| k == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let i = Self::ALL.iter().position(|&k| k == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// One labelled line.
#[derive(Debug, Clone)]
pub struct LineData {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

/// A render-only chart description.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub lines: Vec<LineData>,
    /// `(year, value)` bars; empty for line charts.
    pub bars: Vec<(i32, f64)>,
}

impl ChartSpec {
    /// Padded x and y bounds covering every series, or `None` when there is nothing to draw.
    pub fn bounds(&self) -> Option<([f64; 2], [f64; 2])> {
        let (mut x0, mut x1) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut y0, mut y1) = (f64::INFINITY, f64::NEG_INFINITY);

        for &(x, y) in self.lines.iter().flat_map(|l| l.points.iter()) {
            x0 = x0.min(x);
            x1 = x1.max(x);
            y0 = y0.min(y);
            y1 = y1.max(y);
        }
        for &(year, v) in &self.bars {
            x0 = x0.min(year as f64 - 0.5);
            x1 = x1.max(year as f64 + 0.5);
            // Bars grow from zero.
            y0 = y0.min(v.min(0.0));
            y1 = y1.max(v.max(0.0));
        }

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) {
            return None;
        }
        if x1 - x0 < 1e-9 {
            x0 -= 0.5;
            x1 += 0.5;
        }
        let pad = ((y1 - y0).abs() * 0.05).max(1e-6);
        Some(([x0, x1], [y0 - pad, y1 + pad]))
    }
}

/// Build the spec for one chart.
pub fn build_chart(kind: ChartKind, analysis: &Analysis) -> ChartSpec {
    let records = analysis.records.as_slice();

    let time_chart = |title: &str, y_label: &str, lines: Vec<LineData>| ChartSpec {
        kind,
        title: title.to_string(),
        x_label: "Date".to_string(),
        y_label: y_label.to_string(),
        lines,
        bars: Vec::new(),
    };

    match kind {
        ChartKind::Nominal => time_chart(
            "Monthly gold price (EUR)",
            "Gold price (EUR)",
            vec![line(records, "Nominal gold price (EUR)", |r| Some(r.value))],
        ),
        ChartKind::NominalVsReal => time_chart(
            "Monthly gold price: nominal vs real (CPI-adjusted)",
            "Gold price (EUR)",
            vec![
                line(records, "Nominal gold price (EUR)", |r| Some(r.value)),
                line(records, "Real gold price (EUR, CPI-adjusted)", |r| Some(r.value_real)),
            ],
        ),
        ChartKind::CumulativeReal => time_chart(
            "Cumulative real change of the gold price",
            "Cumulative real change (%)",
            vec![line(records, "Cumulative real change (%)", |r| Some(r.cumulative_change_real))],
        ),
        ChartKind::AnnualizedReal => time_chart(
            "Annualized real change of the gold price",
            "Annualized real change (%)",
            vec![line(records, "Annualized real change (%)", |r| r.annualized_change_real)],
        ),
        ChartKind::CagrPerYear => ChartSpec {
            kind,
            title: "Annual CAGR of the real gold price".to_string(),
            x_label: "Year".to_string(),
            y_label: "CAGR (%)".to_string(),
            lines: Vec::new(),
            bars: analysis.yearly.iter().map(|y| (y.year, y.cagr_pct())).collect(),
        },
    }
}

fn line(records: &[MergedRecord], label: &str, f: impl Fn(&MergedRecord) -> Option<f64>) -> LineData {
    LineData {
        label: label.to_string(),
        points: records
            .iter()
            .filter_map(|r| f(r).map(|y| (fractional_year(r.period), y)))
            .collect(),
    }
}

pub fn build_all(analysis: &Analysis) -> Vec<ChartSpec> {
    ChartKind::ALL.iter().map(|&k| build_chart(k, analysis)).collect()
}

/// Colors and sizes for a drawing target.
#[derive(Debug, Clone, Copy)]
pub struct ChartTheme {
    pub background: Option<RGBColor>,
    pub text: RGBColor,
    pub series: [RGBColor; 2],
    pub font_size: u32,
    pub margin: u32,
    pub x_label_area: u32,
    pub y_label_area: u32,
    pub caption: bool,
    pub legend: bool,
    pub mesh: bool,
}

impl ChartTheme {
    /// Light theme for image files.
    pub fn file() -> Self {
        Self {
            background: Some(WHITE),
            text: BLACK,
            series: [RGBColor(31, 119, 180), RGBColor(255, 127, 14)],
            font_size: 14,
            margin: 15,
            x_label_area: 40,
            y_label_area: 70,
            caption: true,
            legend: true,
            mesh: true,
        }
    }

    /// High-contrast, compact theme for terminal cells.
    pub fn terminal() -> Self {
        Self {
            background: None,
            text: WHITE,
            series: [RGBColor(0, 255, 255), RGBColor(255, 255, 0)],
            font_size: 10,
            margin: 1,
            x_label_area: 3,
            y_label_area: 8,
            caption: false,
            legend: false,
            mesh: false,
        }
    }
}

/// Draw a chart onto any Plotters drawing area.
pub fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    theme: &ChartTheme,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    if let Some(bg) = theme.background {
        root.fill(&bg)?;
    }
    let Some(([x0, x1], [y0, y1])) = spec.bounds() else {
        return Ok(());
    };

    let mut builder = ChartBuilder::on(root);
    builder
        .margin(theme.margin)
        .set_label_area_size(LabelAreaPosition::Left, theme.y_label_area)
        .set_label_area_size(LabelAreaPosition::Bottom, theme.x_label_area);
    if theme.caption {
        builder.caption(&spec.title, ("sans-serif", theme.font_size + 6).into_font().color(&theme.text));
    }
    let mut chart = builder.build_cartesian_2d(x0..x1, y0..y1)?;

    let fmt_x = |v: &f64| format!("{v:.0}");
    let fmt_y = |v: &f64| format!("{v:.1}");
    {
        let mut mesh = chart.configure_mesh();
        if !theme.mesh {
            mesh.disable_x_mesh().disable_y_mesh();
        }
        mesh.x_desc(spec.x_label.as_str())
            .y_desc(spec.y_label.as_str())
            .x_labels(8)
            .y_labels(6)
            .x_label_formatter(&fmt_x)
            .y_label_formatter(&fmt_y)
            .label_style(("sans-serif", theme.font_size).into_font().color(&theme.text))
            .axis_style(&theme.text)
            .draw()?;
    }

    for (i, line) in spec.lines.iter().enumerate() {
        let color = theme.series[i % theme.series.len()];
        chart
            .draw_series(LineSeries::new(line.points.iter().copied(), color.stroke_width(2)))?
            .label(line.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    if !spec.bars.is_empty() {
        let color = theme.series[0];
        chart.draw_series(spec.bars.iter().map(|&(year, v)| {
            let x = year as f64;
            Rectangle::new([(x - 0.4, 0.0), (x + 0.4, v)], color.filled())
        }))?;
    }

    if theme.legend && !spec.lines.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .label_font(("sans-serif", theme.font_size).into_font().color(&theme.text))
            .background_style(&WHITE.mix(0.8))
            .border_style(&theme.text)
            .draw()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::YearlyCagr;

    fn analysis() -> Analysis {
        let rec = |m: u32, value: f64, value_real: f64, monthly: Option<f64>| MergedRecord {
            period: NaiveDate::from_ymd_opt(2000, m, 1).unwrap(),
            value,
            rate: 0.0,
            index: 100.0,
            value_real,
            monthly_change_real: monthly,
            cumulative_change_real: (value_real / 100.0 - 1.0) * 100.0,
            annualized_change_real: monthly.map(|m| m * 12.0),
        };
        Analysis {
            records: vec![rec(1, 100.0, 100.0, None), rec(2, 110.0, 108.0, Some(8.0))],
            yearly: vec![YearlyCagr { year: 2000, months: 2, cagr: 0.5 }],
            cagr: 0.1,
        }
    }

    #[test]
    fn overlay_has_nominal_and_real_lines() {
        let spec = build_chart(ChartKind::NominalVsReal, &analysis());
        assert_eq!(spec.lines.len(), 2);
        assert_eq!(spec.lines[0].points, vec![(2000.0, 100.0), (2000.0 + 1.0 / 12.0, 110.0)]);
        assert_eq!(spec.lines[1].points[1].1, 108.0);
    }

    #[test]
    fn annualized_chart_omits_first_period() {
        let spec = build_chart(ChartKind::AnnualizedReal, &analysis());
        assert_eq!(spec.lines[0].points.len(), 1);
        assert_eq!(spec.lines[0].points[0].1, 96.0);
    }

    #[test]
    fn cagr_bars_are_in_percent_and_include_zero() {
        let spec = build_chart(ChartKind::CagrPerYear, &analysis());
        assert_eq!(spec.bars, vec![(2000, 50.0)]);
        let (x, y) = spec.bounds().unwrap();
        assert_eq!(x, [1999.5, 2000.5]);
        assert!(y[0] < 0.0 && y[1] > 50.0);
    }

    #[test]
    fn empty_chart_has_no_bounds() {
        let empty = Analysis { records: Vec::new(), yearly: Vec::new(), cagr: 0.0 };
        assert!(build_chart(ChartKind::Nominal, &empty).bounds().is_none());
    }

    #[test]
    fn chart_cycle_wraps() {
        assert_eq!(ChartKind::CagrPerYear.next(), ChartKind::Nominal);
        assert_eq!(ChartKind::Nominal.prev(), ChartKind::CagrPerYear);
    }
}
