//! SVG file output.

use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::debug;

use crate::error::AppError;
use crate::plot::{ChartSpec, ChartTheme, draw_chart};

/// Render one chart to an SVG file.
pub fn render_svg(spec: &ChartSpec, path: &Path, size: (u32, u32)) -> Result<(), AppError> {
    if spec.bounds().is_none() {
        return Err(AppError::insufficient_data(format!(
            "Chart '{}' has no data to plot.",
            spec.title
        )));
    }

    let root = SVGBackend::new(path, size).into_drawing_area();
    draw_chart(&root, spec, &ChartTheme::file())
        .and_then(|()| root.present())
        .map_err(|e| AppError::io(format!("Failed to render chart '{}': {e}", path.display())))?;

    debug!(path = %path.display(), "rendered chart");
    Ok(())
}

/// Render every chart into `dir`, named after the chart kind.
pub fn render_all_svg(specs: &[ChartSpec], dir: &Path, size: (u32, u32)) -> Result<Vec<PathBuf>, AppError> {
    let mut written = Vec::with_capacity(specs.len());
    for spec in specs {
        let path = dir.join(format!("{}.svg", spec.kind.file_stem()));
        render_svg(spec, &path, size)?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{Analysis, MergedRecord, YearlyCagr};
    use crate::plot::{ChartKind, build_all};

    #[test]
    fn writes_one_svg_per_chart() {
        let records = (1..=3)
            .map(|m| MergedRecord {
                period: NaiveDate::from_ymd_opt(2000, m, 1).unwrap(),
                value: 100.0 + m as f64,
                rate: 0.1,
                index: 100.0,
                value_real: 100.0 + m as f64,
                monthly_change_real: (m > 1).then_some(1.0),
                cumulative_change_real: m as f64,
                annualized_change_real: (m > 1).then_some(12.7),
            })
            .collect();
        let analysis = Analysis {
            records,
            yearly: vec![YearlyCagr { year: 2000, months: 3, cagr: 0.04 }],
            cagr: 0.04,
        };

        let dir = tempfile::tempdir().unwrap();
        let paths = render_all_svg(&build_all(&analysis), dir.path(), (640, 360)).unwrap();
        assert_eq!(paths.len(), ChartKind::ALL.len());
        for path in paths {
            let text = std::fs::read_to_string(&path).unwrap();
            assert!(text.contains("<svg"), "{} is not an SVG", path.display());
        }
    }
}
