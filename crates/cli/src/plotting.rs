//! SVG plot backend built on `charts-rs`.

use charts_rs::{LineChart, Series};
use labgen_core::plotting::{PlotError, PlotRenderer, PlotRequest};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Writes each plot as `<figures_dir>/<file_stem>.svg`.
#[derive(Debug, Clone)]
pub struct SvgChartRenderer {
    figures_dir: PathBuf,
}

impl SvgChartRenderer {
    pub fn new(figures_dir: impl Into<PathBuf>) -> Self {
        Self { figures_dir: figures_dir.into() }
    }

    fn chart(request: &PlotRequest) -> LineChart {
        let curves = request.clipped_curves();

        // The first curve's x values label the category axis.
        let categories: Vec<String> = curves
            .first()
            .map(|c| c.x.iter().map(|x| format_tick(*x)).collect())
            .unwrap_or_default();

        let series: Vec<Series> = curves
            .iter()
            .map(|c| Series::new(c.title.clone(), c.y.iter().map(|&y| y as f32).collect()))
            .collect();

        let mut chart = LineChart::new(series, categories);
        chart.title_text = request.title.clone();
        chart.sub_title_text = format!("{} / {}", request.y_label, request.x_label);
        chart
    }
}

impl PlotRenderer for SvgChartRenderer {
    fn render(&self, request: &PlotRequest) -> Result<PathBuf, PlotError> {
        fs::create_dir_all(&self.figures_dir)
            .map_err(|source| PlotError::Io { path: self.figures_dir.clone(), source })?;

        let svg = Self::chart(request).svg().map_err(|e| PlotError::Backend(e.to_string()))?;

        let path = self.figures_dir.join(format!("{}.svg", request.file_stem));
        fs::write(&path, svg).map_err(|source| PlotError::Io { path: path.clone(), source })?;
        debug!(path = %path.display(), curves = request.curves.len(), "wrote plot");
        Ok(path)
    }
}

fn format_tick(v: f64) -> String {
    if v.fract() == 0.0 { format!("{v:.0}") } else { format!("{v}") }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labgen_core::metadata::AxisRange;
    use labgen_core::plotting::CurveData;
    use tempfile::tempdir;

    fn request() -> PlotRequest {
        PlotRequest {
            file_stem: "figure_motion".into(),
            title: "Motion".into(),
            x_label: "time".into(),
            y_label: "speed".into(),
            xrange: AxisRange::Auto,
            yrange: AxisRange::Auto,
            curves: vec![CurveData {
                title: "measured".into(),
                x: vec![0.0, 1.0, 2.0],
                y: vec![1.0, 2.5, 4.0],
                style: "lines+points".into(),
                color: "black".into(),
            }],
        }
    }

    #[test]
    fn writes_svg_under_figures_dir() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("out").join("figures");
        let path = SvgChartRenderer::new(&dir).render(&request()).unwrap();

        assert_eq!(path, dir.join("figure_motion.svg"));
        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Motion"));
    }

    #[test]
    fn unwritable_dir_is_an_io_error() {
        let tmp = tempdir().unwrap();
        let blocker = tmp.path().join("figures");
        fs::write(&blocker, "not a directory").unwrap();

        let err = SvgChartRenderer::new(&blocker).render(&request()).unwrap_err();
        assert!(matches!(err, PlotError::Io { .. }), "got {err:?}");
    }

    #[test]
    fn ticks_drop_trailing_zeroes() {
        assert_eq!(format_tick(2.0), "2");
        assert_eq!(format_tick(0.25), "0.25");
    }
}
