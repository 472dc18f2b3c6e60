//! Plot rendering interface.
//!
//! Commands describe a plot as a [`PlotRequest`] and hand it to a
//! [`PlotRenderer`], which writes an image and returns its path.

use std::path::PathBuf;

use thiserror::Error;

use crate::error::ErrorKind;
use crate::metadata::AxisRange;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("plot rendering is disabled")]
    Disabled,

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("plot backend error: {0}")]
    Backend(String),
}

impl PlotError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } => ErrorKind::Io,
            _ => ErrorKind::Rendering,
        }
    }
}

/// One evaluated curve.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveData {
    pub title: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub style: String,
    pub color: String,
}

impl CurveData {
    /// Drop the points lying outside fixed ranges.
    pub fn clipped(&self, xrange: AxisRange, yrange: AxisRange) -> Self {
        let (x, y) = self
            .x
            .iter()
            .zip(&self.y)
            .filter(|&(&x, &y)| xrange.contains(x) && yrange.contains(y))
            .map(|(&x, &y)| (x, y))
            .unzip();
        Self { x, y, ..self.clone() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotRequest {
    /// File name of the image, without directory or extension.
    pub file_stem: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub xrange: AxisRange,
    pub yrange: AxisRange,
    pub curves: Vec<CurveData>,
}

impl PlotRequest {
    /// Curves with out-of-range points removed.
    pub fn clipped_curves(&self) -> Vec<CurveData> {
        self.curves.iter().map(|c| c.clipped(self.xrange, self.yrange)).collect()
    }
}

pub trait PlotRenderer {
    /// Render the plot and return the path of the written image.
    fn render(&self, request: &PlotRequest) -> Result<PathBuf, PlotError>;
}

/// Renderer for contexts without an image backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledRenderer;

impl PlotRenderer for DisabledRenderer {
    fn render(&self, _request: &PlotRequest) -> Result<PathBuf, PlotError> {
        Err(PlotError::Disabled)
    }
}
