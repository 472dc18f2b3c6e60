use crate::metadata::{AxisRange, Metadata, SubObject};

pub const FIGURE_PREFIX: &str = "figure_";

/// A named plot: axis labels, ranges and a list of curves.
#[derive(Debug, Clone, PartialEq)]
pub struct Plot {
    pub name: String,
    pub title: String,
    pub label: String,
    pub metadata: Metadata,
}

/// Borrowed view of one curve of a plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Curve<'p> {
    pub title: &'p str,
    pub color: &'p str,
    pub style: &'p str,
    pub x: &'p str,
    pub y: &'p str,
    pub scope: &'p str,
}

impl<'p> Curve<'p> {
    fn from_object(obj: &'p SubObject) -> Self {
        let m = &obj.metadata;
        Self {
            title: &obj.title,
            color: m.get_str("color").unwrap_or("black"),
            style: m.get_str("style").unwrap_or("lines+points"),
            x: m.get_str("x").unwrap_or("x"),
            y: m.get_str("y").unwrap_or("y"),
            scope: m.get_str("scope").unwrap_or_default(),
        }
    }
}

impl Plot {
    pub fn label_for(name: &str) -> String {
        format!("plot:{name}")
    }

    /// Name of the figure derived from this plot.
    pub fn figure_name(&self) -> String {
        format!("{FIGURE_PREFIX}{}", self.name)
    }

    /// `(x label, y label)` from the `axes` property.
    pub fn axes(&self) -> (&str, &str) {
        let axes = self.metadata.get_list("axes").unwrap_or_default();
        let x = axes.first().map_or("x", String::as_str);
        let y = axes.get(1).map_or("y", String::as_str);
        (x, y)
    }

    pub fn xrange(&self) -> AxisRange {
        self.metadata.get_range("xrange").unwrap_or(AxisRange::Auto)
    }

    pub fn yrange(&self) -> AxisRange {
        self.metadata.get_range("yrange").unwrap_or(AxisRange::Auto)
    }

    /// Curves in definition order.
    pub fn curves(&self) -> Vec<Curve<'_>> {
        self.metadata.objects("curve").map(Curve::from_object).collect()
    }
}

/// The figure wrapping a plot's rendered image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Figure {
    pub name: String,
    pub title: String,
    pub label: String,
    /// Name of the plot the image comes from.
    pub plot: String,
}

impl Figure {
    pub fn for_plot(plot: &Plot) -> Self {
        Self {
            name: plot.figure_name(),
            title: plot.title.clone(),
            label: format!("fig:{}", plot.name),
            plot: plot.name.clone(),
        }
    }

    /// File stem of the rendered image.
    pub fn file_stem(&self) -> &str {
        &self.name
    }
}
