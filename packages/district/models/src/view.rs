//! View models produced by one render pass of the linked-view controller.
//!
//! A [`RenderFrame`] fully describes the map, legend and line chart for the
//! current selection. Renderers turn frames into SVG/HTML; they never read
//! the enrollment index themselves.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ColorDomain, DistrictFeature, Metric, Rgb, SelectionState, format_value};

/// How a single district shape is filled on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "color", rename_all = "camelCase")]
pub enum Fill {
    /// Colored through the clipped sequential scale.
    Scaled(Rgb),
    /// No value for the current year and metric.
    NoData,
    /// The pinned district.
    Highlighted,
    /// Any district other than the pinned one.
    Unselected,
}

/// Styling and data for one district shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    /// The district this shape belongs to.
    pub feature: DistrictFeature,
    /// Current value for the selected year and metric.
    pub value: Option<f64>,
    /// Resolved fill.
    pub fill: Fill,
}

/// A color stop along the legend ramp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegendStop {
    /// Position along the ramp in `0.0..=1.0`.
    pub offset: f64,
    /// Color at this position.
    pub color: Rgb,
}

/// The color legend for the current scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendView {
    /// Domain the ramp spans.
    pub domain: ColorDomain,
    /// Sampled ramp colors from `p5` to `p95`.
    pub stops: Vec<LegendStop>,
}

/// The choropleth map for one render pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    /// One entry per district shape, in collection order.
    pub shapes: Vec<ShapeStyle>,
}

impl MapView {
    /// Looks up the style of the shape with the given district code.
    #[must_use]
    pub fn shape(&self, code: &str) -> Option<&ShapeStyle> {
        self.shapes.iter().find(|s| s.feature.code == code)
    }
}

/// One year on the line chart's x axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// First calendar year of the school year.
    pub year: u16,
    /// Plotted value; `None` keeps the year on the axis but off the line.
    pub value: Option<f64>,
}

/// A single-series line chart over the chart years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineChartView {
    /// Name of the charted district, or the statewide average label.
    pub subject: String,
    /// Metric being charted.
    pub metric: Metric,
    /// One point per chart year, ascending.
    pub points: Vec<SeriesPoint>,
}

impl LineChartView {
    /// Chart title, e.g. "Asian in Boston".
    #[must_use]
    pub fn title(&self) -> String {
        format!("{} in {}", self.metric.label(), self.subject)
    }

    /// Points that have a value, in year order.
    pub fn defined_points(&self) -> impl Iterator<Item = (u16, f64)> + '_ {
        self.points
            .iter()
            .filter_map(|p| p.value.map(|v| (p.year, v)))
    }

    /// Value for a given year, if charted and defined.
    #[must_use]
    pub fn value_for(&self, year: u16) -> Option<f64> {
        self.points
            .iter()
            .find(|p| p.year == year)
            .and_then(|p| p.value)
    }
}

/// Hover tooltip for a district shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    /// District display name.
    pub name: String,
    /// Metric being shown.
    pub metric: Metric,
    /// Value for the current year and metric.
    pub value: Option<f64>,
}

impl fmt::Display for Tooltip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self
            .value
            .map_or_else(|| "No data".to_string(), format_value);
        write!(f, "{}\n{}: {value}", self.name, self.metric.label())
    }
}

/// Complete output of one render pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderFrame {
    /// Selection the frame was rendered for.
    pub selection: SelectionState,
    /// The choropleth, or `None` when the visible distribution is too
    /// small to build a color scale.
    pub map: Option<MapView>,
    /// Legend for the current scale, when one could be computed.
    pub legend: Option<LegendView>,
    /// Line chart for the pinned district or the statewide average.
    pub chart: Option<LineChartView>,
    /// Whether the chart should be brought into view (map click).
    pub scroll_to_chart: bool,
}
