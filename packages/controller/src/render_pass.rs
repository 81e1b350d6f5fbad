//! Builds a [`RenderFrame`] from the selection and the indexed data.
//!
//! A render pass recomputes everything the views show: shape fills, the
//! legend ramp, and the line chart. Nothing is carried over from the
//! previous frame.

use ma_equity_district_models::view::{
    Fill, LineChartView, MapView, RenderFrame, SeriesPoint, ShapeStyle,
};
use ma_equity_district_models::{DistrictSelection, STATEWIDE_AVERAGE_NAME, SelectionState};
use ma_equity_scale::SequentialScale;

use crate::{ControllerSettings, Dataset};

/// Runs one full render pass.
#[must_use]
pub fn render(
    state: &SelectionState,
    dataset: &Dataset,
    settings: &ControllerSettings,
    scroll_to_chart: bool,
) -> RenderFrame {
    let values = dataset.index().defined_values(state.year, state.metric);
    let scale = match SequentialScale::from_values(&values, &settings.palette, settings.no_data) {
        Ok(scale) => Some(scale),
        Err(e) => {
            log::info!(
                "No color scale for {} in {}: {e}",
                state.metric.label(),
                state.year
            );
            None
        }
    };

    let map = match (&state.district, &scale) {
        (DistrictSelection::District(name), _) => Some(pinned_map(state, dataset, name)),
        (DistrictSelection::All, Some(scale)) => Some(scaled_map(state, dataset, scale)),
        (DistrictSelection::All, None) => None,
    };

    RenderFrame {
        selection: state.clone(),
        map,
        legend: scale.as_ref().map(|s| s.legend(settings.legend_samples)),
        chart: Some(chart(state, dataset, settings)),
        scroll_to_chart,
    }
}

fn shape_styles<F>(state: &SelectionState, dataset: &Dataset, fill: F) -> MapView
where
    F: Fn(&str, Option<f64>) -> Fill,
{
    let shapes = dataset
        .districts()
        .shapes()
        .iter()
        .map(|shape| {
            let value = dataset
                .index()
                .value(state.year, &shape.feature.code, state.metric);
            ShapeStyle {
                fill: fill(&shape.feature.name, value),
                feature: shape.feature.clone(),
                value,
            }
        })
        .collect();
    MapView { shapes }
}

fn scaled_map(state: &SelectionState, dataset: &Dataset, scale: &SequentialScale) -> MapView {
    shape_styles(state, dataset, |_, value| match value {
        Some(v) => Fill::Scaled(scale.color(Some(v))),
        None => Fill::NoData,
    })
}

fn pinned_map(state: &SelectionState, dataset: &Dataset, pinned: &str) -> MapView {
    shape_styles(state, dataset, |name, _| {
        if name == pinned {
            Fill::Highlighted
        } else {
            Fill::Unselected
        }
    })
}

fn chart(state: &SelectionState, dataset: &Dataset, settings: &ControllerSettings) -> LineChartView {
    let years = settings.chart_years.iter();
    let (subject, points) = match &state.district {
        DistrictSelection::All => (
            STATEWIDE_AVERAGE_NAME.to_string(),
            dataset
                .index()
                .statewide_average_series(state.metric, years),
        ),
        DistrictSelection::District(name) => {
            let points = match dataset.districts().find_by_name(name) {
                Some(shape) => {
                    dataset
                        .index()
                        .district_series(&shape.feature.code, state.metric, years)
                }
                None => years
                    .map(|year| SeriesPoint { year, value: None })
                    .collect(),
            };
            (name.clone(), points)
        }
    };

    LineChartView {
        subject,
        metric: state.metric,
        points,
    }
}
