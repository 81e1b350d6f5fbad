//! Pure selection-state transitions, one per [`UiEvent`] kind.
//!
//! Handlers never touch the views. They compute the next
//! [`SelectionState`] and whether the page should scroll to the chart;
//! the controller then runs a single render pass over the result.

use ma_equity_config::YearRange;
use ma_equity_district_models::{DistrictSelection, Metric, SelectionState};
use ma_equity_geography::DistrictCollection;

use crate::{Dataset, UiEvent};

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Selection after the event.
    pub state: SelectionState,
    /// Whether the chart section should be scrolled into view.
    pub scroll_to_chart: bool,
}

impl Transition {
    const fn stay(state: SelectionState) -> Self {
        Self {
            state,
            scroll_to_chart: false,
        }
    }
}

/// Moves to `year`, clamped into `years`.
#[must_use]
pub fn on_year_input(state: &SelectionState, year: u16, years: YearRange) -> Transition {
    let clamped = years.clamp(year);
    if !years.contains(year) {
        log::debug!("Year {year} outside {}..={}, using {clamped}", years.first, years.last);
    }
    Transition::stay(SelectionState {
        year: clamped,
        ..state.clone()
    })
}

/// Switches the visible metric. Year and district are kept.
#[must_use]
pub fn on_metric_changed(state: &SelectionState, metric: Metric) -> Transition {
    Transition::stay(SelectionState {
        metric,
        ..state.clone()
    })
}

/// Applies a district dropdown value. `"all"` unpins; any other value pins
/// that name even when no shape carries it.
#[must_use]
pub fn on_district_changed(
    state: &SelectionState,
    selector: &str,
    districts: &DistrictCollection,
) -> Transition {
    let district = DistrictSelection::from_selector(selector);
    if let Some(name) = district
        .pinned()
        .filter(|name| districts.find_by_name(name).is_none())
    {
        log::warn!("No district shape named '{name}'; map will show no highlight");
    }
    Transition::stay(SelectionState {
        district,
        ..state.clone()
    })
}

/// Pins the clicked district by name and requests a scroll to the chart.
/// A code without a shape leaves the state unchanged.
#[must_use]
pub fn on_feature_clicked(
    state: &SelectionState,
    code: &str,
    districts: &DistrictCollection,
) -> Transition {
    let Some(shape) = districts.find_by_code(code) else {
        log::warn!("Click on unknown district code '{code}' ignored");
        return Transition::stay(state.clone());
    };

    Transition {
        state: SelectionState {
            district: DistrictSelection::District(shape.feature.name.clone()),
            ..state.clone()
        },
        scroll_to_chart: true,
    }
}

/// Dispatches `event` to its handler.
#[must_use]
pub fn apply(state: &SelectionState, event: &UiEvent, dataset: &Dataset) -> Transition {
    let districts = dataset.districts();
    match event {
        UiEvent::YearInput(year) => on_year_input(state, *year, dataset.years()),
        UiEvent::MetricChanged(metric) => on_metric_changed(state, *metric),
        UiEvent::DistrictChanged(selector) => on_district_changed(state, selector, districts),
        UiEvent::FeatureClicked { code } => on_feature_clicked(state, code, districts),
    }
}
