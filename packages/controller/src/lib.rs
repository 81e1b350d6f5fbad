#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Linked-view controller for the equity map.
//!
//! [`LinkedViewController`] owns the only mutable state of the page, the
//! [`SelectionState`]. Events go through the pure functions in
//! [`handlers`] and every accepted event triggers one full render pass
//! ([`render_pass::render`]) that yields a fresh [`RenderFrame`] for the
//! map, legend and line chart.

pub mod event;
pub mod handlers;
pub mod render_pass;

use ma_equity_config::{VizConfig, YearRange};
use ma_equity_district_models::view::{RenderFrame, Tooltip};
use ma_equity_district_models::{DistrictFeature, DistrictSelection, Metric, Rgb, SelectionState};
use ma_equity_enrollment::EnrollmentIndex;
use ma_equity_geography::{DistrictCollection, DistrictLocator, MercatorProjection};
use ma_equity_loader::LoadedData;
use strum_macros::{AsRefStr, Display};

pub use event::{ParseEventError, UiEvent};
pub use handlers::Transition;

/// Render settings the controller needs from [`VizConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSettings {
    /// Years on the line chart's x axis; also the year control's range.
    pub chart_years: YearRange,
    /// Palette for the sequential scale.
    pub palette: Vec<Rgb>,
    /// Fill for shapes without data.
    pub no_data: Rgb,
    /// Number of legend stops.
    pub legend_samples: usize,
    /// District pinned on first render, if any.
    pub initial_district: Option<String>,
    /// Map canvas width and height in pixels.
    pub map_size: (u32, u32),
}

impl From<&VizConfig> for ControllerSettings {
    fn from(config: &VizConfig) -> Self {
        Self {
            chart_years: config.years,
            palette: config.colors.palette.clone(),
            no_data: config.colors.no_data,
            legend_samples: config.legend.samples,
            initial_district: config.initial_district.clone(),
            map_size: (config.map.width, config.map.height),
        }
    }
}

/// Loaded and indexed data, immutable after load.
#[derive(Debug)]
pub struct Dataset {
    districts: DistrictCollection,
    index: EnrollmentIndex,
    locator: DistrictLocator,
    years: YearRange,
}

impl Dataset {
    /// Indexes freshly loaded data. The selectable year range is the part of
    /// `control_years` the index actually covers, or the whole index range
    /// when the two do not overlap.
    #[must_use]
    pub fn new(data: LoadedData, control_years: YearRange) -> Self {
        let index = EnrollmentIndex::build(data.records);
        let locator = DistrictLocator::new(&data.districts);

        let years = index.year_range().map_or(control_years, |range| {
            let first = (*range.start()).max(control_years.first);
            let last = (*range.end()).min(control_years.last);
            if first <= last {
                YearRange { first, last }
            } else {
                YearRange {
                    first: *range.start(),
                    last: *range.end(),
                }
            }
        });

        log::info!(
            "Dataset ready: {} districts, years {}..={}",
            data.districts.len(),
            years.first,
            years.last
        );

        Self {
            districts: data.districts,
            index,
            locator,
            years,
        }
    }

    /// District shapes.
    #[must_use]
    pub const fn districts(&self) -> &DistrictCollection {
        &self.districts
    }

    /// Enrollment lookups.
    #[must_use]
    pub const fn index(&self) -> &EnrollmentIndex {
        &self.index
    }

    /// Years the selection may take.
    #[must_use]
    pub const fn years(&self) -> YearRange {
        self.years
    }

    /// District under pixel (`px`, `py`) of a `width × height` map fitted to
    /// the district bounds.
    #[must_use]
    pub fn locate_pixel(
        &self,
        px: f64,
        py: f64,
        (width, height): (u32, u32),
    ) -> Option<&DistrictFeature> {
        let bounds = self.districts.bounds()?;
        let projection = MercatorProjection::fit_size(f64::from(width), f64::from(height), bounds);
        self.locator.locate_pixel(&projection, px, py)
    }
}

/// Lifecycle of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    /// Waiting for data.
    Idle,
    /// Data loaded; waiting for events.
    Loaded,
    /// A render pass is running.
    Rendering,
}

struct Session {
    dataset: Dataset,
    state: SelectionState,
}

/// Owns the selection and turns events into render frames.
pub struct LinkedViewController {
    settings: ControllerSettings,
    phase: Phase,
    session: Option<Session>,
}

impl LinkedViewController {
    /// Creates an idle controller.
    #[must_use]
    pub const fn new(settings: ControllerSettings) -> Self {
        Self {
            settings,
            phase: Phase::Idle,
            session: None,
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Current selection, once data is loaded.
    #[must_use]
    pub fn state(&self) -> Option<&SelectionState> {
        self.session.as_ref().map(|s| &s.state)
    }

    /// Loaded dataset, once data is loaded.
    #[must_use]
    pub fn dataset(&self) -> Option<&Dataset> {
        self.session.as_ref().map(|s| &s.dataset)
    }

    /// Accepts loaded data and runs the initial render pass.
    ///
    /// The first selection is the latest available year with every
    /// district and the total enrollment metric, unless an initial district
    /// is configured. Loading again replaces the previous dataset.
    pub fn load(&mut self, data: LoadedData) -> RenderFrame {
        let dataset = Dataset::new(data, self.settings.chart_years);
        let mut state = SelectionState::new(dataset.years().last, Metric::All);
        if let Some(name) = &self.settings.initial_district {
            state.district = DistrictSelection::from_selector(name);
        }

        let session = Session { dataset, state };
        let frame = run_pass(&mut self.phase, &session, &self.settings, false);
        self.session = Some(session);
        frame
    }

    /// Applies one event and re-renders. Returns `None` while idle.
    pub fn dispatch(&mut self, event: &UiEvent) -> Option<RenderFrame> {
        let session = self.session.as_mut()?;
        log::debug!("Dispatching {event}");

        let transition = handlers::apply(&session.state, event, &session.dataset);
        session.state = transition.state;
        Some(run_pass(
            &mut self.phase,
            session,
            &self.settings,
            transition.scroll_to_chart,
        ))
    }

    /// Clicks the map at a longitude/latitude. Misses are ignored and
    /// produce no frame.
    pub fn click_at(&mut self, lng: f64, lat: f64) -> Option<RenderFrame> {
        let code = self
            .dataset()?
            .locator
            .locate(lng, lat)
            .map(|feature| feature.code.clone())?;
        self.dispatch(&UiEvent::FeatureClicked { code })
    }

    /// Code of the district under a pixel of the rendered map.
    #[must_use]
    pub fn code_at_pixel(&self, px: f64, py: f64) -> Option<&str> {
        self.dataset()?
            .locate_pixel(px, py, self.settings.map_size)
            .map(|feature| feature.code.as_str())
    }

    /// Tooltip for hovering the shape with `code` under the current
    /// selection.
    #[must_use]
    pub fn hover(&self, code: &str) -> Option<Tooltip> {
        let session = self.session.as_ref()?;
        let shape = session.dataset.districts().find_by_code(code)?;
        let state = &session.state;
        Some(Tooltip {
            name: shape.feature.name.clone(),
            metric: state.metric,
            value: session
                .dataset
                .index()
                .value(state.year, code, state.metric),
        })
    }
}

fn run_pass(
    phase: &mut Phase,
    session: &Session,
    settings: &ControllerSettings,
    scroll_to_chart: bool,
) -> RenderFrame {
    *phase = Phase::Rendering;
    let frame = render_pass::render(&session.state, &session.dataset, settings, scroll_to_chart);
    *phase = Phase::Loaded;
    frame
}

#[cfg(test)]
mod tests {
    use ma_equity_district_models::view::Fill;
    use ma_equity_district_models::{STATEWIDE_AVERAGE_NAME, format_value};
    use ma_equity_enrollment::read_records;

    use super::*;

    // Three unit squares side by side: A at lng 0..1, B at 1..2, C at 2..3.
    const DISTRICTS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "ORG8CODE": "A", "DISTRICT_N": "Alpha" },
                "geometry": { "type": "Polygon", "coordinates": [[[0,40],[1,40],[1,41],[0,41],[0,40]]] }
            },
            {
                "type": "Feature",
                "properties": { "ORG8CODE": "B", "DISTRICT_N": "Beta" },
                "geometry": { "type": "Polygon", "coordinates": [[[1,40],[2,40],[2,41],[1,41],[1,40]]] }
            },
            {
                "type": "Feature",
                "properties": { "ORG8CODE": "C", "DISTRICT_N": "Gamma" },
                "geometry": { "type": "Polygon", "coordinates": [[[2,40],[3,40],[3,41],[2,41],[2,40]]] }
            }
        ]
    }"#;

    const CSV: &str = "\
schoolyear,districtid,enrolled,aa_num,as_num,lat_num,whi_num,na_num,pi_num,mult_num
2021-2022,A,100,10,5,20,60,1,0,4
2021-2022,B,200,30,15,40,100,2,1,12
2021-2022,C,,,,,,,,
2022-2023,A,110,12,6,22,62,1,0,9
2022-2023,B,210,31,,41,103,2,1,32
2023-2024,A,120,14,7,24,66,1,0,8
";

    const YEARS: YearRange = YearRange {
        first: 2019,
        last: 2023,
    };

    fn settings() -> ControllerSettings {
        ControllerSettings::from(&VizConfig::default())
    }

    fn loaded() -> LoadedData {
        LoadedData {
            districts: DistrictCollection::parse(DISTRICTS).unwrap(),
            records: read_records(CSV.as_bytes()).unwrap(),
        }
    }

    fn controller() -> LinkedViewController {
        let mut controller = LinkedViewController::new(settings());
        controller.load(loaded());
        controller
    }

    fn fill(frame: &RenderFrame, code: &str) -> Fill {
        frame.map.as_ref().unwrap().shape(code).unwrap().fill
    }

    fn at_2021(controller: &mut LinkedViewController) -> RenderFrame {
        controller.dispatch(&UiEvent::YearInput(2021)).unwrap()
    }

    #[test]
    fn starts_idle_and_ignores_events() {
        let mut controller = LinkedViewController::new(settings());
        assert_eq!(controller.phase(), Phase::Idle);
        assert!(controller.state().is_none());
        assert!(controller.dispatch(&UiEvent::YearInput(2021)).is_none());
        assert!(controller.hover("A").is_none());
    }

    #[test]
    fn initial_render_uses_latest_year_and_statewide_chart() {
        let mut controller = LinkedViewController::new(settings());
        let frame = controller.load(loaded());

        assert_eq!(controller.phase(), Phase::Loaded);
        assert_eq!(frame.selection.year, 2023);
        assert_eq!(frame.selection.metric, Metric::All);
        assert_eq!(frame.selection.district, DistrictSelection::All);
        assert!(!frame.scroll_to_chart);

        let chart = frame.chart.unwrap();
        assert_eq!(chart.subject, STATEWIDE_AVERAGE_NAME);
        let years: Vec<u16> = chart.points.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2019, 2020, 2021, 2022, 2023]);
    }

    #[test]
    fn configured_initial_district_is_pinned() {
        let mut settings = settings();
        settings.initial_district = Some("Beta".to_string());
        let mut controller = LinkedViewController::new(settings);
        let frame = controller.load(loaded());

        assert_eq!(frame.selection.district.pinned(), Some("Beta"));
        assert_eq!(fill(&frame, "B"), Fill::Highlighted);
        assert_eq!(frame.chart.unwrap().subject, "Beta");
    }

    #[test]
    fn two_districts_and_a_gap_scenario() {
        let mut controller = controller();
        let frame = at_2021(&mut controller);

        let legend = frame.legend.as_ref().unwrap();
        assert!((legend.domain.p5 - 105.0).abs() < 1e-9);
        assert!((legend.domain.p95 - 195.0).abs() < 1e-9);

        assert_eq!(fill(&frame, "C"), Fill::NoData);
        let (Fill::Scaled(a), Fill::Scaled(b)) = (fill(&frame, "A"), fill(&frame, "B")) else {
            panic!("A and B should be scaled");
        };
        let palette = &settings().palette;
        assert_eq!(a, palette[0]);
        assert_eq!(b, palette[palette.len() - 1]);

        let chart = frame.chart.unwrap();
        assert_eq!(chart.value_for(2021), Some(150.0));
        assert_eq!(chart.value_for(2019), None);
    }

    #[test]
    fn all_metric_follows_the_enrolled_column() {
        let controller = controller();
        let index = controller.dataset().unwrap().index();
        // A's categories sum to 112 in 2022 while enrolled says 110.
        assert_eq!(index.value(2022, "A", Metric::All), Some(110.0));
        assert_eq!(index.value(2023, "A", Metric::All), Some(120.0));
        let gaps = index.discrepancies();
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].district_code, "A");
        assert!((gaps[0].category_sum - 112.0).abs() < 1e-9);
    }

    #[test]
    fn unpinning_resets_every_fill_to_the_scale() {
        let mut controller = controller();
        at_2021(&mut controller);

        let pinned = controller
            .dispatch(&UiEvent::DistrictChanged("Alpha".to_string()))
            .unwrap();
        assert_eq!(fill(&pinned, "A"), Fill::Highlighted);
        assert_eq!(fill(&pinned, "B"), Fill::Unselected);
        assert_eq!(fill(&pinned, "C"), Fill::Unselected);
        assert!(pinned.legend.is_some());

        let all = controller
            .dispatch(&UiEvent::DistrictChanged("all".to_string()))
            .unwrap();
        for shape in &all.map.unwrap().shapes {
            assert!(
                matches!(shape.fill, Fill::Scaled(_) | Fill::NoData),
                "{} kept {:?}",
                shape.feature.code,
                shape.fill
            );
        }
    }

    #[test]
    fn metric_switch_recomputes_the_pinned_chart() {
        let mut controller = controller();
        controller.dispatch(&UiEvent::DistrictChanged("Beta".to_string()));
        controller.dispatch(&UiEvent::MetricChanged(Metric::AaNum));
        let frame = controller
            .dispatch(&UiEvent::MetricChanged(Metric::AsNum))
            .unwrap();

        let chart = frame.chart.unwrap();
        assert_eq!(chart.title(), "Asian in Beta");
        assert_eq!(chart.value_for(2021), Some(15.0));
        assert_eq!(chart.value_for(2022), None);
        assert_eq!(chart.value_for(2023), None);
        assert_eq!(chart.defined_points().count(), 1);
    }

    #[test]
    fn statewide_average_uses_only_reporting_districts() {
        let mut controller = controller();
        let frame = controller
            .dispatch(&UiEvent::MetricChanged(Metric::AsNum))
            .unwrap();
        let chart = frame.chart.unwrap();
        // 2021: A=5, B=15, C missing -> 10. 2022: only A=6 reports.
        assert_eq!(chart.value_for(2021), Some(10.0));
        assert_eq!(chart.value_for(2022), Some(6.0));
        assert_eq!(chart.value_for(2020), None);
    }

    #[test]
    fn single_value_year_has_no_choropleth() {
        let mut controller = controller();
        let frame = controller.dispatch(&UiEvent::YearInput(2023)).unwrap();
        assert!(frame.map.is_none());
        assert!(frame.legend.is_none());
        assert!(frame.chart.is_some());
        assert_eq!(controller.phase(), Phase::Loaded);

        let pinned = controller
            .dispatch(&UiEvent::DistrictChanged("Alpha".to_string()))
            .unwrap();
        assert_eq!(fill(&pinned, "A"), Fill::Highlighted);
    }

    #[test]
    fn click_pins_and_scrolls() {
        let mut controller = controller();
        let frame = controller
            .dispatch(&UiEvent::FeatureClicked {
                code: "B".to_string(),
            })
            .unwrap();
        assert!(frame.scroll_to_chart);
        assert_eq!(frame.selection.district.pinned(), Some("Beta"));
        assert_eq!(frame.chart.unwrap().subject, "Beta");

        let next = controller.dispatch(&UiEvent::YearInput(2021)).unwrap();
        assert!(!next.scroll_to_chart);
    }

    #[test]
    fn click_at_locates_the_shape() {
        let mut controller = controller();
        let frame = controller.click_at(2.5, 40.5).unwrap();
        assert_eq!(frame.selection.district.pinned(), Some("Gamma"));
        assert!(controller.click_at(10.0, 10.0).is_none());
    }

    #[test]
    fn pixel_lookup_matches_the_rendered_map() {
        let controller = controller();
        let districts = controller.dataset().unwrap().districts();
        let (width, height) = settings().map_size;
        let projection =
            MercatorProjection::fit_size(f64::from(width), f64::from(height), districts.bounds().unwrap());

        let (px, py) = projection.project(geo::Coord { x: 1.5, y: 40.5 });
        assert_eq!(controller.code_at_pixel(px, py), Some("B"));
        assert!(controller.code_at_pixel(-10.0, -10.0).is_none());
        assert!(LinkedViewController::new(settings()).code_at_pixel(px, py).is_none());
    }

    #[test]
    fn unknown_district_gives_an_empty_chart() {
        let mut controller = controller();
        let frame = controller
            .dispatch(&UiEvent::DistrictChanged("Atlantis".to_string()))
            .unwrap();
        assert!(
            frame
                .map
                .unwrap()
                .shapes
                .iter()
                .all(|s| s.fill == Fill::Unselected)
        );
        let chart = frame.chart.unwrap();
        assert_eq!(chart.points.len(), 5);
        assert_eq!(chart.defined_points().count(), 0);
    }

    #[test]
    fn year_is_clamped_to_the_dataset() {
        let mut controller = controller();
        let frame = controller.dispatch(&UiEvent::YearInput(2019)).unwrap();
        assert_eq!(frame.selection.year, 2021);
        let frame = controller.dispatch(&UiEvent::YearInput(2050)).unwrap();
        assert_eq!(frame.selection.year, 2023);
    }

    #[test]
    fn hover_reports_the_current_value() {
        let mut controller = controller();
        at_2021(&mut controller);
        let tooltip = controller.hover("B").unwrap();
        assert_eq!(tooltip.name, "Beta");
        assert_eq!(tooltip.value, Some(200.0));
        assert_eq!(tooltip.to_string(), "Beta\nAll Students: 200");

        let missing = controller.hover("C").unwrap();
        assert_eq!(missing.to_string(), "Gamma\nAll Students: No data");
        assert!(controller.hover("Z").is_none());
        assert_eq!(format_value(tooltip.value.unwrap()), "200");
    }

    #[test]
    fn dataset_years_fall_back_when_disjoint() {
        let data = LoadedData {
            districts: DistrictCollection::parse(DISTRICTS).unwrap(),
            records: read_records(
                "schoolyear,districtid,enrolled,aa_num,as_num,lat_num,whi_num,na_num,pi_num,mult_num\n\
                 2010-2011,A,1,,,,,,,\n"
                    .as_bytes(),
            )
            .unwrap(),
        };
        let dataset = Dataset::new(data, YEARS);
        assert_eq!(dataset.years(), YearRange {
            first: 2010,
            last: 2010
        });
    }
}
