#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! School district, demographic metric and selection types.
//!
//! These types are shared by the enrollment index, the geography layer,
//! the linked-view controller and the SVG renderer. Missing data is always
//! represented as `None`, never as zero.

pub mod color;
pub mod view;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString, IntoStaticStr};

pub use color::{InvalidColorError, Rgb};

/// Name shown for the statewide average series in the line chart.
pub const STATEWIDE_AVERAGE_NAME: &str = "All Districts (Average)";

/// Sentinel emitted by the district selector for "no district pinned".
pub const ALL_DISTRICTS: &str = "all";

/// One of the eight selectable demographic enrollment quantities.
///
/// Variants are declared in dropdown order. The serialized form is the
/// column key used by the enrollment CSV (`aa_num`, `lat_num`, ...), except
/// for [`Metric::All`] which reads the `enrolled` column.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Metric {
    /// Total enrollment
    All,
    /// Black or African American
    AaNum,
    /// Asian
    AsNum,
    /// Hispanic or Latino
    LatNum,
    /// White
    WhiNum,
    /// American Indian or Alaska Native
    NaNum,
    /// Native Hawaiian or Pacific Islander
    PiNum,
    /// Two or more races
    MultNum,
}

impl Metric {
    /// Returns all variants in dropdown order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::All,
            Self::AaNum,
            Self::AsNum,
            Self::LatNum,
            Self::WhiNum,
            Self::NaNum,
            Self::PiNum,
            Self::MultNum,
        ]
    }

    /// Returns the per-category metrics (everything except [`Metric::All`]).
    #[must_use]
    pub fn categories() -> &'static [Self] {
        &Self::all()[1..]
    }

    /// Human-readable label used in the dropdown, tooltips and chart titles.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Students",
            Self::AaNum => "Black or African American",
            Self::AsNum => "Asian",
            Self::LatNum => "Hispanic or Latino",
            Self::WhiNum => "White",
            Self::NaNum => "American Indian or Alaska Native",
            Self::PiNum => "Native Hawaiian or Pacific Islander",
            Self::MultNum => "Two or More Races",
        }
    }

    /// Name of the CSV column this metric is read from.
    ///
    /// [`Metric::All`] comes from the raw `enrolled` total rather than a
    /// sum of the category columns.
    #[must_use]
    pub fn source_column(self) -> &'static str {
        match self {
            Self::All => "enrolled",
            other => other.into(),
        }
    }
}

/// A school district as exposed by the polygon collection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictFeature {
    /// District code (`ORG8CODE`), joins the shape to enrollment rows.
    pub code: String,
    /// Display name (`DISTRICT_N`).
    pub name: String,
}

/// District selector value: every district, or a single pinned district
/// identified by its display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DistrictSelection {
    /// No district pinned; the map is colored by the metric scale.
    #[default]
    All,
    /// A single district pinned by display name.
    District(String),
}

impl DistrictSelection {
    /// Interprets a raw selector value, where [`ALL_DISTRICTS`] means
    /// [`DistrictSelection::All`].
    #[must_use]
    pub fn from_selector(value: &str) -> Self {
        let value = value.trim();
        if value == ALL_DISTRICTS {
            Self::All
        } else {
            Self::District(value.to_string())
        }
    }

    /// Returns the pinned district name, if any.
    #[must_use]
    pub fn pinned(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::District(name) => Some(name),
        }
    }

    /// Selector value as emitted by the district dropdown.
    #[must_use]
    pub fn selector_value(&self) -> &str {
        self.pinned().unwrap_or(ALL_DISTRICTS)
    }
}

/// The user's current selection across the linked views.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    /// Selected year (first calendar year of the school year).
    pub year: u16,
    /// Selected demographic metric.
    pub metric: Metric,
    /// Selected district, or all districts.
    pub district: DistrictSelection,
}

impl SelectionState {
    /// Creates a selection showing every district for `year` and `metric`.
    #[must_use]
    pub const fn new(year: u16, metric: Metric) -> Self {
        Self {
            year,
            metric,
            district: DistrictSelection::All,
        }
    }
}

/// Percentile-clipped bounds of the visible value distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorDomain {
    /// 5th percentile.
    pub p5: f64,
    /// 95th percentile.
    pub p95: f64,
}

impl ColorDomain {
    /// Whether the domain collapses to a single value.
    #[must_use]
    pub fn is_flat(&self) -> bool {
        (self.p95 - self.p5).abs() < f64::EPSILON
    }
}

/// Formats a count for display, dropping the fractional part when it is
/// zero (`1234` rather than `1234.0`).
#[must_use]
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        let text = format!("{value:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
