#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Configuration for the equity map toolchain.
//!
//! The default configuration is embedded at compile time from
//! `default.toml`. A different file can be supplied explicitly or through
//! the `MA_EQUITY_CONFIG` environment variable.

use std::path::{Path, PathBuf};

use ma_equity_district_models::Rgb;
use serde::Deserialize;
use thiserror::Error;

/// Environment variable naming a configuration file to load.
pub const CONFIG_ENV_VAR: &str = "MA_EQUITY_CONFIG";

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../default.toml");

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the configuration file failed.
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`VizConfig`].
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The configuration parsed but is inconsistent.
    #[error("Invalid config: {message}")]
    Invalid {
        /// Description of what went wrong.
        message: String,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VizConfig {
    /// Input data locations.
    pub data: DataConfig,
    /// Year range offered by the year control and plotted on the chart.
    pub years: YearRange,
    /// Map dimensions and strokes.
    pub map: MapConfig,
    /// Line chart dimensions.
    pub chart: ChartConfig,
    /// Legend dimensions.
    pub legend: LegendConfig,
    /// Palette and fixed fills.
    pub colors: ColorConfig,
    /// District pinned on first render. Unset means all districts.
    #[serde(default)]
    pub initial_district: Option<String>,
}

/// Input data locations. Each is a file path or an `http(s)://` URL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DataConfig {
    /// District polygon `GeoJSON` `FeatureCollection`.
    pub districts: String,
    /// Enrollment-by-demographic CSV.
    pub enrollment: String,
}

/// Inclusive range of school years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct YearRange {
    /// First year (e.g. 2019 for 2019–2020).
    pub first: u16,
    /// Last year, inclusive.
    pub last: u16,
}

impl YearRange {
    /// Iterates the years in ascending order.
    pub fn iter(self) -> impl Iterator<Item = u16> {
        self.first..=self.last
    }

    /// Whether `year` lies inside the range.
    #[must_use]
    pub const fn contains(self, year: u16) -> bool {
        year >= self.first && year <= self.last
    }

    /// Clamps `year` into the range.
    #[must_use]
    pub fn clamp(self, year: u16) -> u16 {
        year.clamp(self.first, self.last)
    }
}

/// Map canvas settings.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct MapConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Outline width for district shapes.
    pub stroke_width: f64,
    /// Outline width for the hovered shape.
    pub hover_stroke_width: f64,
}

/// Line chart settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[allow(clippy::struct_field_names)]
pub struct ChartConfig {
    /// Outer width in pixels.
    pub width: u32,
    /// Outer height in pixels.
    pub height: u32,
    /// Top margin.
    pub margin_top: u32,
    /// Right margin.
    pub margin_right: u32,
    /// Bottom margin.
    pub margin_bottom: u32,
    /// Left margin.
    pub margin_left: u32,
}

/// Legend settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LegendConfig {
    /// Ramp width in pixels.
    pub width: u32,
    /// Ramp height in pixels.
    pub height: u32,
    /// Number of color stops sampled along the ramp.
    pub samples: usize,
}

/// Palette and fixed fills.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColorConfig {
    /// Sequential palette, low to high.
    pub palette: Vec<Rgb>,
    /// Fill for shapes without data.
    pub no_data: Rgb,
    /// Fill for the pinned district.
    pub highlight: Rgb,
    /// Fill for districts other than the pinned one.
    pub unselected: Rgb,
    /// Shape outline color.
    pub stroke: Rgb,
    /// Line chart stroke color.
    pub line: Rgb,
}

impl Default for VizConfig {
    /// The embedded default configuration.
    ///
    /// # Panics
    ///
    /// Panics if the embedded `default.toml` fails to parse or validate.
    fn default() -> Self {
        Self::parse(DEFAULT_CONFIG)
            .unwrap_or_else(|e| panic!("Failed to parse embedded default config: {e}"))
    }
}

impl VizConfig {
    /// Parses and validates a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text is not valid TOML or fails
    /// validation.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::de::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from `path`, else from the file named by
    /// [`CONFIG_ENV_VAR`], else the embedded default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the chosen file cannot be read, parsed or
    /// validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

        let Some(path) = path else {
            log::debug!("Using embedded default config");
            return Self::parse(DEFAULT_CONFIG);
        };

        log::info!("Loading config from {}", path.display());
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Self::parse(&text)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: String| Err(ConfigError::Invalid { message });

        if self.years.first > self.years.last {
            return invalid(format!(
                "years.first ({}) is after years.last ({})",
                self.years.first, self.years.last
            ));
        }
        if self.colors.palette.len() < 2 {
            return invalid(format!(
                "colors.palette needs at least 2 colors, found {}",
                self.colors.palette.len()
            ));
        }
        if self.legend.samples < 2 {
            return invalid(format!(
                "legend.samples must be at least 2, found {}",
                self.legend.samples
            ));
        }
        if self.map.width == 0 || self.map.height == 0 {
            return invalid("map dimensions must be non-zero".to_string());
        }
        if self.chart.width <= self.chart.margin_left + self.chart.margin_right
            || self.chart.height <= self.chart.margin_top + self.chart.margin_bottom
        {
            return invalid("chart margins leave no plot area".to_string());
        }
        if self.data.districts.trim().is_empty() || self.data.enrollment.trim().is_empty() {
            return invalid("data paths must not be empty".to_string());
        }

        Ok(())
    }
}
