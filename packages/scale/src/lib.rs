#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Color scales for the district choropleth.
//!
//! The color domain is clipped to the 5th and 95th percentiles of the
//! visible values so that a few extreme districts do not wash out the rest
//! of the map. Values are mapped through a uniform RGB B-spline over the
//! configured palette.

pub mod domain;
pub mod interpolate;

use ma_equity_district_models::view::{LegendStop, LegendView};
use ma_equity_district_models::{ColorDomain, Rgb};
use thiserror::Error;

pub use domain::{color_domain, quantile_sorted};
pub use interpolate::rgb_basis;

/// Errors from color scale construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScaleError {
    /// Fewer than two defined values; no meaningful scale exists.
    #[error("Insufficient data for a color scale: {count} defined value(s)")]
    InsufficientData {
        /// Number of defined values that were available.
        count: usize,
    },

    /// The palette has fewer than two colors.
    #[error("Palette needs at least 2 colors, found {count}")]
    Palette {
        /// Number of colors supplied.
        count: usize,
    },
}

/// Maps values in a [`ColorDomain`] to palette colors.
#[derive(Debug, Clone, PartialEq)]
pub struct SequentialScale {
    domain: ColorDomain,
    palette: Vec<Rgb>,
    unknown: Rgb,
}

impl SequentialScale {
    /// Creates a scale over `domain`. Missing values map to `unknown`.
    ///
    /// # Errors
    ///
    /// Returns [`ScaleError::Palette`] if `palette` has fewer than two colors.
    pub fn new(domain: ColorDomain, palette: &[Rgb], unknown: Rgb) -> Result<Self, ScaleError> {
        if palette.len() < 2 {
            return Err(ScaleError::Palette {
                count: palette.len(),
            });
        }
        Ok(Self {
            domain,
            palette: palette.to_vec(),
            unknown,
        })
    }

    /// Builds the scale straight from the visible values.
    ///
    /// # Errors
    ///
    /// Returns [`ScaleError`] if fewer than two values are defined or the
    /// palette is too short.
    pub fn from_values(values: &[f64], palette: &[Rgb], unknown: Rgb) -> Result<Self, ScaleError> {
        Self::new(color_domain(values)?, palette, unknown)
    }

    /// The clipped domain.
    #[must_use]
    pub const fn domain(&self) -> ColorDomain {
        self.domain
    }

    /// Normalized position of `value` within the domain, clamped to
    /// `0.0..=1.0`. A flat domain puts every value in the middle.
    #[must_use]
    pub fn position(&self, value: f64) -> f64 {
        if self.domain.is_flat() {
            return 0.5;
        }
        ((value - self.domain.p5) / (self.domain.p95 - self.domain.p5)).clamp(0.0, 1.0)
    }

    /// Color for a value, or the unknown color when it is missing.
    #[must_use]
    pub fn color(&self, value: Option<f64>) -> Rgb {
        match value {
            Some(v) if v.is_finite() => rgb_basis(&self.palette, self.position(v)),
            _ => self.unknown,
        }
    }

    /// Samples `samples` evenly spaced stops across the domain for the
    /// legend ramp.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn legend(&self, samples: usize) -> LegendView {
        let samples = samples.max(2);
        let last = (samples - 1) as f64;
        let stops = (0..samples)
            .map(|i| {
                let offset = i as f64 / last;
                let value = (self.domain.p95 - self.domain.p5).mul_add(offset, self.domain.p5);
                LegendStop {
                    offset,
                    color: self.color(Some(value)),
                }
            })
            .collect();

        LegendView {
            domain: self.domain,
            stops,
        }
    }
}
