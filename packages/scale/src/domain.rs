//! Percentile clipping of the visible value distribution.

use ma_equity_district_models::ColorDomain;

use crate::ScaleError;

/// Lower clipping percentile.
pub const LOWER_PERCENTILE: f64 = 0.05;

/// Upper clipping percentile.
pub const UPPER_PERCENTILE: f64 = 0.95;

/// Quantile of an ascending slice, interpolating linearly between the two
/// nearest order statistics at position `(n - 1) * p`.
///
/// Returns `None` for an empty slice. `p <= 0` yields the minimum and
/// `p >= 1` the maximum.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let (&first, &last) = (sorted.first()?, sorted.last()?);
    if p <= 0.0 || sorted.len() < 2 {
        return Some(first);
    }
    if p >= 1.0 {
        return Some(last);
    }

    let position = (sorted.len() - 1) as f64 * p;
    let lower = position.floor() as usize;
    let low = sorted[lower];
    let high = sorted[lower + 1];
    Some((high - low).mul_add(position - lower as f64, low))
}

/// Computes the 5th/95th percentile domain of the defined values.
///
/// Non-finite values are ignored.
///
/// # Errors
///
/// Returns [`ScaleError::InsufficientData`] when fewer than two finite
/// values remain.
pub fn color_domain(values: &[f64]) -> Result<ColorDomain, ScaleError> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.len() < 2 {
        return Err(ScaleError::InsufficientData {
            count: sorted.len(),
        });
    }
    sorted.sort_by(f64::total_cmp);

    let p5 = quantile_sorted(&sorted, LOWER_PERCENTILE).unwrap_or(sorted[0]);
    let p95 = quantile_sorted(&sorted, UPPER_PERCENTILE).unwrap_or(sorted[sorted.len() - 1]);

    log::debug!(
        "Color domain over {} values: p5={p5}, p95={p95}",
        sorted.len()
    );

    Ok(ColorDomain { p5, p95 })
}
