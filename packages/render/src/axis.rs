//! "Nice" value-axis ticks for the line chart.

/// Default number of ticks aimed for on the value axis.
pub const TARGET_TICKS: usize = 10;

/// Round tick step close to `span / target`: 1, 2, 5 or 10 times a power
/// of ten.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn nice_step(span: f64, target: usize) -> f64 {
    if !span.is_finite() || span <= 0.0 || target == 0 {
        return 1.0;
    }
    let rough = span / target as f64;
    let mag = 10f64.powf(rough.log10().floor());
    let normalized = rough / mag;
    let factor = if normalized < 1.5 {
        1.0
    } else if normalized < 3.5 {
        2.0
    } else if normalized < 7.5 {
        5.0
    } else {
        10.0
    };
    mag * factor
}

/// Value axis from zero up to `max` extended to the next whole step.
///
/// Returns the axis top and the tick values from zero to that top. A
/// non-positive or missing maximum gives the unit axis `[0, 1]`.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn zero_based_ticks(max: Option<f64>, target: usize) -> (f64, Vec<f64>) {
    let max = match max {
        Some(max) if max.is_finite() && max > 0.0 => max,
        _ => 1.0,
    };
    let step = nice_step(max, target);
    let steps = (max / step - 1e-9).ceil().max(1.0) as usize;
    let top = step * steps as f64;
    let ticks = (0..=steps).map(|i| step * i as f64).collect();
    (top, ticks)
}
