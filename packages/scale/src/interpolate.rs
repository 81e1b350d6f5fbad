//! Uniform cubic B-spline interpolation through RGB palettes.

use ma_equity_district_models::Rgb;

/// Interpolates `palette` at `t` in `0.0..=1.0` with a uniform cubic
/// B-spline per channel. The curve starts exactly at the first color and
/// ends exactly at the last; interior colors act as control points.
///
/// An empty palette yields black and a single color is returned as is.
#[must_use]
pub fn rgb_basis(palette: &[Rgb], t: f64) -> Rgb {
    match palette {
        [] => Rgb::new(0, 0, 0),
        [only] => *only,
        _ => {
            let channels: Vec<[f64; 3]> = palette.iter().map(|c| c.channels()).collect();
            let channel = |k: usize| {
                let values: Vec<f64> = channels.iter().map(|c| c[k]).collect();
                basis_spline(&values, t)
            };
            Rgb::from_channels(channel(0), channel(1), channel(2))
        }
    }
}

/// Evaluates the open uniform B-spline through `values` at `t`, with
/// phantom end points reflected so the curve passes through both ends.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn basis_spline(values: &[f64], t: f64) -> f64 {
    let n = values.len() - 1;
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let i = if t >= 1.0 {
        n - 1
    } else {
        ((t * n as f64).floor() as usize).min(n - 1)
    };

    let v1 = values[i];
    let v2 = values[i + 1];
    let v0 = if i > 0 {
        values[i - 1]
    } else {
        2.0f64.mul_add(v1, -v2)
    };
    let v3 = if i < n - 1 {
        values[i + 2]
    } else {
        2.0f64.mul_add(v2, -v1)
    };

    basis((t - i as f64 / n as f64) * n as f64, v0, v1, v2, v3)
}

#[allow(clippy::suboptimal_flops)]
fn basis(t1: f64, v0: f64, v1: f64, v2: f64, v3: f64) -> f64 {
    let t2 = t1 * t1;
    let t3 = t2 * t1;
    ((1.0 - 3.0 * t1 + 3.0 * t2 - t3) * v0
        + (4.0 - 6.0 * t2 + 3.0 * t3) * v1
        + (1.0 + 3.0 * t1 + 3.0 * t2 - 3.0 * t3) * v2
        + t3 * v3)
        / 6.0
}
