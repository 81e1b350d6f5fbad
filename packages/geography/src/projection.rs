//! Spherical Mercator projection fitted to a pixel canvas.

use std::f64::consts::FRAC_PI_2;
use std::f64::consts::FRAC_PI_4;

use geo::{Coord, Rect};

/// Mercator projection scaled and translated so that a bounding box fills
/// a `width × height` canvas, centred, with y growing downwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MercatorProjection {
    scale: f64,
    translate_x: f64,
    translate_y: f64,
}

impl MercatorProjection {
    /// Fits the projection so that `bounds` (degrees) fills the canvas while
    /// preserving aspect ratio.
    #[must_use]
    pub fn fit_size(width: f64, height: f64, bounds: Rect<f64>) -> Self {
        let (x0, y_top) = raw(bounds.min().x, bounds.max().y);
        let (x1, y_bottom) = raw(bounds.max().x, bounds.min().y);

        let dx = x1 - x0;
        let dy = y_bottom - y_top;
        let scale = (width / dx).min(height / dy);
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };

        Self {
            scale,
            translate_x: scale.mul_add(-(x0 + x1), width) / 2.0,
            translate_y: scale.mul_add(-(y_top + y_bottom), height) / 2.0,
        }
    }

    /// Projects a longitude/latitude coordinate to canvas pixels.
    #[must_use]
    pub fn project(&self, coord: Coord<f64>) -> (f64, f64) {
        let (x, y) = raw(coord.x, coord.y);
        (
            self.scale.mul_add(x, self.translate_x),
            self.scale.mul_add(y, self.translate_y),
        )
    }

    /// Maps canvas pixels back to a longitude/latitude coordinate.
    #[must_use]
    pub fn invert(&self, px: f64, py: f64) -> Coord<f64> {
        let x = (px - self.translate_x) / self.scale;
        let y = (py - self.translate_y) / self.scale;
        let lat = 2.0f64.mul_add((-y).exp().atan(), -FRAC_PI_2);
        Coord {
            x: x.to_degrees(),
            y: lat.to_degrees(),
        }
    }
}

/// Unscaled Mercator with the y axis flipped for screen space.
fn raw(lon: f64, lat: f64) -> (f64, f64) {
    let lambda = lon.to_radians();
    let phi = lat.to_radians();
    (lambda, -(FRAC_PI_4 + phi / 2.0).tan().ln())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Rect<f64> {
        Rect::new(Coord { x: -73.5, y: 41.2 }, Coord { x: -69.9, y: 42.9 })
    }

    #[test]
    fn fitted_bounds_stay_inside_canvas() {
        let projection = MercatorProjection::fit_size(1000.0, 700.0, bounds());
        let (x0, y0) = projection.project(Coord { x: -73.5, y: 42.9 });
        let (x1, y1) = projection.project(Coord { x: -69.9, y: 41.2 });

        assert!(x0 >= -1e-9 && x1 <= 1000.0 + 1e-9);
        assert!(y0 >= -1e-9 && y1 <= 700.0 + 1e-9);
        assert!(x0 < x1, "west maps left of east");
        assert!(y0 < y1, "north maps above south");

        // One dimension is filled edge to edge.
        let filled_x = (x0.abs() < 1e-6) && ((x1 - 1000.0).abs() < 1e-6);
        let filled_y = (y0.abs() < 1e-6) && ((y1 - 700.0).abs() < 1e-6);
        assert!(filled_x || filled_y);
    }

    #[test]
    fn content_is_centred() {
        let projection = MercatorProjection::fit_size(1000.0, 700.0, bounds());
        let (x0, y0) = projection.project(Coord { x: -73.5, y: 42.9 });
        let (x1, y1) = projection.project(Coord { x: -69.9, y: 41.2 });
        assert!(((x0 + x1) / 2.0 - 500.0).abs() < 1e-6);
        assert!(((y0 + y1) / 2.0 - 350.0).abs() < 1e-6);
    }

    #[test]
    fn invert_round_trips() {
        let projection = MercatorProjection::fit_size(1000.0, 700.0, bounds());
        let original = Coord { x: -71.06, y: 42.36 };
        let (px, py) = projection.project(original);
        let back = projection.invert(px, py);
        assert!((back.x - original.x).abs() < 1e-9);
        assert!((back.y - original.y).abs() < 1e-9);
    }

    #[test]
    fn degenerate_bounds_fall_back_to_unit_scale() {
        let point = Coord { x: -71.0, y: 42.0 };
        let projection = MercatorProjection::fit_size(100.0, 100.0, Rect::new(point, point));
        let (x, y) = projection.project(point);
        assert!((x - 50.0).abs() < 1e-9);
        assert!((y - 50.0).abs() < 1e-9);
    }
}
