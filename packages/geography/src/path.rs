//! SVG path data for projected district boundaries.

use geo::{LineString, MultiPolygon};

use crate::projection::MercatorProjection;

/// Builds an SVG `d` attribute for a multipolygon: one closed subpath per
/// ring, exterior and holes alike. Holes need `fill-rule="evenodd"`.
#[must_use]
pub fn path_data(projection: &MercatorProjection, polygon: &MultiPolygon<f64>) -> String {
    let mut d = String::new();
    for poly in polygon {
        push_ring(&mut d, projection, poly.exterior());
        for interior in poly.interiors() {
            push_ring(&mut d, projection, interior);
        }
    }
    d
}

fn push_ring(d: &mut String, projection: &MercatorProjection, ring: &LineString<f64>) {
    let coords = &ring.0;
    // GeoJSON rings repeat the first position at the end; `Z` closes them.
    let open = match coords.as_slice() {
        [first, rest @ .., last] if first == last => &coords[..=rest.len()],
        all => all,
    };
    if open.len() < 3 {
        return;
    }

    for (i, coord) in open.iter().enumerate() {
        let (x, y) = projection.project(*coord);
        let command = if i == 0 { 'M' } else { 'L' };
        d.push_str(&format!("{command}{},{}", round2(x), round2(y)));
    }
    d.push('Z');
}

/// Rounds to two decimals and drops a trailing `.00`/`0`.
fn round2(value: f64) -> String {
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}
