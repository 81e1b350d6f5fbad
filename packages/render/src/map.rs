//! Choropleth map of the district shapes.

use ma_equity_config::{ColorConfig, VizConfig};
use ma_equity_district_models::view::{Fill, MapView, Tooltip};
use ma_equity_district_models::{Rgb, SelectionState};
use ma_equity_geography::{DistrictCollection, MercatorProjection, path_data};

use crate::{escape, school_year_label};

/// Resolves a fill to its color.
#[must_use]
pub const fn fill_color(fill: Fill, colors: &ColorConfig) -> Rgb {
    match fill {
        Fill::Scaled(color) => color,
        Fill::NoData => colors.no_data,
        Fill::Highlighted => colors.highlight,
        Fill::Unselected => colors.unselected,
    }
}

/// Renders every styled shape, projected to fill the configured canvas.
///
/// Each shape carries its district code as `data-code` and its hover
/// tooltip as a `<title>`. When the frame has no map (too few values to
/// build a color scale) a centred placeholder message is drawn instead.
#[must_use]
pub fn map_svg(
    view: Option<&MapView>,
    districts: &DistrictCollection,
    selection: &SelectionState,
    config: &VizConfig,
) -> String {
    let (width, height) = (config.map.width, config.map.height);
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" id="ma-map" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="sans-serif">"#
    );

    let Some(view) = view else {
        svg.push_str(&format!(
            r##"<text x="{}" y="{}" text-anchor="middle" font-size="16" fill="#555">Not enough data to color the map for {} in {}</text></svg>"##,
            width / 2,
            height / 2,
            escape(selection.metric.label()),
            school_year_label(selection.year)
        ));
        return svg;
    };

    let Some(bounds) = districts.bounds() else {
        svg.push_str("</svg>");
        return svg;
    };
    let projection = MercatorProjection::fit_size(f64::from(width), f64::from(height), bounds);

    svg.push_str(&format!(
        r#"<style>path:hover{{stroke-width:{}}}</style><g stroke="{}" stroke-width="{}" fill-rule="evenodd">"#,
        config.map.hover_stroke_width,
        config.colors.stroke,
        config.map.stroke_width
    ));

    for (shape, style) in districts.shapes().iter().zip(&view.shapes) {
        if shape.feature.code != style.feature.code {
            log::warn!(
                "Shape order mismatch: {} styled as {}",
                shape.feature.code,
                style.feature.code
            );
            continue;
        }
        let tooltip = Tooltip {
            name: style.feature.name.clone(),
            metric: selection.metric,
            value: style.value,
        };
        svg.push_str(&format!(
            r#"<path d="{}" data-code="{}" fill="{}"><title>{}</title></path>"#,
            path_data(&projection, &shape.polygon),
            escape(&style.feature.code),
            fill_color(style.fill, &config.colors),
            escape(&tooltip.to_string())
        ));
    }

    svg.push_str("</g></svg>");
    svg
}

#[cfg(test)]
mod tests {
    use ma_equity_district_models::view::ShapeStyle;
    use ma_equity_district_models::{DistrictFeature, Metric};

    use super::*;

    const DISTRICTS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "ORG8CODE": "A", "DISTRICT_N": "Alpha & Sons" },
                "geometry": { "type": "Polygon", "coordinates": [[[0,40],[1,40],[1,41],[0,41],[0,40]]] }
            },
            {
                "type": "Feature",
                "properties": { "ORG8CODE": "B", "DISTRICT_N": "Beta" },
                "geometry": { "type": "Polygon", "coordinates": [[[1,40],[2,40],[2,41],[1,41],[1,40]]] }
            }
        ]
    }"#;

    fn districts() -> DistrictCollection {
        DistrictCollection::parse(DISTRICTS).unwrap()
    }

    fn style(code: &str, name: &str, value: Option<f64>, fill: Fill) -> ShapeStyle {
        ShapeStyle {
            feature: DistrictFeature {
                code: code.to_string(),
                name: name.to_string(),
            },
            value,
            fill,
        }
    }

    #[test]
    fn draws_each_shape_with_its_fill_and_tooltip() {
        let config = VizConfig::default();
        let view = MapView {
            shapes: vec![
                style("A", "Alpha & Sons", Some(12.0), Fill::Scaled(Rgb::new(1, 2, 3))),
                style("B", "Beta", None, Fill::NoData),
            ],
        };
        let svg = map_svg(
            Some(&view),
            &districts(),
            &SelectionState::new(2021, Metric::AaNum),
            &config,
        );

        assert_eq!(svg.matches("<path").count(), 2);
        assert!(svg.contains(r##"data-code="A" fill="#010203""##));
        assert!(svg.contains(r##"data-code="B" fill="#f0f0f0""##));
        assert!(svg.contains("<title>Alpha &amp; Sons\nBlack or African American: 12</title>"));
        assert!(svg.contains("<title>Beta\nBlack or African American: No data</title>"));
        assert!(svg.contains(r##"stroke="#555555" stroke-width="0.7""##));
        assert!(svg.contains("stroke-width:2"));
        assert!(svg.contains(r#"width="1000" height="700""#));
    }

    #[test]
    fn pinned_fills_use_highlight_colors() {
        let config = VizConfig::default();
        let view = MapView {
            shapes: vec![
                style("A", "Alpha & Sons", Some(1.0), Fill::Highlighted),
                style("B", "Beta", Some(2.0), Fill::Unselected),
            ],
        };
        let svg = map_svg(
            Some(&view),
            &districts(),
            &SelectionState::new(2021, Metric::All),
            &config,
        );
        assert!(svg.contains(r##"fill="#f7943e""##));
        assert!(svg.contains(r##"fill="#eeeeee""##));
    }

    #[test]
    fn missing_map_draws_a_placeholder() {
        let svg = map_svg(
            None,
            &districts(),
            &SelectionState::new(2022, Metric::PiNum),
            &VizConfig::default(),
        );
        assert!(!svg.contains("<path"));
        assert!(svg.contains("Not enough data"));
        assert!(svg.contains("Native Hawaiian or Pacific Islander in 2022\u{2013}2023"));
    }
}
