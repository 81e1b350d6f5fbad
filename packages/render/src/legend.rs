//! Horizontal color ramp for the current color domain.

use ma_equity_config::LegendConfig;
use ma_equity_district_models::format_value;
use ma_equity_district_models::view::LegendView;

const LABEL_HEIGHT: u32 = 18;

/// Renders the ramp with the clipped domain bounds under its two ends.
/// Without a domain the canvas stays empty.
#[must_use]
pub fn legend_svg(view: Option<&LegendView>, config: &LegendConfig) -> String {
    let (width, ramp_height) = (config.width, config.height);
    let height = ramp_height + LABEL_HEIGHT;
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" id="legend-svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="sans-serif" font-size="11">"#
    );

    if let Some(view) = view {
        svg.push_str(r#"<defs><linearGradient id="legend-ramp" x1="0" y1="0" x2="1" y2="0">"#);
        for stop in &view.stops {
            svg.push_str(&format!(
                r#"<stop offset="{:.2}%" stop-color="{}"/>"#,
                stop.offset * 100.0,
                stop.color
            ));
        }
        svg.push_str("</linearGradient></defs>");
        svg.push_str(&format!(
            r##"<rect x="0" y="0" width="{width}" height="{ramp_height}" fill="url(#legend-ramp)" stroke="#000"/>"##
        ));
        let label_y = height - 4;
        svg.push_str(&format!(
            r#"<text x="0" y="{label_y}" text-anchor="start">{}</text><text x="{width}" y="{label_y}" text-anchor="end">{}</text>"#,
            format_value(view.domain.p5.round()),
            format_value(view.domain.p95.round())
        ));
    }

    svg.push_str("</svg>");
    svg
}
