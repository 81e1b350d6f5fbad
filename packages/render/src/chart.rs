//! Line chart of one metric over the chart years.

use ma_equity_config::ChartConfig;
use ma_equity_district_models::view::LineChartView;
use ma_equity_district_models::{Rgb, format_value};

use crate::axis::{TARGET_TICKS, zero_based_ticks};
use crate::{escape, school_year_label};

const LINE_WIDTH: f64 = 2.5;
const POINT_RADIUS: f64 = 4.0;
const AXIS_COLOR: &str = "#333";

/// Renders the chart, or an empty canvas of the same size when there is
/// nothing to plot.
///
/// Every year of the series gets an x-axis tick. Years without a value are
/// left out of the line and get no marker.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn chart_svg(view: Option<&LineChartView>, config: &ChartConfig, line: Rgb) -> String {
    let width = f64::from(config.width);
    let height = f64::from(config.height);
    let inner_w = f64::from(config.width.saturating_sub(config.margin_left + config.margin_right));
    let inner_h = f64::from(
        config
            .height
            .saturating_sub(config.margin_top + config.margin_bottom),
    );

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" id="line-chart-svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="sans-serif">"#
    );

    let Some(view) = view.filter(|v| !v.points.is_empty()) else {
        svg.push_str("</svg>");
        return svg;
    };

    let first = view.points.iter().map(|p| p.year).min().unwrap_or_default();
    let last = view.points.iter().map(|p| p.year).max().unwrap_or_default();
    let x = |year: u16| {
        if first == last {
            inner_w / 2.0
        } else {
            f64::from(year - first) / f64::from(last - first) * inner_w
        }
    };

    let max = view.defined_points().map(|(_, v)| v).reduce(f64::max);
    let (top, ticks) = zero_based_ticks(max, TARGET_TICKS);
    let y = |value: f64| inner_h - value / top * inner_h;

    svg.push_str(&format!(
        r#"<g transform="translate({},{})">"#,
        config.margin_left,
        config.margin_top
    ));

    // Value axis.
    svg.push_str(&format!(
        r#"<g class="y-axis" font-size="10" text-anchor="end"><line x1="0" y1="0" x2="0" y2="{inner_h}" stroke="{AXIS_COLOR}"/>"#
    ));
    for tick in &ticks {
        let ty = round2(y(*tick));
        svg.push_str(&format!(
            r#"<line x1="-6" y1="{ty}" x2="0" y2="{ty}" stroke="{AXIS_COLOR}"/><text x="-9" y="{ty}" dy="0.32em">{}</text>"#,
            format_value(*tick)
        ));
    }
    svg.push_str("</g>");

    // Year axis.
    svg.push_str(&format!(
        r#"<g class="x-axis" font-size="10" text-anchor="middle" transform="translate(0,{inner_h})"><line x1="0" y1="0" x2="{inner_w}" y2="0" stroke="{AXIS_COLOR}"/>"#
    ));
    for point in &view.points {
        let tx = round2(x(point.year));
        svg.push_str(&format!(
            r#"<line x1="{tx}" y1="0" x2="{tx}" y2="6" stroke="{AXIS_COLOR}"/><text x="{tx}" y="9" dy="0.71em">{}</text>"#,
            school_year_label(point.year)
        ));
    }
    svg.push_str("</g>");

    let defined: Vec<(f64, f64)> = view
        .defined_points()
        .map(|(year, value)| (round2(x(year)), round2(y(value))))
        .collect();

    if !defined.is_empty() {
        let d: Vec<String> = defined
            .iter()
            .enumerate()
            .map(|(i, (px, py))| format!("{}{px},{py}", if i == 0 { 'M' } else { 'L' }))
            .collect();
        svg.push_str(&format!(
            r#"<path class="series" d="{}" fill="none" stroke="{line}" stroke-width="{LINE_WIDTH}"/>"#,
            d.concat()
        ));
    }
    for (px, py) in &defined {
        svg.push_str(&format!(r#"<circle cx="{px}" cy="{py}" r="{POINT_RADIUS}" fill="{line}"/>"#));
    }

    svg.push_str(&format!(
        r#"<text class="title" x="{}" y="-10" text-anchor="middle" font-size="16px">{}</text>"#,
        round2(inner_w / 2.0),
        escape(&view.title())
    ));

    svg.push_str("</g></svg>");
    svg
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
