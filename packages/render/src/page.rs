//! The `index.html` page tying the views to their controls.

use ma_equity_config::YearRange;
use ma_equity_district_models::view::RenderFrame;
use ma_equity_district_models::{ALL_DISTRICTS, Metric};
use ma_equity_geography::DistrictCollection;

use crate::{escape, school_year_label};

/// Pre-rendered SVG documents to inline.
#[derive(Debug, Clone, Copy)]
pub struct Views<'a> {
    /// Map document.
    pub map: &'a str,
    /// Legend document.
    pub legend: &'a str,
    /// Chart document.
    pub chart: &'a str,
}

const STYLE: &str = "body{font-family:sans-serif;margin:20px;color:#222}\
#controls{display:flex;gap:24px;align-items:center;margin-bottom:12px}\
#legend{margin:8px 0 24px}\
#chart-section{margin-top:32px}";

/// Builds the page. Controls are pre-set to the frame's selection: the
/// year slider over `years`, the eight metrics, and `"all"` followed by
/// every district name in alphabetical order.
#[must_use]
pub fn index_html(
    frame: &RenderFrame,
    districts: &DistrictCollection,
    years: YearRange,
    views: &Views<'_>,
) -> String {
    let selection = &frame.selection;
    let mut html = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!(
        "<title>Massachusetts School District Enrollment</title>\n<style>{STYLE}</style>\n</head>\n<body>\n"
    ));

    html.push_str("<div id=\"controls\">\n");
    html.push_str(&format!(
        r#"<label for="yearRange">School year <span id="yearLabel">{}</span></label><input type="range" id="yearRange" min="{}" max="{}" step="1" value="{}">"#,
        school_year_label(selection.year),
        years.first,
        years.last,
        selection.year
    ));
    html.push('\n');

    html.push_str("<select id=\"demographicSelect\">");
    for metric in Metric::all() {
        html.push_str(&format!(
            r#"<option value="{metric}"{}>{}</option>"#,
            selected(*metric == selection.metric),
            escape(metric.label())
        ));
    }
    html.push_str("</select>\n");

    let pinned = selection.district.pinned();
    html.push_str(&format!(
        r#"<select id="districtSelect"><option value="{ALL_DISTRICTS}"{}>All Districts</option>"#,
        selected(pinned.is_none())
    ));
    for name in districts.sorted_names() {
        let name_text = escape(name);
        html.push_str(&format!(
            r#"<option value="{name_text}"{}>{name_text}</option>"#,
            selected(pinned == Some(name))
        ));
    }
    html.push_str("</select>\n</div>\n");

    html.push_str(&format!(
        "<div id=\"visualizations\">\n{}\n<div id=\"legend\">{}</div>\n</div>\n",
        views.map,
        views.legend
    ));
    html.push_str(&format!(
        "<section id=\"chart-section\">\n<div id=\"line-chart\">{}</div>\n</section>\n",
        views.chart
    ));

    if frame.scroll_to_chart {
        html.push_str(
            "<script>document.querySelector(\"#chart-section\").scrollIntoView({ behavior: \"smooth\" });</script>\n",
        );
    }

    html.push_str("</body>\n</html>\n");
    html
}

const fn selected(is_selected: bool) -> &'static str {
    if is_selected { " selected" } else { "" }
}
