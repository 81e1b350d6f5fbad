#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Static SVG and HTML output for equity map render frames.
//!
//! A [`RenderFrame`] is turned into four standalone documents (the
//! choropleth map, the legend ramp, the line chart and an `index.html` page
//! that inlines all three next to controls reflecting the selection), plus
//! the frame itself as JSON.

pub mod axis;
pub mod chart;
pub mod error_panel;
pub mod legend;
pub mod map;
pub mod page;

use std::path::{Path, PathBuf};

use ma_equity_config::{VizConfig, YearRange};
use ma_equity_district_models::view::RenderFrame;
use ma_equity_geography::DistrictCollection;
use thiserror::Error;

/// Errors that can occur while writing rendered output.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Writing an output file failed.
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        /// File being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The frame could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Every output document of one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// Full page with controls and the three inlined views.
    pub index_html: String,
    /// Choropleth map, or the "not enough data" placeholder.
    pub map_svg: String,
    /// Legend ramp.
    pub legend_svg: String,
    /// Line chart.
    pub chart_svg: String,
    /// The render frame as pretty-printed JSON.
    pub frame_json: String,
}

/// Output file names, in write order. `index.html` comes last.
pub const FILE_NAMES: [&str; 5] = ["map.svg", "legend.svg", "chart.svg", "frame.json", "index.html"];

impl RenderedPage {
    /// File names and contents, in write order.
    #[must_use]
    pub fn files(&self) -> [(&'static str, &str); 5] {
        let [map, legend, chart, frame, index] = FILE_NAMES;
        [
            (map, self.map_svg.as_str()),
            (legend, self.legend_svg.as_str()),
            (chart, self.chart_svg.as_str()),
            (frame, self.frame_json.as_str()),
            (index, self.index_html.as_str()),
        ]
    }
}

/// Renders every view of `frame`.
///
/// `years` is the range offered by the year control.
///
/// # Errors
///
/// Returns [`RenderError::Json`] if the frame cannot be serialized.
pub fn render_page(
    frame: &RenderFrame,
    districts: &DistrictCollection,
    years: YearRange,
    config: &VizConfig,
) -> Result<RenderedPage, RenderError> {
    let map_svg = map::map_svg(frame.map.as_ref(), districts, &frame.selection, config);
    let legend_svg = legend::legend_svg(frame.legend.as_ref(), &config.legend);
    let chart_svg = chart::chart_svg(frame.chart.as_ref(), &config.chart, config.colors.line);
    let index_html = page::index_html(
        frame,
        districts,
        years,
        &page::Views {
            map: &map_svg,
            legend: &legend_svg,
            chart: &chart_svg,
        },
    );

    Ok(RenderedPage {
        index_html,
        map_svg,
        legend_svg,
        chart_svg,
        frame_json: serde_json::to_string_pretty(frame)?,
    })
}

/// Writes every file of `page` into `dir`, creating it if needed.
///
/// Each file is written to a `.tmp` sibling first and then renamed so an
/// interrupted run never leaves a half-written page behind.
///
/// # Errors
///
/// Returns [`RenderError::Io`] if the directory or a file cannot be written.
pub fn write_page(dir: &Path, page: &RenderedPage) -> Result<(), RenderError> {
    create_dir(dir)?;
    for (name, contents) in page.files() {
        write_atomic(&dir.join(name), contents)?;
    }
    log::info!("Wrote page to {}", dir.display());
    Ok(())
}

/// Writes only `index.html` holding the load-failure panel and removes the
/// views and frame left by an earlier render into `dir`.
///
/// # Errors
///
/// Returns [`RenderError::Io`] if the directory or file cannot be written,
/// or a stale view cannot be removed.
pub fn write_error_page(dir: &Path, message: &str, locations: &[String]) -> Result<(), RenderError> {
    create_dir(dir)?;
    for name in FILE_NAMES.iter().filter(|name| **name != "index.html") {
        remove_stale(&dir.join(name))?;
    }
    let path = dir.join("index.html");
    write_atomic(&path, &error_panel::error_page(message, locations))?;
    log::info!("Wrote error page to {}", path.display());
    Ok(())
}

fn create_dir(dir: &Path) -> Result<(), RenderError> {
    std::fs::create_dir_all(dir).map_err(|source| RenderError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

fn remove_stale(path: &Path) -> Result<(), RenderError> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            log::debug!("Removed stale {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(RenderError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn write_atomic(path: &Path, contents: &str) -> Result<(), RenderError> {
    let tmp = path.with_extension("tmp");
    let io_error = |source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    };
    std::fs::write(&tmp, contents).map_err(io_error)?;
    std::fs::rename(&tmp, path).map_err(io_error)?;
    log::debug!("Wrote {} ({} bytes)", path.display(), contents.len());
    Ok(())
}

/// Escapes text for use in XML/HTML content and attribute values.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Label for a school year starting in `year`, e.g. `2021–2022`.
#[must_use]
pub fn school_year_label(year: u16) -> String {
    format!("{year}\u{2013}{}", year.saturating_add(1))
}
