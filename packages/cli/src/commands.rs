//! Subcommand implementations.

use std::path::Path;

use ma_equity_config::VizConfig;
use ma_equity_controller::{ControllerSettings, LinkedViewController, UiEvent};
use ma_equity_district_models::format_value;
use ma_equity_district_models::view::RenderFrame;
use ma_equity_enrollment::EnrollmentIndex;
use ma_equity_loader::{DataSources, LoadedData};

/// Feeds loaded data to a fresh controller and replays `events`, returning
/// the controller and the last frame.
fn replay(
    config: &VizConfig,
    data: LoadedData,
    events: &[UiEvent],
) -> (LinkedViewController, RenderFrame) {
    let mut controller = LinkedViewController::new(ControllerSettings::from(config));
    let mut frame = controller.load(data);
    for event in events {
        if let Some(next) = controller.dispatch(event) {
            frame = next;
        }
    }
    log::debug!("Controller {} after {} events", controller.phase(), events.len());
    (controller, frame)
}

/// Renders the page into `out`. A load failure writes the error page
/// instead and is returned as the command's error.
pub async fn render(
    config: &VizConfig,
    sources: &DataSources,
    events: &[UiEvent],
    out: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = match ma_equity_loader::load(sources).await {
        Ok(data) => data,
        Err(e) => {
            log::error!("Error loading data: {e}");
            ma_equity_render::write_error_page(out, &e.to_string(), &sources.locations())?;
            return Err(e.into());
        }
    };

    let (controller, frame) = replay(config, data, events);
    let Some(dataset) = controller.dataset() else {
        return Err("controller has no dataset after load".into());
    };

    let page = ma_equity_render::render_page(&frame, dataset.districts(), dataset.years(), config)?;
    ma_equity_render::write_page(out, &page)?;

    println!(
        "Rendered {} for {} ({}) to {}",
        frame.selection.metric.label(),
        frame.selection.district.selector_value(),
        frame.selection.year,
        out.display()
    );
    Ok(())
}

/// Prints `code<TAB>name<TAB>has_row` for every district, sorted by name,
/// where `has_row` tells whether the latest school year has an enrollment
/// row for it.
pub async fn districts(sources: &DataSources) -> Result<(), Box<dyn std::error::Error>> {
    let data = ma_equity_loader::load(sources).await?;
    let index = EnrollmentIndex::build(data.records);
    let latest = index.year_range().map(|range| *range.end());

    let mut shapes: Vec<_> = data.districts.shapes().iter().collect();
    shapes.sort_by(|a, b| a.feature.name.cmp(&b.feature.name));
    for shape in &shapes {
        let has_row = latest.is_some_and(|year| index.contains(year, &shape.feature.code));
        println!("{}\t{}\t{has_row}", shape.feature.code, shape.feature.name);
    }

    if let Some(year) = latest {
        log::info!(
            "{} shapes, {} districts with rows in {year}",
            shapes.len(),
            index.district_count(year)
        );
    }
    Ok(())
}

/// Shape to hover, by code or by map pixel.
#[derive(Debug, Clone, PartialEq)]
pub enum HoverTarget {
    /// District code (`ORG8CODE`).
    Code(String),
    /// Pixel on the configured map canvas.
    Pixel(f64, f64),
}

/// Prints the tooltip for `target` after replaying `events`.
pub async fn hover(
    config: &VizConfig,
    sources: &DataSources,
    events: &[UiEvent],
    target: &HoverTarget,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = ma_equity_loader::load(sources).await?;
    let (controller, _) = replay(config, data, events);

    let code = match target {
        HoverTarget::Code(code) => code.as_str(),
        HoverTarget::Pixel(x, y) => controller
            .code_at_pixel(*x, *y)
            .ok_or_else(|| format!("No district at pixel {x},{y}"))?,
    };
    let tooltip = controller
        .hover(code)
        .ok_or_else(|| format!("No district with code '{code}'"))?;
    println!("{tooltip}");
    Ok(())
}

/// Prints every row whose `enrolled` total differs from its category sum.
pub async fn audit(sources: &DataSources) -> Result<(), Box<dyn std::error::Error>> {
    let data = ma_equity_loader::load(sources).await?;
    let index = EnrollmentIndex::build(data.records);
    let discrepancies = index.discrepancies();

    for d in &discrepancies {
        println!(
            "{}\t{}\tenrolled={}\tcategories={}\tdifference={}",
            d.year,
            d.district_code,
            format_value(d.enrolled),
            format_value(d.category_sum),
            format_value(d.difference())
        );
    }
    log::info!("{} rows disagree with their category totals", discrepancies.len());
    Ok(())
}
