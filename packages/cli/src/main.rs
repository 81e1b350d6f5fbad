#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the Massachusetts school district equity map.
//!
//! Loads the district polygons and the enrollment table, replays a list of
//! UI events (`year=2021`, `metric=aa_num`, `district=Boston`,
//! `click=00350000`) through the linked-view controller and writes the
//! resulting page, or answers lookups against the same data.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ma_equity_config::VizConfig;
use ma_equity_controller::UiEvent;
use ma_equity_loader::DataSources;

#[derive(Parser)]
#[command(
    name = "ma_equity_cli",
    about = "Massachusetts school district enrollment equity map"
)]
struct Cli {
    /// TOML configuration file (falls back to `MA_EQUITY_CONFIG`, then the
    /// built-in defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// District polygon `GeoJSON` path or URL, overriding the config
    #[arg(long, global = true)]
    districts: Option<String>,

    /// Enrollment CSV path or URL, overriding the config
    #[arg(long, global = true)]
    enrollment: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the map, legend, chart and page into a directory
    Render {
        /// Output directory
        #[arg(long, default_value = "out")]
        out: PathBuf,

        /// UI event to replay before rendering, as `kind=value` (repeatable)
        #[arg(long = "event")]
        events: Vec<UiEvent>,
    },
    /// List district codes and names
    Districts,
    /// Print the tooltip for a district shape
    Hover {
        /// District code (`ORG8CODE`)
        #[arg(long, required_unless_present = "at", conflicts_with = "at")]
        code: Option<String>,

        /// Map pixel as `X,Y`, resolved on the configured map canvas
        #[arg(long, value_parser = parse_pixel)]
        at: Option<(f64, f64)>,

        /// UI event to replay first, as `kind=value` (repeatable)
        #[arg(long = "event")]
        events: Vec<UiEvent>,
    },
    /// List rows whose enrolled total disagrees with the category counts
    Audit,
}

fn parse_pixel(text: &str) -> Result<(f64, f64), String> {
    let (x, y) = text
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{text}'"))?;
    let coord = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid pixel coordinate '{v}': {e}"))
    };
    Ok((coord(x)?, coord(y)?))
}

impl Cli {
    fn sources(&self, config: &VizConfig) -> DataSources {
        DataSources::new(
            self.districts.as_deref().unwrap_or(&config.data.districts),
            self.enrollment.as_deref().unwrap_or(&config.data.enrollment),
        )
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let config = VizConfig::load(cli.config.as_deref())?;
    let sources = cli.sources(&config);

    match cli.command {
        Commands::Render { out, events } => {
            commands::render(&config, &sources, &events, &out).await?;
        }
        Commands::Districts => commands::districts(&sources).await?,
        Commands::Hover { code, at, events } => {
            let target = match (code, at) {
                (Some(code), _) => commands::HoverTarget::Code(code),
                (None, Some((x, y))) => commands::HoverTarget::Pixel(x, y),
                (None, None) => return Err("hover needs --code or --at".into()),
            };
            commands::hover(&config, &sources, &events, &target).await?;
        }
        Commands::Audit => commands::audit(&sources).await?,
    }

    Ok(())
}
