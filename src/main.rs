//! # Tide Tackle Application Entry Point
//!
//! Runs one evaluation for a position (or the configured default) and prints
//! either the terminal report or the full assessment as JSON.
//!
//! Diagnostics go to stderr through `tracing` (`RUST_LOG` overrides the
//! default `tide_tackle=info`); the report itself goes to stdout.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use tide_tackle::advisor::Advisor;
use tide_tackle::config::{Config, DEFAULT_CONFIG_PATH};
use tide_tackle::report::render_text;
use tide_tackle::strategy::DepthCategory;
use tide_tackle::tide_data::JcgTideClient;
use tide_tackle::weather::{local_clock, OpenMeteoClient};
use tide_tackle::Coordinates;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tide-tackle")]
#[command(version, about = "Tackle and seat advisor for tidal-strait fishing")]
struct Args {
    /// Latitude in decimal degrees (requires --lon)
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude in decimal degrees (requires --lat)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Target depth: shallow, mid or deep (overrides the config file)
    #[arg(long)]
    depth: Option<DepthCategory>,

    /// Path to the TOML configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Print the assessment as JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Write the effective configuration back to --config before running
    #[arg(long)]
    save_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tide_tackle=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::load_from_path(&args.config);
    if let Some(depth) = args.depth {
        config.fishing.depth = depth;
    }
    if args.save_config {
        config
            .save_to_path(&args.config)
            .with_context(|| format!("saving {}", args.config.display()))?;
    }

    let position = match (args.lat, args.lon) {
        (Some(latitude), Some(longitude)) => Some(Coordinates {
            latitude,
            longitude,
        }),
        _ => None,
    };

    let tide_client = JcgTideClient::new(config.request_timeout(), config.tide_ttl())
        .context("building current-table client")?;
    let weather_client = OpenMeteoClient::new(
        config.network.weather_base_url.clone(),
        config.request_timeout(),
        config.weather_ttl(),
    )
    .context("building weather client")?;
    let advisor = Advisor::new(tide_client, weather_client, config.advisor_settings());

    // Create Tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new().context("starting tokio runtime")?;

    let now = Utc::now().with_timezone(&local_clock());
    debug!(%now, ?position, "evaluating");
    let assessment = rt
        .block_on(advisor.evaluate(position, now))
        .context("could not evaluate conditions, try again shortly")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&assessment)?);
    } else {
        println!("{}", render_text(&assessment));
    }

    Ok(())
}
