//! Contour demo
//!
//! Samples a synthetic field over a geographic domain, contours it and
//! writes the result as a PNG preview or a GeoJSON feature collection.

mod config;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use contour_common::GeoBounds;
use projection::LinearProjector;
use renderer::{
    uniform_levels, CanvasRenderer, CanvasStyle, ContourPipeline, DrawReport, GeoJsonRenderer,
    RenderSession,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{DemoConfig, DomainConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Png,
    Geojson,
}

impl OutputFormat {
    /// Guess from the file extension, defaulting to PNG.
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("geojson") || ext.eq_ignore_ascii_case("json") => {
                OutputFormat::Geojson
            }
            _ => OutputFormat::Png,
        }
    }
}

/// Contour demo
#[derive(Parser, Debug)]
#[command(name = "contour-demo")]
#[command(about = "Draw filled, labeled contours of a synthetic field")]
struct Args {
    /// YAML config file
    #[arg(short, long, env = "CONTOUR_CONFIG")]
    config: Option<PathBuf>,

    /// Output file
    #[arg(short, long, default_value = "contours.png")]
    output: PathBuf,

    /// Output format; inferred from the output extension when omitted
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Normalised levels, overriding the config (comma separated)
    #[arg(long, value_delimiter = ',', conflicts_with = "uniform_levels")]
    levels: Option<Vec<f64>>,

    /// Use this many evenly spaced levels from 0 to 1
    #[arg(long)]
    uniform_levels: Option<usize>,

    /// Domain bounds as "west,south,east,north", overriding the config
    #[arg(long, value_parser = GeoBounds::parse, allow_hyphen_values = true)]
    bounds: Option<GeoBounds>,

    /// Print the draw report as JSON on stdout
    #[arg(long)]
    report: bool,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, env = "CONTOUR_JSON_LOGS")]
    json_logs: bool,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.json_logs);

    let mut config = match &args.config {
        Some(path) => DemoConfig::load(path)?,
        None => DemoConfig::default(),
    };
    apply_overrides(&args, &mut config);
    config.validate()?;

    let start = Instant::now();
    let domain = config.grid_domain()?;
    let field = config
        .sampler
        .sample(&domain)
        .context("Failed to sample field")?;

    info!(
        rows = field.rows(),
        cols = field.cols(),
        west = domain.bounds.west,
        south = domain.bounds.south,
        east = domain.bounds.east,
        north = domain.bounds.north,
        "Sampled field"
    );

    let projector = LinearProjector::new(&domain);
    let pipeline = ContourPipeline::new(config.pipeline.clone());
    let format = args
        .format
        .unwrap_or_else(|| OutputFormat::from_path(&args.output));

    let (bytes, report) = match format {
        OutputFormat::Png => {
            let style = CanvasStyle {
                background: config.image.background_color()?,
                ..CanvasStyle::default()
            };
            let canvas = CanvasRenderer::with_style(
                config.image.width,
                config.image.height,
                domain.bounds,
                style,
            )?;
            let mut session = RenderSession::new(canvas);
            let report = pipeline.draw(&field, &projector, &mut session);
            (session.renderer().encode_png()?, report)
        }
        OutputFormat::Geojson => {
            let mut session = RenderSession::new(GeoJsonRenderer::new());
            let report = pipeline.draw(&field, &projector, &mut session);
            (session.renderer().to_json()?.into_bytes(), report)
        }
    };

    std::fs::write(&args.output, &bytes)
        .with_context(|| format!("Failed to write output: {}", args.output.display()))?;

    info!(
        output = %args.output.display(),
        format = ?format,
        bytes = bytes.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Wrote contours"
    );

    if args.report {
        print_report(&report)?;
    }

    Ok(())
}

/// Command-line values win over the config file.
fn apply_overrides(args: &Args, config: &mut DemoConfig) {
    if let Some(levels) = &args.levels {
        config.pipeline.levels = levels.clone();
    }
    if let Some(count) = args.uniform_levels {
        config.pipeline.levels = uniform_levels(count);
    }
    if let Some(bounds) = args.bounds {
        config.domain = DomainConfig::Bounds {
            west: bounds.west,
            south: bounds.south,
            east: bounds.east,
            north: bounds.north,
        };
    }
}

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = fmt().with_env_filter(filter).with_target(true).with_level(true);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_report(report: &DrawReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    println!("{}", json);
    Ok(())
}
