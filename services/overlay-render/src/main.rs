//! Overlay render CLI.
//!
//! Loads an overlay config and a raw `f32` raster, renders one frame onto a
//! Web Mercator viewport (or 1:1 onto the raster grid) and writes a PNG.

mod raw;

use anyhow::{bail, Context, Result};
use clap::Parser;
use overlay_common::{GeoBounds, OverlayConfig, RenderMode};
use projection::{PlotWindow, ViewTransform};
use raw::RawFileSource;
use renderer::{OverlayContext, RasterSource};
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "overlay-render")]
#[command(about = "Render a colorized raster overlay to PNG")]
struct Args {
    /// Overlay config (YAML or JSON)
    #[arg(short, long, env = "OVERLAY_CONFIG")]
    config: Option<PathBuf>,

    /// Raw little-endian f32 raster, row-major, north row first
    #[arg(short, long)]
    raster: PathBuf,

    /// Raster columns
    #[arg(long)]
    raster_width: usize,

    /// Raster rows
    #[arg(long)]
    raster_height: usize,

    /// Raster extent as south,west,north,east (degrees)
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    bounds: Vec<f64>,

    /// No-data sentinel stored in the raster file
    #[arg(long, allow_hyphen_values = true)]
    raster_no_data: Option<f64>,

    /// Override the config's render mode (parallel or sequential)
    #[arg(long, value_parser = parse_mode)]
    mode: Option<RenderMode>,

    /// Map zoom level
    #[arg(short, long, default_value = "3")]
    zoom: f64,

    /// Viewport width in pixels
    #[arg(long, default_value = "1024")]
    viewport_width: u32,

    /// Viewport height in pixels
    #[arg(long, default_value = "1024")]
    viewport_height: u32,

    /// Render 1:1 onto the raster grid instead of a map viewport
    #[arg(long)]
    fit: bool,

    /// Output PNG
    #[arg(short, long, default_value = "overlay.png")]
    output: PathBuf,

    /// Also write the color scale as a 256x1 PNG
    #[arg(long)]
    legend: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn parse_mode(s: &str) -> Result<RenderMode, String> {
    match s.to_lowercase().as_str() {
        "parallel" => Ok(RenderMode::Parallel),
        "sequential" => Ok(RenderMode::Sequential),
        other => Err(format!("unknown render mode '{}'", other)),
    }
}

fn init_tracing(args: &Args) -> Result<()> {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder().with_max_level(level);
    if args.log_json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

/// World view at `zoom` centred on the raster, plus the raster's visible window.
fn viewport_view(bounds: &GeoBounds, zoom: f64, width: u32, height: u32) -> (ViewTransform, PlotWindow) {
    let world = ViewTransform::web_mercator(zoom, 0.0, 0.0);
    let centre_lat = (bounds.north + bounds.south) / 2.0;
    let centre_lng = (bounds.east + bounds.west) / 2.0;
    let (cx, cy) = world.project(centre_lat, centre_lng);
    let viewport = world.offset(cx - width as f64 / 2.0, cy - height as f64 / 2.0);

    let window = PlotWindow::visible(&viewport, bounds, width, height);
    (window.view_for(&viewport), window)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args)?;

    let mut config = match &args.config {
        Some(path) => OverlayConfig::from_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => OverlayConfig::default(),
    };
    if let Some(mode) = args.mode {
        config.render_mode = mode;
    }

    let [south, west, north, east] = args.bounds[..] else {
        bail!("--bounds takes exactly four values: south,west,north,east");
    };
    let bounds = GeoBounds::new(south, west, north, east).context("invalid --bounds")?;

    let mut context = OverlayContext::from_config(&config).context("building overlay context")?;
    info!(mode = ?context.mode(), raster = %args.raster.display(), "Loading raster");

    let source = RawFileSource {
        path: args.raster.clone(),
        width: args.raster_width,
        height: args.raster_height,
        bounds,
        no_data: args.raster_no_data,
    };
    let load = tokio::task::spawn_blocking(move || source.load())
        .await
        .context("raster loader panicked")?;
    context.accept_load(None, load).context("loading raster")?;

    let (view, width, height) = if args.fit {
        let view = ViewTransform::fit_bounds(&bounds, args.raster_width, args.raster_height)?;
        (view, args.raster_width as i64, args.raster_height as i64)
    } else {
        let (view, window) = viewport_view(&bounds, args.zoom, args.viewport_width, args.viewport_height);
        (view, window.width, window.height)
    };

    let snapshot = context.snapshot()?;
    let image = tokio::task::spawn_blocking(move || snapshot.render(&view, width, height))
        .await
        .context("render task panicked")??;

    if image.is_empty() {
        warn!("Raster is outside the viewport, nothing written");
    } else {
        image
            .save(&args.output)
            .with_context(|| format!("writing {}", args.output.display()))?;
        info!(
            output = %args.output.display(),
            width = image.width(),
            height = image.height(),
            "Wrote overlay"
        );
    }

    if let Some(legend) = &args.legend {
        context
            .color_scale_image()
            .save(legend)
            .with_context(|| format!("writing {}", legend.display()))?;
        info!(output = %legend.display(), "Wrote color scale");
    }

    Ok(())
}
