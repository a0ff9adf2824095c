use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use fractalis_core::kernel::Precision;
use fractalis_core::scalar::DoubleDouble;
use fractalis_core::snapshot::{render_snapshot, save_png, SnapshotOptions};
use fractalis_core::state::ViewportSnapshot;
use indicatif::{ProgressBar, ProgressStyle};
use num_complex::Complex;

use crate::summary::{print_render_summary, RenderSummary};

#[derive(Clone, Copy, ValueEnum)]
pub enum PrecisionArg {
    /// Pick from the zoom level
    Auto,
    Native,
    Extended,
}

#[derive(Args)]
pub struct RenderArgs {
    /// Real part of the centre, as a decimal (overrides the config)
    #[arg(long, allow_hyphen_values = true)]
    pub re: Option<String>,

    /// Imaginary part of the centre, as a decimal (overrides the config)
    #[arg(long, allow_hyphen_values = true)]
    pub im: Option<String>,

    /// Zoom level; 1 shows a 3x2 window (overrides the config)
    #[arg(long)]
    pub zoom: Option<f64>,

    /// Output width in pixels
    #[arg(long, default_value = "960")]
    pub width: usize,

    /// Output height in pixels
    #[arg(long, default_value = "540")]
    pub height: usize,

    /// Iteration cap (default: the fine-pass cap for the zoom)
    #[arg(long)]
    pub iterations: Option<u32>,

    /// Arithmetic used for the escape loop
    #[arg(long, value_enum, default_value = "auto")]
    pub precision: PrecisionArg,

    /// Explorer config file (TOML) for palette and kernel tunables
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output file path
    #[arg(short, long, default_value = "mandelbrot.png")]
    pub output: PathBuf,
}

pub fn run(args: &RenderArgs) -> Result<()> {
    let config = super::load_config(args.config.as_deref())?;

    let start = &config.start;
    let re: DoubleDouble = args
        .re
        .as_deref()
        .unwrap_or(&start.center_re)
        .parse()
        .context("Invalid --re")?;
    let im: DoubleDouble = args
        .im
        .as_deref()
        .unwrap_or(&start.center_im)
        .parse()
        .context("Invalid --im")?;
    let zoom = args.zoom.unwrap_or(start.zoom);
    if !(zoom > 0.0 && zoom.is_finite()) {
        anyhow::bail!("--zoom must be a positive number, got {zoom}");
    }
    let viewport = ViewportSnapshot::new(Complex::new(re, im), zoom);

    let options = SnapshotOptions {
        iterations: args.iterations,
        precision: match args.precision {
            PrecisionArg::Auto => None,
            PrecisionArg::Native => Some(Precision::Native),
            PrecisionArg::Extended => Some(Precision::Extended),
        },
        kernel: config.kernel_settings(),
        palette: config.palette(),
        ..SnapshotOptions::new(args.width, args.height)
    };

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner} {msg} {elapsed}")?);
    pb.set_message(format!("Rendering {}x{}", args.width, args.height));
    pb.enable_steady_tick(Duration::from_millis(100));

    let started = Instant::now();
    let image = render_snapshot(&viewport, &options)?;
    let elapsed = started.elapsed();
    pb.finish_and_clear();

    save_png(&image, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    print_render_summary(&RenderSummary {
        center: viewport.effective_center(),
        zoom,
        width: args.width,
        height: args.height,
        limit: options.limit_for(zoom),
        precision: options.precision_for(zoom),
        elapsed,
        output: args.output.clone(),
    });
    Ok(())
}
