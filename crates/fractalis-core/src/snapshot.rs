//! One-shot rendering of a viewport to an image, outside the interactive loop.

use std::path::Path;

use image::RgbImage;
use rayon::prelude::*;
use tracing::info;

use crate::engine::IterationCaps;
use crate::error::{FractalisError, Result};
use crate::kernel::{EscapeKernel, ExtendedKernel, KernelSettings, NativeKernel, Precision};
use crate::render::Palette;
use crate::state::{PixelState, ViewportSnapshot};

#[derive(Clone, Debug, PartialEq)]
pub struct SnapshotOptions {
    pub width: usize,
    pub height: usize,
    /// Iteration cap; the fine cap for the zoom when unset.
    pub iterations: Option<u32>,
    /// Forces a kernel; chosen from the zoom when unset.
    pub precision: Option<Precision>,
    pub kernel: KernelSettings,
    pub palette: Palette,
}

impl SnapshotOptions {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            iterations: None,
            precision: None,
            kernel: KernelSettings::default(),
            palette: Palette::default(),
        }
    }

    pub fn limit_for(&self, zoom: f64) -> u32 {
        self.iterations
            .unwrap_or_else(|| IterationCaps::for_zoom(self.width, zoom).fine)
    }

    pub fn precision_for(&self, zoom: f64) -> Precision {
        self.precision
            .unwrap_or_else(|| Precision::for_zoom(zoom, self.kernel.high_precision_zoom))
    }
}

/// Render every pixel of `viewport`, rows in parallel.
pub fn render_snapshot(viewport: &ViewportSnapshot, options: &SnapshotOptions) -> Result<RgbImage> {
    if options.width == 0 || options.height == 0 {
        return Err(FractalisError::InvalidDimensions {
            width: options.width,
            height: options.height,
        });
    }

    let limit = options.limit_for(viewport.zoom);
    let precision = options.precision_for(viewport.zoom);
    let (w, h) = (options.width, options.height);

    let image = match precision {
        Precision::Native => {
            let kernel = NativeKernel::with_settings(*viewport, w, h, &options.kernel);
            paint_rows(&kernel, w, h, limit, &options.palette)
        }
        Precision::Extended => {
            let kernel = ExtendedKernel::new(*viewport, w, h);
            paint_rows(&kernel, w, h, limit, &options.palette)
        }
    };

    info!(width = w, height = h, limit, %precision, zoom = viewport.zoom, "Snapshot rendered");
    Ok(image)
}

fn paint_rows<K: EscapeKernel>(kernel: &K, width: usize, height: usize, limit: u32, palette: &Palette) -> RgbImage {
    let mut image = RgbImage::new(width as u32, height as u32);
    let stride = width * 3;
    image
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.chunks_exact_mut(3).enumerate() {
                let escape = kernel.escape(x, y, limit);
                let rgb = palette.rgb(PixelState::finished(escape.iteration, escape.smooth), limit);
                px.copy_from_slice(&rgb);
            }
        });
    image
}

pub fn save_png(image: &RgbImage, path: &Path) -> Result<()> {
    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}
