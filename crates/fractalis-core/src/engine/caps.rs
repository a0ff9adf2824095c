use crate::consts::{LOWEST_ITER, MAX_ITER};

/// Iteration caps for the two passes at one zoom level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IterationCaps {
    pub fine: u32,
    pub coarse: u32,
}

impl IterationCaps {
    /// Caps for a screen `width` pixels wide at `zoom`, with the default bounds.
    pub fn for_zoom(width: usize, zoom: f64) -> Self {
        Self::with_bounds(width, zoom, LOWEST_ITER, MAX_ITER)
    }

    /// `fine = floor(50 * log10(W * zoom / 3)^1.25)` clamped to
    /// `[lowest, max]`; `coarse = fine / divider` with the divider shrinking
    /// from 6 to 4 as the zoom deepens.
    pub fn with_bounds(width: usize, zoom: f64, lowest: u32, max: u32) -> Self {
        let scale = width as f64 * zoom / 3.0;
        let log = scale.log10();
        let raw = if log > 0.0 && log.is_finite() {
            (50.0 * log.powf(1.25)).floor()
        } else {
            0.0
        };
        let fine = raw.clamp(lowest as f64, max.max(lowest) as f64) as u32;
        let coarse = (fine / coarse_divider(zoom)).max(1);
        Self { fine, coarse }
    }
}

pub fn coarse_divider(zoom: f64) -> u32 {
    if zoom > 1e5 {
        4
    } else if zoom > 1e4 {
        5
    } else {
        6
    }
}
