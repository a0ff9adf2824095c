//! Escape-time iteration for a single pixel.
//!
//! Two kernels share one trait: [`NativeKernel`] iterates in `f64` and may
//! use the interior and periodicity shortcuts, [`ExtendedKernel`] iterates in
//! double-double and never takes a shortcut. The scanner is generic over the
//! trait so the choice is made once per pass.

use num_complex::{Complex, Complex64};

use crate::consts::{
    HIGH_PRECISION_ZOOM, OPTIMIZATION_ZOOM_LIMIT, PERIODICITY_EPSILON, PERIODICITY_INTERVAL,
};
use crate::scalar::DoubleDouble;
use crate::state::ViewportSnapshot;

/// Squared escape radius.
const ESCAPE_RADIUS_SQR: f64 = 4.0;

/// Outcome of iterating one point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Escape {
    /// Iterations until escape, or the limit when the point stayed bounded.
    pub iteration: u32,
    /// Continuous escape count, `1.0` for bounded points.
    pub smooth: f32,
}

impl Escape {
    pub fn bounded(limit: u32) -> Self {
        Self {
            iteration: limit,
            smooth: 1.0,
        }
    }

    /// `n + 1 - log2(ln|z| / ln 2)`, clamped at zero.
    pub fn escaped(iteration: u32, norm_sqr: f64) -> Self {
        let ln_modulus = 0.5 * norm_sqr.ln();
        let nu = (ln_modulus / std::f64::consts::LN_2).log2();
        let smooth = (iteration as f64 + 1.0 - nu).max(0.0);
        Self {
            iteration,
            smooth: smooth as f32,
        }
    }

    pub fn is_bounded(&self, limit: u32) -> bool {
        self.iteration >= limit
    }
}

/// Per-pixel escape-time computation bound to one viewport.
pub trait EscapeKernel: Sync {
    fn escape(&self, x: usize, y: usize, limit: u32) -> Escape;
}

/// Arithmetic used for a pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Precision {
    #[default]
    Native,
    Extended,
}

impl Precision {
    /// Extended precision strictly above `threshold`.
    pub fn for_zoom(zoom: f64, threshold: f64) -> Self {
        if zoom > threshold {
            Self::Extended
        } else {
            Self::Native
        }
    }
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Native => write!(f, "f64"),
            Self::Extended => write!(f, "double-double"),
        }
    }
}

/// Tunables that decide precision and shortcuts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KernelSettings {
    pub high_precision_zoom: f64,
    pub optimization_zoom_limit: f64,
    pub periodicity_interval: u32,
    pub periodicity_epsilon: f64,
}

impl Default for KernelSettings {
    fn default() -> Self {
        Self {
            high_precision_zoom: HIGH_PRECISION_ZOOM,
            optimization_zoom_limit: OPTIMIZATION_ZOOM_LIMIT,
            periodicity_interval: PERIODICITY_INTERVAL,
            periodicity_epsilon: PERIODICITY_EPSILON,
        }
    }
}

/// Main cardioid or period-2 bulb.
pub fn in_main_bulb(c: Complex64) -> bool {
    let x = c.re;
    let y2 = c.im * c.im;
    let q = (x - 0.25) * (x - 0.25) + y2;
    if q * (q + (x - 0.25)) <= 0.25 * y2 {
        return true;
    }
    (x + 1.0) * (x + 1.0) + y2 <= 0.0625
}

// ---------------------------------------------------------------------------
// Native
// ---------------------------------------------------------------------------

pub struct NativeKernel {
    viewport: ViewportSnapshot,
    width: usize,
    height: usize,
    shortcuts: bool,
    periodicity_interval: u32,
    periodicity_epsilon: f64,
}

impl NativeKernel {
    pub fn new(viewport: ViewportSnapshot, width: usize, height: usize) -> Self {
        Self::with_settings(viewport, width, height, &KernelSettings::default())
    }

    pub fn with_settings(
        viewport: ViewportSnapshot,
        width: usize,
        height: usize,
        settings: &KernelSettings,
    ) -> Self {
        Self {
            viewport,
            width,
            height,
            shortcuts: viewport.zoom <= settings.optimization_zoom_limit,
            periodicity_interval: settings.periodicity_interval.max(1),
            periodicity_epsilon: settings.periodicity_epsilon,
        }
    }

    pub fn shortcuts_enabled(&self) -> bool {
        self.shortcuts
    }

    /// Iterate an arbitrary point.
    pub fn escape_point(&self, c: Complex64, limit: u32) -> Escape {
        if self.shortcuts && in_main_bulb(c) {
            return Escape::bounded(limit);
        }

        let eps_sqr = self.periodicity_epsilon * self.periodicity_epsilon;
        let mut z = Complex64::new(0.0, 0.0);
        let mut z_old = z;
        let mut n = 0u32;
        while z.norm_sqr() <= ESCAPE_RADIUS_SQR && n < limit {
            z = z * z + c;
            n += 1;
            if self.shortcuts {
                if (z - z_old).norm_sqr() < eps_sqr {
                    return Escape::bounded(limit);
                }
                if n % self.periodicity_interval == 0 {
                    z_old = z;
                }
            }
        }

        if n < limit {
            Escape::escaped(n, z.norm_sqr())
        } else {
            Escape::bounded(limit)
        }
    }
}

impl EscapeKernel for NativeKernel {
    fn escape(&self, x: usize, y: usize, limit: u32) -> Escape {
        let c = self
            .viewport
            .pixel_to_point_f64(x, y, self.width, self.height);
        self.escape_point(c, limit)
    }
}

// ---------------------------------------------------------------------------
// Extended
// ---------------------------------------------------------------------------

pub struct ExtendedKernel {
    viewport: ViewportSnapshot,
    width: usize,
    height: usize,
}

impl ExtendedKernel {
    pub fn new(viewport: ViewportSnapshot, width: usize, height: usize) -> Self {
        Self {
            viewport,
            width,
            height,
        }
    }

    pub fn escape_point(&self, c: Complex<DoubleDouble>, limit: u32) -> Escape {
        let mut z = Complex::new(DoubleDouble::ZERO, DoubleDouble::ZERO);
        let mut n = 0u32;
        while z.norm_sqr() <= ESCAPE_RADIUS_SQR && n < limit {
            z = z * z + c;
            n += 1;
        }

        if n < limit {
            Escape::escaped(n, z.norm_sqr().to_f64())
        } else {
            Escape::bounded(limit)
        }
    }
}

impl EscapeKernel for ExtendedKernel {
    fn escape(&self, x: usize, y: usize, limit: u32) -> Escape {
        let c = self.viewport.pixel_to_point(x, y, self.width, self.height);
        self.escape_point(c, limit)
    }
}
