use std::path::Path;
use std::time::Duration;

use num_complex::Complex;
use serde::{Deserialize, Serialize};

use crate::autozoom::AutoZoomSettings;
use crate::consts::{
    CENTER_BIAS, DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH, HIGH_PRECISION_ZOOM,
    LONG_PRESS_DURATION_MS, LOWEST_ITER, MAX_ITER, OPTIMIZATION_ZOOM_LIMIT, PAN_CONSTANT,
    PERIODICITY_EPSILON, PERIODICITY_INTERVAL, SATURATION_THRESHOLD, SKIP_PRE_RENDER_ZOOM,
    START_HUE, TILE_SIZE, UPDATE_INTERVAL, UPDATE_SLEEP_MS, VALUE_THRESHOLD, ZOOM_CONSTANT,
};
use crate::engine::{UiSettings, WorkerSettings};
use crate::error::{FractalisError, Result};
use crate::input::{long_press_ticks, InputSettings};
use crate::kernel::KernelSettings;
use crate::render::Palette;
use crate::scalar::DoubleDouble;
use crate::state::ViewportSnapshot;

/// Every tunable of the explorer. Missing sections and fields fall back to
/// the board defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExplorerConfig {
    #[serde(default)]
    pub screen: ScreenConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub iteration: IterationConfig,
    #[serde(default)]
    pub palette: PaletteConfig,
    #[serde(default)]
    pub auto_zoom: AutoZoomConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub start: StartConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: usize,
    pub height: usize,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_SCREEN_WIDTH,
            height: DEFAULT_SCREEN_HEIGHT,
        }
    }
}

impl std::fmt::Display for ScreenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Fraction of the screen span moved per pan.
    pub pan_step: f64,
    /// Relative zoom change per press.
    pub zoom_step: f64,
    pub long_press_ms: u64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            pan_step: PAN_CONSTANT,
            zoom_step: ZOOM_CONSTANT,
            long_press_ms: LONG_PRESS_DURATION_MS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IterationConfig {
    pub lowest_iter: u32,
    pub max_iter: u32,
    /// Zoom above which the extended-precision kernel is used.
    pub high_precision_zoom: f64,
    /// Zoom above which the interior and periodicity shortcuts are off.
    pub optimization_zoom_limit: f64,
    /// Zoom above which the coarse pass is skipped.
    pub skip_pre_render_zoom: f64,
    pub periodicity_interval: u32,
    pub periodicity_epsilon: f64,
    /// Computed pixels between progress publications.
    pub update_interval: usize,
}

impl Default for IterationConfig {
    fn default() -> Self {
        Self {
            lowest_iter: LOWEST_ITER,
            max_iter: MAX_ITER,
            high_precision_zoom: HIGH_PRECISION_ZOOM,
            optimization_zoom_limit: OPTIMIZATION_ZOOM_LIMIT,
            skip_pre_render_zoom: SKIP_PRE_RENDER_ZOOM,
            periodicity_interval: PERIODICITY_INTERVAL,
            periodicity_epsilon: PERIODICITY_EPSILON,
            update_interval: UPDATE_INTERVAL,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub start_hue: f32,
    pub saturation_threshold: f32,
    pub value_threshold: f32,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            start_hue: START_HUE,
            saturation_threshold: SATURATION_THRESHOLD,
            value_threshold: VALUE_THRESHOLD,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoZoomConfig {
    pub tile_size: usize,
    pub center_bias: f64,
    pub cooldown_ms: u64,
    pub jitter: f64,
    /// Fixed seed for the first-pan jitter.
    pub seed: Option<u64>,
}

impl Default for AutoZoomConfig {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            center_bias: CENTER_BIAS,
            cooldown_ms: 1000,
            jitter: 1.0,
            seed: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub tick_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_ms: UPDATE_SLEEP_MS,
        }
    }
}

/// Initial viewport. Coordinates are decimal strings so deep locations keep
/// every digit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartConfig {
    pub center_re: String,
    pub center_im: String,
    pub zoom: f64,
}

impl Default for StartConfig {
    fn default() -> Self {
        Self {
            center_re: "-0.5".into(),
            center_im: "0".into(),
            zoom: 1.0,
        }
    }
}

impl std::fmt::Display for StartConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}) at x{}", self.center_re, self.center_im, self.zoom)
    }
}

impl StartConfig {
    pub fn center(&self) -> Result<Complex<DoubleDouble>> {
        Ok(Complex::new(self.center_re.parse()?, self.center_im.parse()?))
    }
}

impl ExplorerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(FractalisError::InvalidConfig(msg));

        if self.screen.width == 0 || self.screen.height == 0 {
            return Err(FractalisError::InvalidDimensions {
                width: self.screen.width,
                height: self.screen.height,
            });
        }
        let nav = &self.navigation;
        if !(nav.pan_step > 0.0 && nav.pan_step <= 1.0) {
            return fail(format!("navigation.pan_step must be in (0, 1], got {}", nav.pan_step));
        }
        if !(nav.zoom_step > 0.0 && nav.zoom_step < 1.0) {
            return fail(format!("navigation.zoom_step must be in (0, 1), got {}", nav.zoom_step));
        }
        let it = &self.iteration;
        if it.lowest_iter == 0 || it.lowest_iter > it.max_iter {
            return fail(format!(
                "iteration bounds must satisfy 1 <= lowest_iter <= max_iter, got {}..{}",
                it.lowest_iter, it.max_iter
            ));
        }
        if it.max_iter > crate::state::grid::MAX_CELL_ITERATION {
            return fail(format!("iteration.max_iter too large: {}", it.max_iter));
        }
        if it.high_precision_zoom <= 0.0 || it.periodicity_epsilon < 0.0 || it.periodicity_interval == 0 {
            return fail("iteration thresholds must be positive".into());
        }
        let pal = &self.palette;
        if pal.saturation_threshold <= 0.0 || pal.value_threshold <= 0.0 {
            return fail("palette thresholds must be positive".into());
        }
        let az = &self.auto_zoom;
        if az.tile_size == 0 || az.center_bias < 1.0 || az.jitter < 0.0 {
            return fail(format!(
                "auto_zoom needs tile_size > 0, center_bias >= 1, jitter >= 0 (got {}, {}, {})",
                az.tile_size, az.center_bias, az.jitter
            ));
        }
        if self.timing.tick_ms == 0 {
            return fail("timing.tick_ms must be positive".into());
        }
        if !(self.start.zoom > 0.0 && self.start.zoom.is_finite()) {
            return fail(format!("start.zoom must be positive, got {}", self.start.zoom));
        }
        self.start.center()?;
        Ok(())
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.timing.tick_ms)
    }

    pub fn start_viewport(&self) -> Result<ViewportSnapshot> {
        Ok(ViewportSnapshot::new(self.start.center()?, self.start.zoom))
    }

    pub fn kernel_settings(&self) -> KernelSettings {
        KernelSettings {
            high_precision_zoom: self.iteration.high_precision_zoom,
            optimization_zoom_limit: self.iteration.optimization_zoom_limit,
            periodicity_interval: self.iteration.periodicity_interval,
            periodicity_epsilon: self.iteration.periodicity_epsilon,
        }
    }

    pub fn palette(&self) -> Palette {
        Palette {
            start_hue: self.palette.start_hue,
            saturation_threshold: self.palette.saturation_threshold,
            value_threshold: self.palette.value_threshold,
        }
    }

    pub fn worker_settings(&self) -> WorkerSettings {
        WorkerSettings {
            kernel: self.kernel_settings(),
            lowest_iter: self.iteration.lowest_iter,
            max_iter: self.iteration.max_iter,
            skip_pre_render_zoom: self.iteration.skip_pre_render_zoom,
            update_interval: self.iteration.update_interval,
            idle_sleep: self.tick(),
        }
    }

    pub fn ui_settings(&self) -> UiSettings {
        let tick_ms = self.timing.tick_ms;
        UiSettings {
            input: InputSettings {
                long_press_ticks: long_press_ticks(self.navigation.long_press_ms, tick_ms),
                pan_step: self.navigation.pan_step,
                zoom_step: self.navigation.zoom_step,
            },
            auto_zoom: AutoZoomSettings {
                tile_size: self.auto_zoom.tile_size,
                center_bias: self.auto_zoom.center_bias,
                cooldown_ticks: (self.auto_zoom.cooldown_ms / tick_ms.max(1)) as u32,
                pan_step: self.navigation.pan_step,
                zoom_step: self.navigation.zoom_step,
                jitter: self.auto_zoom.jitter,
            },
            palette: self.palette(),
            seed: self.auto_zoom.seed,
        }
    }
}
