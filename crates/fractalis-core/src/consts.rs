/// Interval between UI ticks (and idle compute polls), in milliseconds.
pub const UPDATE_SLEEP_MS: u64 = 16;

/// Hold time after which a press becomes a long press, in milliseconds.
pub const LONG_PRESS_DURATION_MS: u64 = 150;

/// Fraction of the screen span moved by a single pan.
pub const PAN_CONSTANT: f64 = 0.2;

/// Relative zoom change applied by a single zoom step.
pub const ZOOM_CONSTANT: f64 = 0.2;

/// Pixels computed between two progress publications.
pub const UPDATE_INTERVAL: usize = 100;

/// Floor of the adaptive iteration cap.
pub const LOWEST_ITER: u32 = 25;

/// Ceiling of the adaptive iteration cap.
pub const MAX_ITER: u32 = 10_000;

/// Palette hue offset for escaped pixels.
pub const START_HUE: f32 = 0.6222;

/// Normalised escape value at which saturation reaches 1.
pub const SATURATION_THRESHOLD: f32 = 0.08;

/// Normalised escape value at which brightness reaches 1.
pub const VALUE_THRESHOLD: f32 = 0.06;

/// Edge length of the square tiles scored by auto-zoom.
pub const TILE_SIZE: usize = 32;

/// Weight given to the central tile relative to the edge tiles.
pub const CENTER_BIAS: f64 = 1.5;

/// Zoom above which the kernel switches to double-double arithmetic.
/// Native doubles run out of distinguishable pixels around here.
pub const HIGH_PRECISION_ZOOM: f64 = 1e14;

/// Zoom above which the interior and periodicity shortcuts are disabled.
pub const OPTIMIZATION_ZOOM_LIMIT: f64 = 1e7;

/// Zoom above which the coarse preview pass is skipped.
pub const SKIP_PRE_RENDER_ZOOM: f64 = 1e6;

/// Iterations between periodicity snapshots of `z`.
pub const PERIODICITY_INTERVAL: u32 = 20;

/// Distance under which an orbit is considered to have returned to its snapshot.
pub const PERIODICITY_EPSILON: f64 = 1e-12;

/// Pico Display panel geometry.
pub const DEFAULT_SCREEN_WIDTH: usize = 240;
pub const DEFAULT_SCREEN_HEIGHT: usize = 135;

/// LED brightness applied at boot.
pub const DEFAULT_LED_BRIGHTNESS: u8 = 50;
