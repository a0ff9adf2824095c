//! Unattended exploration: find the busiest tile near the centre, pan
//! toward it, zoom in, repeat.

use ndarray::{s, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::consts::{CENTER_BIAS, PAN_CONSTANT, TILE_SIZE, UPDATE_SLEEP_MS, ZOOM_CONSTANT};
use crate::state::EngineState;

/// Divides the zoom step for automatic dives.
const DIVE_ZOOM_DIVISOR: f64 = 1.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AutoZoomSettings {
    pub tile_size: usize,
    pub center_bias: f64,
    /// Quiescent ticks to wait between actions.
    pub cooldown_ticks: u32,
    pub pan_step: f64,
    pub zoom_step: f64,
    /// Half-width of the random offset added to the first pan.
    pub jitter: f64,
}

impl Default for AutoZoomSettings {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            center_bias: CENTER_BIAS,
            cooldown_ticks: (1000 / UPDATE_SLEEP_MS) as u32,
            pan_step: PAN_CONSTANT,
            zoom_step: ZOOM_CONSTANT,
            jitter: 1.0,
        }
    }
}

/// Next step of the pan/zoom alternation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DivePhase {
    #[default]
    Pan,
    Zoom,
}

/// What one auto-zoom tick did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DiveAction {
    /// Auto-zoom is off or the engine is busy.
    Inactive,
    /// Waiting out the cooldown.
    Cooldown { remaining: u32 },
    Pan { dx: f64, dy: f64, target: (usize, usize) },
    Zoom { factor: f64 },
    /// The screen has no full tile to score.
    NoTarget,
}

/// Number of unequal left and top neighbour pairs inside one tile.
pub fn tile_detail(iterations: &Array2<u32>, tile_x: usize, tile_y: usize, tile: usize) -> u32 {
    let (h, w) = iterations.dim();
    let x0 = tile_x * tile;
    let y0 = tile_y * tile;
    let x1 = (x0 + tile).min(w);
    let y1 = (y0 + tile).min(h);
    if x0 >= x1 || y0 >= y1 {
        return 0;
    }

    let block = iterations.slice(s![y0..y1, x0..x1]);
    let mut changes = 0;
    for ((y, x), &value) in block.indexed_iter() {
        if x > 0 && block[[y, x - 1]] != value {
            changes += 1;
        }
        if y > 0 && block[[y - 1, x]] != value {
            changes += 1;
        }
    }
    changes
}

/// Weight that favours tiles near the middle of the tile grid, from `bias`
/// at the centre down to 1 at the edge.
pub fn center_weight(tile_x: usize, tile_y: usize, tiles_x: usize, tiles_y: usize, bias: f64) -> f64 {
    let half_x = tiles_x as f64 / 2.0;
    let half_y = tiles_y as f64 / 2.0;
    let dx = (tile_x as f64 - half_x).abs() / half_x;
    let dy = (tile_y as f64 - half_y).abs() / half_y;
    1.0 + (1.0 - dx.max(dy)) * (bias - 1.0)
}

/// Centre pixel of the full tile with the highest weighted detail.
/// Ties keep the first tile in row-major order.
pub fn find_detail_target(iterations: &Array2<u32>, tile: usize, bias: f64) -> Option<(usize, usize)> {
    if tile == 0 {
        return None;
    }
    let (h, w) = iterations.dim();
    let tiles_x = w / tile;
    let tiles_y = h / tile;

    let mut best: Option<(f64, usize, usize)> = None;
    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let score = tile_detail(iterations, tx, ty, tile) as f64
                * center_weight(tx, ty, tiles_x, tiles_y, bias);
            if best.map_or(true, |(top, _, _)| score > top) {
                best = Some((score, tx, ty));
            }
        }
    }
    best.map(|(_, tx, ty)| (tx * tile + tile / 2, ty * tile + tile / 2))
}

pub struct AutoZoom {
    settings: AutoZoomSettings,
    phase: DivePhase,
    skip_counter: u32,
    jittered: bool,
    rng: StdRng,
}

impl AutoZoom {
    pub fn new(settings: AutoZoomSettings) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    /// Deterministic jitter for reproducible sessions.
    pub fn with_seed(settings: AutoZoomSettings, seed: u64) -> Self {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: AutoZoomSettings, rng: StdRng) -> Self {
        Self {
            settings,
            phase: DivePhase::Pan,
            skip_counter: settings.cooldown_ticks,
            jittered: false,
            rng,
        }
    }

    pub fn phase(&self) -> DivePhase {
        self.phase
    }

    pub fn skip_counter(&self) -> u32 {
        self.skip_counter
    }

    /// One UI tick. Acts only when auto-zoom is on and nothing is computing
    /// or waiting to be painted.
    pub fn tick(&mut self, state: &EngineState) -> DiveAction {
        if !state.auto_zoom() || !state.is_quiescent() {
            return DiveAction::Inactive;
        }
        state.set_skip_pre_render(true);

        if self.skip_counter > 0 {
            self.skip_counter -= 1;
            return DiveAction::Cooldown {
                remaining: self.skip_counter,
            };
        }

        let action = match self.phase {
            DivePhase::Pan => {
                let iterations = state.grid().iterations();
                let Some(target) =
                    find_detail_target(&iterations, self.settings.tile_size, self.settings.center_bias)
                else {
                    return DiveAction::NoTarget;
                };
                let (dx, dy) = self.pan_toward(target, state.width(), state.height());
                info!(dx, dy, x = target.0, y = target.1, "Auto-zoom pan");
                state.pan(dx, dy);
                self.phase = DivePhase::Zoom;
                DiveAction::Pan { dx, dy, target }
            }
            DivePhase::Zoom => {
                let factor = self.settings.zoom_step / DIVE_ZOOM_DIVISOR;
                info!(factor, "Auto-zoom dive");
                state.zoom(factor);
                self.phase = DivePhase::Pan;
                DiveAction::Zoom { factor }
            }
        };
        self.skip_counter = self.settings.cooldown_ticks;
        action
    }

    fn pan_toward(&mut self, target: (usize, usize), width: usize, height: usize) -> (f64, f64) {
        let (x, y) = target;
        let mut dx = (x as f64 - (width / 2) as f64) / width as f64 * self.settings.pan_step;
        let mut dy = (y as f64 - (height / 2) as f64) / height as f64 * self.settings.pan_step;
        if !self.jittered {
            let j = self.settings.jitter;
            if j > 0.0 {
                dx += self.rng.gen_range(-j..=j);
                dy += self.rng.gen_range(-j..=j);
            }
            self.jittered = true;
        }
        (dx, dy)
    }
}
