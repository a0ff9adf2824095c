use tracing::trace;

use crate::consts::UPDATE_INTERVAL;
use crate::kernel::EscapeKernel;
use crate::state::{EngineState, PixelState};

/// How a pass ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassOutcome {
    Completed,
    /// The generation moved on before the last ring was done.
    Cancelled,
}

enum PixelStep {
    Skipped,
    Computed,
    Stale,
}

/// Walks concentric square rings outward from the screen centre, filling
/// every incomplete cell with the kernel's result.
///
/// The centre of the screen is finished first. The generation is sampled at
/// every ring and re-checked after every cell store; a mismatch abandons the
/// pass and leaves no cell marked complete for the old viewport.
pub struct RingScanner<'a> {
    state: &'a EngineState,
    update_interval: usize,
}

impl<'a> RingScanner<'a> {
    pub fn new(state: &'a EngineState) -> Self {
        Self {
            state,
            update_interval: UPDATE_INTERVAL,
        }
    }

    /// Publish progress every `interval` computed pixels.
    pub fn with_update_interval(mut self, interval: usize) -> Self {
        self.update_interval = interval.max(1);
        self
    }

    /// Largest ring radius for the grid.
    pub fn max_radius(&self) -> usize {
        self.state.width().max(self.state.height()) / 2
    }

    /// Run one pass at `limit` on behalf of `generation`.
    pub fn run<K: EscapeKernel>(&self, kernel: &K, limit: u32, generation: u64) -> PassOutcome {
        let cx = (self.state.width() / 2) as i64;
        let cy = (self.state.height() / 2) as i64;
        let max_radius = self.max_radius();
        let mut since_update = 0usize;

        for radius in 0..=max_radius {
            if self.state.calculation_id() != generation {
                trace!(generation, radius, "pass cancelled at ring boundary");
                return PassOutcome::Cancelled;
            }

            let r = radius as i64;
            for x in -r..=r {
                for (px, py) in [(cx + x, cy + r), (cx + x, cy - r)] {
                    match self.compute(kernel, px, py, limit, generation) {
                        PixelStep::Computed => since_update += 1,
                        PixelStep::Skipped => {}
                        PixelStep::Stale => return PassOutcome::Cancelled,
                    }
                }
            }
            for y in (-r + 1)..r {
                for (px, py) in [(cx + r, cy + y), (cx - r, cy + y)] {
                    match self.compute(kernel, px, py, limit, generation) {
                        PixelStep::Computed => since_update += 1,
                        PixelStep::Skipped => {}
                        PixelStep::Stale => return PassOutcome::Cancelled,
                    }
                }
            }

            if since_update >= self.update_interval {
                self.state.set_last_updated_radius(radius);
                since_update = 0;
            }
        }

        self.state.set_last_updated_radius(max_radius);
        PassOutcome::Completed
    }

    fn compute<K: EscapeKernel>(
        &self,
        kernel: &K,
        x: i64,
        y: i64,
        limit: u32,
        generation: u64,
    ) -> PixelStep {
        let grid = self.state.grid();
        let Some((x, y)) = grid.index(x, y) else {
            return PixelStep::Skipped;
        };
        if grid.is_complete(x, y) {
            return PixelStep::Skipped;
        }

        let escape = kernel.escape(x, y, limit);
        grid.set(x, y, PixelState::finished(escape.iteration, escape.smooth));

        if !self.state.generation_is(generation) {
            grid.clear(x, y);
            trace!(generation, x, y, "pass cancelled after stale store");
            return PixelStep::Stale;
        }
        PixelStep::Computed
    }
}
