pub mod overlay;
pub mod palette;

use crate::device::Display;
use crate::state::{CalcPhase, EngineState, PanDirection, RenderPhase};

pub use overlay::draw_overlay;
pub use palette::{hsv_to_rgb, Palette};

/// Inclusive-exclusive pixel rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl Region {
    pub fn full(width: usize, height: usize) -> Self {
        Self {
            x0: 0,
            y0: 0,
            x1: width,
            y1: height,
        }
    }

    /// Strip uncovered by a pan of `pixels` in `direction`. The view moves
    /// toward `direction`, so new content appears on that side.
    pub fn strip(direction: PanDirection, pixels: usize, width: usize, height: usize) -> Self {
        let px = pixels.min(width);
        let py = pixels.min(height);
        match direction {
            PanDirection::None => Self::full(width, height),
            PanDirection::Left => Self { x0: 0, y0: 0, x1: px, y1: height },
            PanDirection::Right => Self { x0: width - px, y0: 0, x1: width, y1: height },
            PanDirection::Up => Self { x0: 0, y0: 0, x1: width, y1: py },
            PanDirection::Down => Self { x0: 0, y0: height - py, x1: width, y1: height },
        }
    }

    /// Square of half-size `radius` around the screen centre.
    pub fn around_center(radius: usize, width: usize, height: usize) -> Self {
        let cx = width / 2;
        let cy = height / 2;
        Self {
            x0: cx.saturating_sub(radius),
            y0: cy.saturating_sub(radius),
            x1: (cx + radius + 1).min(width),
            y1: (cy + radius + 1).min(height),
        }
    }

    pub fn intersect(&self, other: &Self) -> Self {
        let x0 = self.x0.max(other.x0);
        let y0 = self.y0.max(other.y0);
        Self {
            x0,
            y0,
            x1: self.x1.min(other.x1).max(x0),
            y1: self.y1.min(other.y1).max(y0),
        }
    }

    pub fn area(&self) -> usize {
        (self.x1 - self.x0) * (self.y1 - self.y0)
    }
}

/// What one render tick did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub pixels_painted: usize,
    /// Phase the tick worked on.
    pub phase: Option<RenderPhase>,
}

/// Paints completed pixels onto the display and advances `rendering`.
#[derive(Debug, Default)]
pub struct Renderer {
    palette: Palette,
    painted_generation: Option<u64>,
}

impl Renderer {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            painted_generation: None,
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Fractal layer for one UI tick.
    ///
    /// While a pass runs, the first tick of a generation paints the whole
    /// region (pan keeps shifted pixels that must move on screen too), later
    /// ticks only the square the scanner has reached. Once the engine is
    /// idle the region is painted in full and the phase steps down.
    pub fn render<D: Display>(&mut self, state: &EngineState, display: &mut D) -> RenderReport {
        let phase = state.rendering();
        if phase < RenderPhase::Strip {
            return RenderReport::default();
        }

        let (width, height) = (state.width(), state.height());
        let generation = state.calculation_id();
        let idle = state.calculating() == CalcPhase::Idle;

        let mut region = match phase {
            RenderPhase::Full => Region::full(width, height),
            _ => Region::strip(
                state.last_pan_direction(),
                state.last_pan_pixels(),
                width,
                height,
            ),
        };
        if !idle && self.painted_generation == Some(generation) {
            let reached = Region::around_center(state.last_updated_radius(), width, height);
            region = region.intersect(&reached);
        }

        let pixels_painted = self.paint(state, display, region);
        self.painted_generation = Some(generation);

        if idle {
            match phase {
                RenderPhase::Full => {
                    state.advance_rendering(RenderPhase::Full, RenderPhase::Strip);
                }
                RenderPhase::Strip => {
                    if state.advance_rendering(RenderPhase::Strip, RenderPhase::Done) {
                        state.clear_pan_direction();
                    }
                }
                _ => {}
            }
        }

        RenderReport {
            pixels_painted,
            phase: Some(phase),
        }
    }

    fn paint<D: Display>(&self, state: &EngineState, display: &mut D, region: Region) -> usize {
        let grid = state.grid();
        let limit = state.iteration_limit();
        let mut painted = 0;
        for y in region.y0..region.y1 {
            for x in region.x0..region.x1 {
                let pixel = grid.get(x, y);
                if !pixel.complete {
                    continue;
                }
                match self.palette.shade(pixel, limit) {
                    Some((h, s, v)) => display.set_pen_hsv(h, s, v),
                    None => display.set_pen(0, 0, 0),
                }
                display.pixel(x as i32, y as i32);
                painted += 1;
            }
        }
        painted
    }

    /// Fractal layer then, unless hidden, the overlay.
    pub fn draw<D: Display>(&mut self, state: &EngineState, display: &mut D) -> RenderReport {
        let report = self.render(state, display);
        if !state.hide_ui() {
            draw_overlay(state, display);
        }
        report
    }
}
