use num_complex::Complex;
use tracing::info;

use crate::state::{CalcPhase, EngineState, PanDirection, RenderPhase};
use crate::state::viewport::{VIEW_HEIGHT, VIEW_WIDTH};

/// Whole-pixel grid shift that keeps overlapping pixels valid after a pan.
///
/// Panning by `dx` screen spans moves the view `|dx| * W / 3` pixels; the
/// content moves the other way.
pub fn pan_shift(dx: f64, dy: f64, width: usize, height: usize) -> (i64, i64) {
    let px = (dx.abs() * width as f64 / VIEW_WIDTH).floor() as i64;
    let py = (dy.abs() * height as f64 / VIEW_HEIGHT).floor() as i64;
    (against(dx, px), against(dy, py))
}

fn against(delta: f64, pixels: i64) -> i64 {
    if delta > 0.0 {
        -pixels
    } else if delta < 0.0 {
        pixels
    } else {
        0
    }
}

impl EngineState {
    /// Scale the zoom by `1 + factor` and start over with a coarse pass.
    pub fn zoom(&self, factor: f64) {
        let zoom = self.zoom_level() * (1.0 + factor);

        self.begin_update();
        self.store_zoom(zoom);
        self.grid().reset_complete_all();
        self.set_calculating(CalcPhase::Coarse);
        self.set_rendering(RenderPhase::Full);
        self.set_last_updated_radius(0);
        let generation = self.end_update();

        info!(factor, zoom, generation, "Zoom");
    }

    /// Move the view by a fraction of the screen span, keeping the pixels
    /// that are still on screen, and ask for a fine pass over the rest.
    pub fn pan(&self, dx: f64, dy: f64) {
        let zoom = self.zoom_level();
        let offset = self.pan_offset();
        let direction = PanDirection::classify(dx, dy);
        let (shift_x, shift_y) = pan_shift(dx, dy, self.width(), self.height());
        let strip = match direction {
            PanDirection::Up | PanDirection::Down => shift_y.unsigned_abs(),
            _ => shift_x.unsigned_abs(),
        };

        // Offset and shift must land together: a pixel computed under the
        // new offset and then shifted would be misplaced.
        self.begin_update();
        self.store_pan(Complex::new(offset.re + dx / zoom, offset.im + dy / zoom));
        self.grid().shift(shift_x, shift_y);
        self.record_pan(direction, strip as usize);
        self.set_calculating(CalcPhase::Fine);
        self.set_rendering(RenderPhase::Full);
        self.set_last_updated_radius(0);
        let generation = self.end_update();

        info!(dx, dy, shift_x, shift_y, %direction, generation, "Pan");
    }
}
