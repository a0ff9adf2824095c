use crate::device::{Display, GLYPH_HEIGHT};
use crate::scalar::DoubleDouble;
use crate::state::EngineState;

const MARGIN: i32 = 2;
const LINE_SPACING: i32 = 2;
const TEXT_SCALE: f32 = 1.0;

pub const LABEL_A: &str = "A: Auto";
pub const LABEL_B: &str = "B: Left/Down";
pub const LABEL_X: &str = "X: Right/Up";
pub const LABEL_Y: &str = "Y: Zoom +/-";

/// Fractional digits needed to tell neighbouring coordinates apart at `zoom`.
pub fn coordinate_decimals(zoom: f64) -> usize {
    let digits = zoom.max(1.0).log10().floor() + 4.0;
    digits.clamp(4.0, 30.0) as usize
}

/// `x1.20` below 1000, `x1.20e5` from there on.
pub fn format_zoom(zoom: f64) -> String {
    if zoom < 1e3 {
        format!("Zoom: x{zoom:.2}")
    } else {
        format!("Zoom: x{zoom:.2e}")
    }
}

pub fn format_coordinate(label: &str, value: DoubleDouble, decimals: usize) -> String {
    format!("{label}: {}", value.to_string_fixed(decimals))
}

/// Lines of the centred status block.
pub fn center_lines(state: &EngineState) -> Vec<String> {
    let viewport = state.viewport();
    let center = viewport.effective_center();
    let decimals = coordinate_decimals(viewport.zoom);

    let mut lines = vec![
        format_coordinate("Re", center.re, decimals),
        format_coordinate("Im", center.im, decimals),
        format_zoom(viewport.zoom),
    ];
    if state.auto_zoom() {
        lines.push("Auto Zoom: ON".to_string());
    }
    lines
}

/// Corner button labels and the centred status block, in white.
pub fn draw_overlay<D: Display>(state: &EngineState, display: &mut D) {
    let w = display.width() as i32;
    let h = display.height() as i32;
    display.set_pen(255, 255, 255);

    let right = |display: &D, text: &str| w - MARGIN - display.measure_text(text, TEXT_SCALE);
    let bottom = h - MARGIN - GLYPH_HEIGHT;

    display.text(LABEL_A, MARGIN, MARGIN, w, TEXT_SCALE);
    let x = right(display, LABEL_X);
    display.text(LABEL_X, x, MARGIN, w, TEXT_SCALE);
    display.text(LABEL_B, MARGIN, bottom, w, TEXT_SCALE);
    let x = right(display, LABEL_Y);
    display.text(LABEL_Y, x, bottom, w, TEXT_SCALE);

    let lines = center_lines(state);
    let line_height = GLYPH_HEIGHT + LINE_SPACING;
    let block_height = lines.len() as i32 * line_height - LINE_SPACING;
    let mut y = (h - block_height) / 2;
    for line in &lines {
        let x = ((w - display.measure_text(line, TEXT_SCALE)) / 2).max(0);
        display.text(line, x, y, w, TEXT_SCALE);
        y += line_height;
    }
}
