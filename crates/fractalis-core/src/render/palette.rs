use crate::consts::{SATURATION_THRESHOLD, START_HUE, VALUE_THRESHOLD};
use crate::state::PixelState;

/// Maps smooth escape counts onto an HSV ramp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub start_hue: f32,
    pub saturation_threshold: f32,
    pub value_threshold: f32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            start_hue: START_HUE,
            saturation_threshold: SATURATION_THRESHOLD,
            value_threshold: VALUE_THRESHOLD,
        }
    }
}

impl Palette {
    /// HSV triple for an escaped pixel with the given smooth count.
    pub fn hsv(&self, smooth: f32) -> (f32, f32, f32) {
        let r = (1.0 + smooth.max(0.0)).ln() / 2.0;
        let hue = (self.start_hue + r).fract();
        let sat = (r / self.saturation_threshold).min(1.0);
        let val = (r / self.value_threshold).min(1.0);
        (hue, sat, val)
    }

    /// `None` for bounded pixels, which are painted black.
    pub fn shade(&self, pixel: PixelState, limit: u32) -> Option<(f32, f32, f32)> {
        if pixel.iteration >= limit {
            None
        } else {
            Some(self.hsv(pixel.smooth))
        }
    }

    pub fn rgb(&self, pixel: PixelState, limit: u32) -> [u8; 3] {
        match self.shade(pixel, limit) {
            Some((h, s, v)) => hsv_to_rgb(h, s, v),
            None => [0, 0, 0],
        }
    }
}

/// Standard six-sector HSV to RGB conversion, inputs in `0.0..=1.0`.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [u8; 3] {
    let s = s.clamp(0.0, 1.0);
    let v = v.clamp(0.0, 1.0);
    let h = h.rem_euclid(1.0) * 6.0;
    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    let (r, g, b) = match sector as u32 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    let to_byte = |c: f32| (c * 255.0).round().clamp(0.0, 255.0) as u8;
    [to_byte(r), to_byte(g), to_byte(b)]
}
