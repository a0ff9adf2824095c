use num_complex::Complex;

use crate::scalar::DoubleDouble;

/// Width of the complex-plane window at zoom 1.
pub const VIEW_WIDTH: f64 = 3.0;
/// Height of the complex-plane window at zoom 1.
pub const VIEW_HEIGHT: f64 = 2.0;

/// Plain copy of the viewport, taken once per pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportSnapshot {
    pub center: Complex<DoubleDouble>,
    pub pan: Complex<DoubleDouble>,
    pub zoom: f64,
}

impl Default for ViewportSnapshot {
    fn default() -> Self {
        Self {
            center: Complex::new(DoubleDouble::from_f64(-0.5), DoubleDouble::ZERO),
            pan: Complex::new(DoubleDouble::ZERO, DoubleDouble::ZERO),
            zoom: 1.0,
        }
    }
}

impl ViewportSnapshot {
    pub fn new(center: Complex<DoubleDouble>, zoom: f64) -> Self {
        Self {
            center,
            pan: Complex::new(DoubleDouble::ZERO, DoubleDouble::ZERO),
            zoom,
        }
    }

    /// `center + pan`, the point shown at the middle of the screen.
    pub fn effective_center(&self) -> Complex<DoubleDouble> {
        self.center + self.pan
    }

    /// Map a pixel to its point in the complex plane, in extended precision.
    pub fn pixel_to_point(&self, x: usize, y: usize, width: usize, height: usize) -> Complex<DoubleDouble> {
        let (dx, dy) = self.pixel_offset(x, y, width, height);
        let origin = self.effective_center();
        Complex::new(origin.re + dx, origin.im + dy)
    }

    /// Map a pixel to its point in the complex plane, rounded to native doubles.
    pub fn pixel_to_point_f64(&self, x: usize, y: usize, width: usize, height: usize) -> Complex<f64> {
        let (dx, dy) = self.pixel_offset(x, y, width, height);
        let origin = self.effective_center();
        Complex::new(origin.re.to_f64() + dx, origin.im.to_f64() + dy)
    }

    /// Offset from the effective centre, `(x/W - 1/2) * 3/zoom` and
    /// `(y/H - 1/2) * 2/zoom`.
    fn pixel_offset(&self, x: usize, y: usize, width: usize, height: usize) -> (f64, f64) {
        let fx = x as f64 / width as f64 - 0.5;
        let fy = y as f64 / height as f64 - 0.5;
        (fx * VIEW_WIDTH / self.zoom, fy * VIEW_HEIGHT / self.zoom)
    }
}

/// Last pan classification, used to pick the strip to repaint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum PanDirection {
    #[default]
    None = 0,
    Up = 1,
    Down = 2,
    Left = 3,
    Right = 4,
}

impl PanDirection {
    /// Classify a pan request. Vertical movement wins when both axes move.
    pub fn classify(dx: f64, dy: f64) -> Self {
        if dy > 0.0 {
            Self::Down
        } else if dy < 0.0 {
            Self::Up
        } else if dx > 0.0 {
            Self::Right
        } else if dx < 0.0 {
            Self::Left
        } else {
            Self::None
        }
    }

    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Up,
            2 => Self::Down,
            3 => Self::Left,
            4 => Self::Right,
            _ => Self::None,
        }
    }
}

impl std::fmt::Display for PanDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Up => write!(f, "Up"),
            Self::Down => write!(f, "Down"),
            Self::Left => write!(f, "Left"),
            Self::Right => write!(f, "Right"),
        }
    }
}

/// Compute pass in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum CalcPhase {
    Idle = 0,
    Fine = 1,
    Coarse = 2,
}

impl CalcPhase {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Idle,
            1 => Self::Fine,
            _ => Self::Coarse,
        }
    }
}

impl std::fmt::Display for CalcPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Fine => write!(f, "Fine pass"),
            Self::Coarse => write!(f, "Coarse pass"),
        }
    }
}

/// Repaint work outstanding for the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum RenderPhase {
    Done = 0,
    /// Reserved for an anti-aliasing pass; never entered.
    AntiAlias = 1,
    Strip = 2,
    Full = 3,
}

impl RenderPhase {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Done,
            1 => Self::AntiAlias,
            2 => Self::Strip,
            _ => Self::Full,
        }
    }
}

impl std::fmt::Display for RenderPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Done => write!(f, "Done"),
            Self::AntiAlias => write!(f, "Anti-alias"),
            Self::Strip => write!(f, "Strip"),
            Self::Full => write!(f, "Full"),
        }
    }
}
