//! Board peripherals as traits, plus host implementations used by the CLI,
//! the simulator and the tests.

use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use image::{Rgb, RgbImage};

use crate::error::{FractalisError, Result};
use crate::render::palette::hsv_to_rgb;

/// Width of one glyph cell of the overlay font at scale 1.
pub const GLYPH_WIDTH: i32 = 6;
/// Height of one text line at scale 1.
pub const GLYPH_HEIGHT: i32 = 8;

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

/// Pen-based pixel display.
pub trait Display {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn set_pen(&mut self, r: u8, g: u8, b: u8);
    /// Hue, saturation and value, each in `0.0..=1.0`.
    fn set_pen_hsv(&mut self, h: f32, s: f32, v: f32);
    fn pixel(&mut self, x: i32, y: i32);
    /// Width in pixels of `text` drawn at `scale`.
    fn measure_text(&self, text: &str, scale: f32) -> i32;
    /// Draw `text` with its top-left corner at `(x, y)`, wrapping at `wrap` pixels.
    fn text(&mut self, text: &str, x: i32, y: i32, wrap: i32, scale: f32);
    /// Push the frame to the panel.
    fn update(&mut self) -> Result<()>;
}

/// Text drawn during one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: i32,
    pub y: i32,
    pub wrap: i32,
    pub scale: f32,
    pub color: [u8; 3],
}

/// In-memory RGB888 display.
///
/// Pixels persist between frames like a real panel's framebuffer. Text is
/// kept as runs rather than rasterised; the runs drawn before the last
/// `update()` are available from [`FrameBuffer::overlay`].
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    image: RgbImage,
    pen: Rgb<u8>,
    pending_text: Vec<TextRun>,
    presented_text: Vec<TextRun>,
    frames: u64,
    pixels_drawn: u64,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(FractalisError::InvalidDimensions { width, height });
        }
        Ok(Self {
            image: RgbImage::new(width as u32, height as u32),
            pen: Rgb([0, 0, 0]),
            pending_text: Vec::new(),
            presented_text: Vec::new(),
            frames: 0,
            pixels_drawn: 0,
        })
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.image.get_pixel(x, y).0
    }

    /// Text runs of the last pushed frame.
    pub fn overlay(&self) -> &[TextRun] {
        &self.presented_text
    }

    /// Number of `update()` calls so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Total `pixel()` calls that landed on screen.
    pub fn pixels_drawn(&self) -> u64 {
        self.pixels_drawn
    }
}

impl Display for FrameBuffer {
    fn width(&self) -> usize {
        self.image.width() as usize
    }

    fn height(&self) -> usize {
        self.image.height() as usize
    }

    fn set_pen(&mut self, r: u8, g: u8, b: u8) {
        self.pen = Rgb([r, g, b]);
    }

    fn set_pen_hsv(&mut self, h: f32, s: f32, v: f32) {
        self.pen = Rgb(hsv_to_rgb(h, s, v));
    }

    fn pixel(&mut self, x: i32, y: i32) {
        if x < 0 || y < 0 || x >= self.image.width() as i32 || y >= self.image.height() as i32 {
            return;
        }
        self.image.put_pixel(x as u32, y as u32, self.pen);
        self.pixels_drawn += 1;
    }

    fn measure_text(&self, text: &str, scale: f32) -> i32 {
        (text.chars().count() as f32 * GLYPH_WIDTH as f32 * scale).round() as i32
    }

    fn text(&mut self, text: &str, x: i32, y: i32, wrap: i32, scale: f32) {
        self.pending_text.push(TextRun {
            text: text.to_string(),
            x,
            y,
            wrap,
            scale,
            color: self.pen.0,
        });
    }

    fn update(&mut self) -> Result<()> {
        self.presented_text = std::mem::take(&mut self.pending_text);
        self.frames += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Buttons
// ---------------------------------------------------------------------------

/// The four face buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    A,
    B,
    X,
    Y,
}

impl Button {
    pub const ALL: [Button; 4] = [Button::A, Button::B, Button::X, Button::Y];

    pub fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::X => 2,
            Self::Y => 3,
        }
    }
}

impl std::fmt::Display for Button {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
            Self::X => write!(f, "X"),
            Self::Y => write!(f, "Y"),
        }
    }
}

impl FromStr for Button {
    type Err = FractalisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "X" => Ok(Self::X),
            "Y" => Ok(Self::Y),
            other => Err(FractalisError::InvalidConfig(format!("unknown button '{other}'"))),
        }
    }
}

/// Debounced button levels, sampled once per UI tick.
pub trait Buttons {
    /// True while the button is held down.
    fn raw(&self, button: Button) -> bool;

    /// Called once at the start of every UI tick.
    fn tick(&mut self) {}
}

/// One press in a [`ScriptedButtons`] timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScriptedPress {
    pub button: Button,
    /// Tick at which the button goes down.
    pub start: u64,
    /// Ticks the button stays down.
    pub duration: u64,
}

impl ScriptedPress {
    /// A press short enough to count as a tap.
    pub fn short(button: Button, start: u64) -> Self {
        Self {
            button,
            start,
            duration: 2,
        }
    }

    /// A press held past the long-press threshold.
    pub fn long(button: Button, start: u64) -> Self {
        Self {
            button,
            start,
            duration: 20,
        }
    }

    fn is_down(&self, tick: u64) -> bool {
        tick >= self.start && tick < self.start + self.duration
    }
}

impl FromStr for ScriptedPress {
    type Err = FractalisError;

    /// `BUTTON@TICK` for a tap, `BUTTON@TICK:TICKS` for a held press,
    /// `BUTTON@TICK:long` for a long press.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || FractalisError::InvalidConfig(format!("bad press '{s}', expected BUTTON@TICK[:TICKS]"));
        let (button, rest) = s.split_once('@').ok_or_else(invalid)?;
        let button: Button = button.parse()?;
        let (start, duration) = match rest.split_once(':') {
            Some((start, "long")) => (start, None),
            Some((start, ticks)) => (start, Some(ticks.trim().parse::<u64>().map_err(|_| invalid())?)),
            None => (rest, Some(ScriptedPress::short(button, 0).duration)),
        };
        let start: u64 = start.trim().parse().map_err(|_| invalid())?;
        Ok(match duration {
            Some(duration) => Self {
                button,
                start,
                duration,
            },
            None => Self::long(button, start),
        })
    }
}

/// Buttons driven by a fixed timeline of presses.
#[derive(Clone, Debug, Default)]
pub struct ScriptedButtons {
    presses: Vec<ScriptedPress>,
    tick: u64,
    started: bool,
}

impl ScriptedButtons {
    pub fn new(presses: Vec<ScriptedPress>) -> Self {
        Self {
            presses,
            tick: 0,
            started: false,
        }
    }

    pub fn push(&mut self, press: ScriptedPress) {
        self.presses.push(press);
    }

    /// Current tick; the first `tick()` call starts the clock at zero.
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Tick after which no scripted press is active.
    pub fn last_tick(&self) -> u64 {
        self.presses
            .iter()
            .map(|p| p.start + p.duration)
            .max()
            .unwrap_or(0)
    }
}

impl Buttons for ScriptedButtons {
    fn raw(&self, button: Button) -> bool {
        self.presses
            .iter()
            .any(|p| p.button == button && p.is_down(self.tick))
    }

    fn tick(&mut self) {
        if self.started {
            self.tick += 1;
        } else {
            self.started = true;
        }
    }
}

/// Button levels set from another thread, e.g. a GUI event loop.
#[derive(Clone, Debug, Default)]
pub struct SharedButtons {
    levels: Arc<[AtomicBool; 4]>,
}

impl SharedButtons {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, button: Button, down: bool) {
        self.levels[button.index()].store(down, Ordering::Release);
    }

    pub fn press(&self, button: Button) {
        self.set(button, true);
    }

    pub fn release(&self, button: Button) {
        self.set(button, false);
    }

    pub fn release_all(&self) {
        for level in self.levels.iter() {
            level.store(false, Ordering::Release);
        }
    }
}

impl Buttons for SharedButtons {
    fn raw(&self, button: Button) -> bool {
        self.levels[button.index()].load(Ordering::Acquire)
    }
}

// ---------------------------------------------------------------------------
// LED
// ---------------------------------------------------------------------------

pub trait StatusLed {
    fn set_rgb(&mut self, r: u8, g: u8, b: u8);
    fn set_brightness(&mut self, brightness: u8);
}

/// LED that remembers its colour and every change.
#[derive(Clone, Debug, Default)]
pub struct RecordingLed {
    rgb: [u8; 3],
    brightness: u8,
    history: Vec<[u8; 3]>,
}

impl RecordingLed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rgb(&self) -> [u8; 3] {
        self.rgb
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Distinct colours in the order they were shown.
    pub fn history(&self) -> &[[u8; 3]] {
        &self.history
    }
}

impl StatusLed for RecordingLed {
    fn set_rgb(&mut self, r: u8, g: u8, b: u8) {
        let rgb = [r, g, b];
        if self.history.last() != Some(&rgb) {
            self.history.push(rgb);
        }
        self.rgb = rgb;
    }

    fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }
}
