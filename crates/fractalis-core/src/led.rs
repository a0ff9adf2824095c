use crate::consts::DEFAULT_LED_BRIGHTNESS;
use crate::device::StatusLed;
use crate::state::{CalcPhase, EngineState};

pub const COARSE_COLOR: [u8; 3] = [255, 69, 0];
pub const FINE_COLOR: [u8; 3] = [255, 191, 0];
pub const IDLE_COLOR: [u8; 3] = [0, 255, 0];
pub const AUTO_ZOOM_IDLE_COLOR: [u8; 3] = [0, 255, 128];
pub const SHORT_PRESS_COLOR: [u8; 3] = [0, 0, 255];
pub const LONG_PRESS_COLOR: [u8; 3] = [255, 0, 255];

pub const SHORT_PRESS_TICKS: u32 = 3;
pub const LONG_PRESS_TICKS: u32 = 7;

/// Colour for the engine's current phase.
pub fn status_color(state: &EngineState) -> [u8; 3] {
    match state.calculating() {
        CalcPhase::Coarse => COARSE_COLOR,
        CalcPhase::Fine => FINE_COLOR,
        CalcPhase::Idle if state.auto_zoom() => AUTO_ZOOM_IDLE_COLOR,
        CalcPhase::Idle => IDLE_COLOR,
    }
}

/// Drives the status LED; button feedback temporarily overrides the status.
#[derive(Clone, Debug, Default)]
pub struct LedController {
    feedback: Option<([u8; 3], u32)>,
}

impl LedController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial brightness, as at board start-up.
    pub fn boot<L: StatusLed + ?Sized>(&self, led: &mut L) {
        led.set_brightness(DEFAULT_LED_BRIGHTNESS);
    }

    pub fn flash_short(&mut self) {
        self.feedback = Some((SHORT_PRESS_COLOR, SHORT_PRESS_TICKS));
    }

    pub fn flash_long(&mut self) {
        self.feedback = Some((LONG_PRESS_COLOR, LONG_PRESS_TICKS));
    }

    pub fn feedback_active(&self) -> bool {
        self.feedback.is_some()
    }

    /// Show feedback if any is pending, otherwise the status colour.
    pub fn tick<L: StatusLed + ?Sized>(&mut self, state: &EngineState, led: &mut L) {
        let color = match self.feedback.take() {
            Some((color, ticks)) => {
                if ticks > 1 {
                    self.feedback = Some((color, ticks - 1));
                }
                color
            }
            None => status_color(state),
        };
        led.set_rgb(color[0], color[1], color[2]);
    }
}
