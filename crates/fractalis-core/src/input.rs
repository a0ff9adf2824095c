use tracing::debug;

use crate::consts::{LONG_PRESS_DURATION_MS, PAN_CONSTANT, UPDATE_SLEEP_MS, ZOOM_CONSTANT};
use crate::device::{Button, Buttons};
use crate::led::LedController;
use crate::state::{EngineState, RenderPhase};

/// Per-button press tracking.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ButtonState {
    #[default]
    Idle,
    Pressed,
    LongPressed,
    Held,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PressKind {
    /// Released before the long-press threshold.
    Short,
    /// Held past the threshold; fires once while still down.
    Long,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputEvent {
    pub button: Button,
    pub kind: PressKind,
}

/// What a press does to the engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
    ToggleAutoZoom,
    ToggleHideUi,
    Pan { dx: f64, dy: f64 },
    Zoom(f64),
}

/// Tunables for press classification and navigation steps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputSettings {
    /// Ticks a button must stay down, exclusive, before a long press fires.
    pub long_press_ticks: u32,
    pub pan_step: f64,
    pub zoom_step: f64,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            long_press_ticks: long_press_ticks(LONG_PRESS_DURATION_MS, UPDATE_SLEEP_MS),
            pan_step: PAN_CONSTANT,
            zoom_step: ZOOM_CONSTANT,
        }
    }
}

/// Whole ticks in a long-press duration.
pub fn long_press_ticks(duration_ms: u64, tick_ms: u64) -> u32 {
    (duration_ms / tick_ms.max(1)) as u32
}

/// Turns sampled button levels into short and long presses and applies them.
#[derive(Clone, Debug, Default)]
pub struct InputController {
    settings: InputSettings,
    states: [ButtonState; 4],
    held_ticks: [u32; 4],
}

impl InputController {
    pub fn new(settings: InputSettings) -> Self {
        Self {
            settings,
            states: [ButtonState::Idle; 4],
            held_ticks: [0; 4],
        }
    }

    pub fn settings(&self) -> &InputSettings {
        &self.settings
    }

    pub fn button_state(&self, button: Button) -> ButtonState {
        self.states[button.index()]
    }

    /// Sample every button once and classify.
    pub fn poll<B: Buttons + ?Sized>(&mut self, buttons: &B) -> Vec<InputEvent> {
        let mut events = Vec::new();
        for button in Button::ALL {
            if let Some(kind) = self.step(button, buttons.raw(button)) {
                events.push(InputEvent { button, kind });
            }
        }
        events
    }

    fn step(&mut self, button: Button, down: bool) -> Option<PressKind> {
        let i = button.index();
        if down {
            if self.states[i] == ButtonState::Idle {
                self.states[i] = ButtonState::Pressed;
                self.held_ticks[i] = 0;
            }
            self.held_ticks[i] += 1;

            match self.states[i] {
                ButtonState::Pressed if self.held_ticks[i] > self.settings.long_press_ticks => {
                    self.states[i] = ButtonState::LongPressed;
                    Some(PressKind::Long)
                }
                ButtonState::LongPressed => {
                    self.states[i] = ButtonState::Held;
                    None
                }
                _ => None,
            }
        } else {
            let fired = match self.states[i] {
                ButtonState::Pressed => Some(PressKind::Short),
                _ => None,
            };
            self.states[i] = ButtonState::Idle;
            self.held_ticks[i] = 0;
            fired
        }
    }

    pub fn action(&self, event: InputEvent) -> Action {
        let pan = self.settings.pan_step;
        let zoom = self.settings.zoom_step;
        match (event.button, event.kind) {
            (Button::A, PressKind::Short) => Action::ToggleAutoZoom,
            (Button::A, PressKind::Long) => Action::ToggleHideUi,
            (Button::B, PressKind::Short) => Action::Pan { dx: -pan, dy: 0.0 },
            (Button::B, PressKind::Long) => Action::Pan { dx: 0.0, dy: pan },
            (Button::X, PressKind::Short) => Action::Pan { dx: pan, dy: 0.0 },
            (Button::X, PressKind::Long) => Action::Pan { dx: 0.0, dy: -pan },
            (Button::Y, PressKind::Short) => Action::Zoom(zoom),
            (Button::Y, PressKind::Long) => Action::Zoom(-zoom),
        }
    }

    /// Poll, apply every resulting action and set the LED feedback.
    pub fn handle<B: Buttons + ?Sized>(
        &mut self,
        buttons: &B,
        state: &EngineState,
        led: &mut LedController,
    ) -> Vec<InputEvent> {
        let events = self.poll(buttons);
        for event in &events {
            match event.kind {
                PressKind::Short => led.flash_short(),
                PressKind::Long => led.flash_long(),
            }
            let action = self.action(*event);
            debug!(button = %event.button, kind = ?event.kind, ?action, "Button");
            apply(state, action);
        }
        events
    }
}

pub fn apply(state: &EngineState, action: Action) {
    match action {
        Action::ToggleAutoZoom => {
            state.toggle_auto_zoom();
            state.raise_rendering(RenderPhase::Full);
        }
        Action::ToggleHideUi => {
            state.toggle_hide_ui();
            state.raise_rendering(RenderPhase::Full);
        }
        Action::Pan { dx, dy } => state.pan(dx, dy),
        Action::Zoom(factor) => state.zoom(factor),
    }
}
