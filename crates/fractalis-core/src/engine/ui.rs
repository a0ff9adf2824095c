use std::sync::Arc;

use crate::autozoom::{AutoZoom, AutoZoomSettings, DiveAction};
use crate::device::{Buttons, Display, StatusLed};
use crate::error::{FractalisError, Result};
use crate::input::{InputController, InputEvent, InputSettings};
use crate::led::LedController;
use crate::render::{Palette, RenderReport, Renderer};
use crate::state::EngineState;

/// Tunables for the UI side.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UiSettings {
    pub input: InputSettings,
    pub auto_zoom: AutoZoomSettings,
    pub palette: Palette,
    /// Seed for the auto-zoom jitter; random when unset.
    pub seed: Option<u64>,
}

/// What one UI tick did.
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    pub events: Vec<InputEvent>,
    pub render: RenderReport,
    pub dive: Option<DiveAction>,
}

/// The UI thread's loop body: LED, input, paint, push, auto-zoom.
pub struct UiLoop<D, B, L> {
    state: Arc<EngineState>,
    display: D,
    buttons: B,
    led: L,
    input: InputController,
    led_control: LedController,
    renderer: Renderer,
    auto_zoom: AutoZoom,
    ticks: u64,
}

impl<D: Display, B: Buttons, L: StatusLed> UiLoop<D, B, L> {
    pub fn new(state: Arc<EngineState>, display: D, buttons: B, mut led: L, settings: UiSettings) -> Result<Self> {
        if display.width() != state.width() || display.height() != state.height() {
            return Err(FractalisError::InvalidDimensions {
                width: display.width(),
                height: display.height(),
            });
        }

        let led_control = LedController::new();
        led_control.boot(&mut led);
        let auto_zoom = match settings.seed {
            Some(seed) => AutoZoom::with_seed(settings.auto_zoom, seed),
            None => AutoZoom::new(settings.auto_zoom),
        };

        Ok(Self {
            state,
            display,
            buttons,
            led,
            input: InputController::new(settings.input),
            led_control,
            renderer: Renderer::new(settings.palette),
            auto_zoom,
            ticks: 0,
        })
    }

    pub fn state(&self) -> &Arc<EngineState> {
        &self.state
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn buttons(&self) -> &B {
        &self.buttons
    }

    pub fn buttons_mut(&mut self) -> &mut B {
        &mut self.buttons
    }

    pub fn led(&self) -> &L {
        &self.led
    }

    pub fn auto_zoom(&self) -> &AutoZoom {
        &self.auto_zoom
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// One 16 ms tick. Fails only when the display push fails.
    pub fn tick(&mut self) -> Result<TickReport> {
        let state = &*self.state;
        self.buttons.tick();
        self.led_control.tick(state, &mut self.led);

        let events = self
            .input
            .handle(&self.buttons, state, &mut self.led_control);

        let render = self.renderer.draw(state, &mut self.display);
        self.display.update()?;

        let dive = if state.auto_zoom() && state.is_quiescent() {
            Some(self.auto_zoom.tick(state))
        } else {
            None
        };

        self.ticks += 1;
        Ok(TickReport {
            events,
            render,
            dive,
        })
    }

    pub fn into_parts(self) -> (D, B, L) {
        (self.display, self.buttons, self.led)
    }
}
