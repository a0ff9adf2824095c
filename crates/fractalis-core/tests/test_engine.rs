#[allow(dead_code)]
mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use num_complex::Complex;

use fractalis_core::device::{
    Button, Display, FrameBuffer, RecordingLed, ScriptedButtons, ScriptedPress,
};
use fractalis_core::engine::caps::coarse_divider;
use fractalis_core::engine::{IterationCaps, StepOutcome, UiLoop, UiSettings};
use fractalis_core::error::{FractalisError, Result};
use fractalis_core::kernel::Precision;
use fractalis_core::scalar::DoubleDouble;
use fractalis_core::state::{CalcPhase, EngineState, RenderPhase, ViewportSnapshot};

use common::{make_state, make_worker, run_to_idle};

fn state_at(width: usize, height: usize, re: f64, zoom: f64) -> Arc<EngineState> {
    let viewport = ViewportSnapshot::new(Complex::new(DoubleDouble::from(re), DoubleDouble::ZERO), zoom);
    Arc::new(EngineState::with_viewport(width, height, viewport).unwrap())
}

/// Display whose panel push always fails.
struct FailingDisplay;

impl Display for FailingDisplay {
    fn width(&self) -> usize {
        8
    }
    fn height(&self) -> usize {
        8
    }
    fn set_pen(&mut self, _r: u8, _g: u8, _b: u8) {}
    fn set_pen_hsv(&mut self, _h: f32, _s: f32, _v: f32) {}
    fn pixel(&mut self, _x: i32, _y: i32) {}
    fn measure_text(&self, text: &str, _scale: f32) -> i32 {
        text.len() as i32
    }
    fn text(&mut self, _text: &str, _x: i32, _y: i32, _wrap: i32, _scale: f32) {}
    fn update(&mut self) -> Result<()> {
        Err(FractalisError::Display("panel disconnected".into()))
    }
}

// ---------------------------------------------------------------------------
// Iteration caps
// ---------------------------------------------------------------------------

#[test]
fn test_caps_at_cold_start() {
    let caps = IterationCaps::for_zoom(240, 1.0);
    assert_eq!(caps, IterationCaps { fine: 111, coarse: 18 });
}

#[test]
fn test_caps_are_clamped() {
    assert_eq!(IterationCaps::for_zoom(240, 0.001), IterationCaps { fine: 25, coarse: 4 });
    assert_eq!(IterationCaps::for_zoom(240, 1e80), IterationCaps { fine: 10_000, coarse: 2_500 });
    assert_eq!(IterationCaps::with_bounds(240, 1.0, 200, 300).fine, 200);
}

#[test]
fn test_coarse_divider_steps() {
    assert_eq!(coarse_divider(1.0), 6);
    assert_eq!(coarse_divider(1e4), 6);
    assert_eq!(coarse_divider(1e5), 5);
    assert_eq!(coarse_divider(2e5), 4);
}

// ---------------------------------------------------------------------------
// Compute worker
// ---------------------------------------------------------------------------

#[test]
fn test_cold_start_runs_coarse_then_fine() {
    let state = make_state(24, 16);
    let worker = make_worker(&state);
    let caps = IterationCaps::for_zoom(24, 1.0);

    let outcomes = run_to_idle(&worker);
    assert_eq!(
        outcomes,
        vec![
            StepOutcome::Completed {
                phase: CalcPhase::Coarse,
                limit: caps.coarse,
                precision: Precision::Native,
            },
            StepOutcome::Completed {
                phase: CalcPhase::Fine,
                limit: caps.fine,
                precision: Precision::Native,
            },
        ]
    );

    assert_eq!(state.calculating(), CalcPhase::Idle);
    assert_eq!(state.rendering(), RenderPhase::Full);
    assert_eq!(state.iteration_limit(), caps.fine);
    assert_eq!(state.grid().complete_count(), 24 * 16);
    assert_eq!(state.last_updated_radius(), 12);

    let centre = state.grid().get(12, 8);
    assert_eq!(centre.iteration, caps.fine);
    assert_eq!(centre.smooth, 1.0);
    assert!(state.grid().get(0, 0).iteration < caps.fine);
}

#[test]
fn test_deep_zoom_skips_coarse_pass() {
    let state = state_at(24, 16, -0.5, 2e6);
    let worker = make_worker(&state);
    let outcomes = run_to_idle(&worker);

    assert_eq!(outcomes.len(), 1);
    assert!(matches!(
        outcomes[0],
        StepOutcome::Completed { phase: CalcPhase::Fine, .. }
    ));
    assert!(state.skip_pre_render());
}

#[test]
fn test_auto_zoom_skips_coarse_pass() {
    let state = make_state(24, 16);
    state.set_auto_zoom(true);
    let outcomes = run_to_idle(&make_worker(&state));
    assert_eq!(outcomes.len(), 1);
    assert!(state.skip_pre_render());
}

#[test]
fn test_extended_precision_past_threshold() {
    let state = state_at(16, 8, -0.5, 1e15);
    let outcomes = run_to_idle(&make_worker(&state));
    assert!(matches!(
        outcomes[0],
        StepOutcome::Completed {
            precision: Precision::Extended,
            ..
        }
    ));
}

#[test]
fn test_idle_worker_does_nothing() {
    let state = make_state(8, 8);
    state.set_calculating(CalcPhase::Idle);
    assert_eq!(make_worker(&state).step(), StepOutcome::Idle);
    assert_eq!(state.grid().complete_count(), 0);
}

#[test]
fn test_spawned_worker_settles_and_stops() {
    let state = make_state(32, 24);
    let handle = make_worker(&state).spawn().unwrap();
    assert!(handle.is_running());

    let deadline = Instant::now() + Duration::from_secs(20);
    while state.calculating() != CalcPhase::Idle {
        assert!(Instant::now() < deadline, "worker never settled");
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(state.grid().complete_count(), 32 * 24);
    handle.stop().unwrap();
}

// ---------------------------------------------------------------------------
// UI loop
// ---------------------------------------------------------------------------

#[test]
fn test_ui_rejects_mismatched_display() {
    let state = make_state(10, 10);
    let result = UiLoop::new(
        state,
        FrameBuffer::new(12, 10).unwrap(),
        ScriptedButtons::default(),
        RecordingLed::new(),
        UiSettings::default(),
    );
    assert!(matches!(
        result,
        Err(FractalisError::InvalidDimensions { width: 12, height: 10 })
    ));
}

#[test]
fn test_ui_propagates_display_failure() {
    let state = make_state(8, 8);
    let mut ui = UiLoop::new(
        state,
        FailingDisplay,
        ScriptedButtons::default(),
        RecordingLed::new(),
        UiSettings::default(),
    )
    .unwrap();
    assert!(matches!(ui.tick(), Err(FractalisError::Display(_))));
}

#[test]
fn test_ui_tick_applies_presses_and_paints() {
    let state = make_state(24, 16);
    let worker = make_worker(&state);
    let mut ui = UiLoop::new(
        state.clone(),
        FrameBuffer::new(24, 16).unwrap(),
        ScriptedButtons::new(vec![ScriptedPress::short(Button::Y, 0)]),
        RecordingLed::new(),
        UiSettings::default(),
    )
    .unwrap();
    assert_eq!(ui.led().brightness(), 50);

    let mut pressed_at = None;
    for tick in 0..10 {
        let report = ui.tick().unwrap();
        if !report.events.is_empty() {
            pressed_at = Some(tick);
        }
        run_to_idle(&worker);
    }

    assert_eq!(pressed_at, Some(2));
    assert!((state.zoom_level() - 1.2).abs() < 1e-12);
    assert_eq!(state.rendering(), RenderPhase::Done);
    assert_eq!(ui.ticks(), 10);

    let (display, _, led) = ui.into_parts();
    assert_eq!(display.get_pixel(12, 8), [0, 0, 0]);
    assert!(display.pixels_drawn() > 0);
    assert!(!led.history().is_empty());
}
