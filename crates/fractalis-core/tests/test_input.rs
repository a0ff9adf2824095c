#[allow(dead_code)]
mod common;

use fractalis_core::device::{
    Button, Buttons, RecordingLed, ScriptedButtons, ScriptedPress, SharedButtons, StatusLed,
};
use fractalis_core::input::{
    apply, long_press_ticks, Action, ButtonState, InputController, InputEvent, InputSettings,
    PressKind,
};
use fractalis_core::led::{
    status_color, LedController, AUTO_ZOOM_IDLE_COLOR, COARSE_COLOR, FINE_COLOR, IDLE_COLOR,
    LONG_PRESS_COLOR, SHORT_PRESS_COLOR,
};
use fractalis_core::state::{CalcPhase, RenderPhase};

use common::{make_quiescent, make_state};

/// Run the controller over a script and collect `(tick, event)` pairs.
fn drive(presses: Vec<ScriptedPress>, ticks: u64) -> Vec<(u64, InputEvent)> {
    let mut buttons = ScriptedButtons::new(presses);
    let mut controller = InputController::default();
    let mut seen = Vec::new();
    for _ in 0..ticks {
        buttons.tick();
        for event in controller.poll(&buttons) {
            seen.push((buttons.current_tick(), event));
        }
    }
    seen
}

// ---------------------------------------------------------------------------
// Press classification
// ---------------------------------------------------------------------------

#[test]
fn test_default_long_press_threshold() {
    assert_eq!(long_press_ticks(150, 16), 9);
    assert_eq!(InputSettings::default().long_press_ticks, 9);
    assert_eq!(long_press_ticks(100, 0), 100);
}

#[test]
fn test_short_press_fires_on_release() {
    let events = drive(vec![ScriptedPress::short(Button::Y, 0)], 5);
    assert_eq!(
        events,
        vec![(
            2,
            InputEvent {
                button: Button::Y,
                kind: PressKind::Short
            }
        )]
    );
}

#[test]
fn test_long_press_fires_once_while_held() {
    let events = drive(vec![ScriptedPress::long(Button::B, 0)], 30);
    assert_eq!(
        events,
        vec![(
            9,
            InputEvent {
                button: Button::B,
                kind: PressKind::Long
            }
        )]
    );
}

#[test]
fn test_press_at_threshold_is_still_short() {
    let events = drive(
        vec![ScriptedPress {
            button: Button::X,
            start: 0,
            duration: 9,
        }],
        12,
    );
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].1.kind, PressKind::Short);
}

#[test]
fn test_state_sequence() {
    let mut controller = InputController::default();
    let buttons = SharedButtons::new();
    assert_eq!(controller.button_state(Button::A), ButtonState::Idle);

    buttons.press(Button::A);
    controller.poll(&buttons);
    assert_eq!(controller.button_state(Button::A), ButtonState::Pressed);

    for _ in 0..9 {
        controller.poll(&buttons);
    }
    assert_eq!(controller.button_state(Button::A), ButtonState::LongPressed);
    controller.poll(&buttons);
    assert_eq!(controller.button_state(Button::A), ButtonState::Held);

    buttons.release(Button::A);
    assert!(controller.poll(&buttons).is_empty());
    assert_eq!(controller.button_state(Button::A), ButtonState::Idle);
}

#[test]
fn test_simultaneous_buttons() {
    let events = drive(
        vec![ScriptedPress::short(Button::A, 0), ScriptedPress::short(Button::X, 0)],
        4,
    );
    let buttons: Vec<Button> = events.iter().map(|(_, e)| e.button).collect();
    assert_eq!(buttons, vec![Button::A, Button::X]);
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

#[test]
fn test_button_map() {
    let controller = InputController::default();
    let act = |button, kind| controller.action(InputEvent { button, kind });

    assert_eq!(act(Button::A, PressKind::Short), Action::ToggleAutoZoom);
    assert_eq!(act(Button::A, PressKind::Long), Action::ToggleHideUi);
    assert_eq!(act(Button::B, PressKind::Short), Action::Pan { dx: -0.2, dy: 0.0 });
    assert_eq!(act(Button::B, PressKind::Long), Action::Pan { dx: 0.0, dy: 0.2 });
    assert_eq!(act(Button::X, PressKind::Short), Action::Pan { dx: 0.2, dy: 0.0 });
    assert_eq!(act(Button::X, PressKind::Long), Action::Pan { dx: 0.0, dy: -0.2 });
    assert_eq!(act(Button::Y, PressKind::Short), Action::Zoom(0.2));
    assert_eq!(act(Button::Y, PressKind::Long), Action::Zoom(-0.2));
}

#[test]
fn test_toggles_request_repaint() {
    let state = make_state(20, 10);
    make_quiescent(&state);

    apply(&state, Action::ToggleAutoZoom);
    assert!(state.auto_zoom());
    assert_eq!(state.rendering(), RenderPhase::Full);
    assert_eq!(state.calculating(), CalcPhase::Idle);

    state.set_rendering(RenderPhase::Done);
    apply(&state, Action::ToggleHideUi);
    assert!(state.hide_ui());
    assert_eq!(state.rendering(), RenderPhase::Full);

    apply(&state, Action::ToggleAutoZoom);
    assert!(!state.auto_zoom());
}

#[test]
fn test_handle_applies_and_flashes() {
    let state = make_state(30, 20);
    make_quiescent(&state);
    let mut controller = InputController::default();
    let mut led_control = LedController::new();
    let buttons = SharedButtons::new();

    buttons.press(Button::Y);
    controller.handle(&buttons, &state, &mut led_control);
    buttons.release(Button::Y);
    let events = controller.handle(&buttons, &state, &mut led_control);

    assert_eq!(events.len(), 1);
    assert!((state.zoom_level() - 1.2).abs() < 1e-12);
    assert_eq!(state.calculating(), CalcPhase::Coarse);
    assert!(led_control.feedback_active());
}

// ---------------------------------------------------------------------------
// LED
// ---------------------------------------------------------------------------

#[test]
fn test_status_colours() {
    let state = make_state(10, 10);
    assert_eq!(status_color(&state), COARSE_COLOR);
    state.set_calculating(CalcPhase::Fine);
    assert_eq!(status_color(&state), FINE_COLOR);
    state.set_calculating(CalcPhase::Idle);
    assert_eq!(status_color(&state), IDLE_COLOR);
    state.set_auto_zoom(true);
    assert_eq!(status_color(&state), AUTO_ZOOM_IDLE_COLOR);
}

#[test]
fn test_flash_overrides_status_for_a_few_ticks() {
    let state = make_state(10, 10);
    state.set_calculating(CalcPhase::Idle);
    let mut control = LedController::new();
    let mut led = RecordingLed::new();

    control.boot(&mut led);
    assert_eq!(led.brightness(), 50);

    control.flash_short();
    for _ in 0..3 {
        control.tick(&state, &mut led);
        assert_eq!(led.rgb(), SHORT_PRESS_COLOR);
    }
    control.tick(&state, &mut led);
    assert_eq!(led.rgb(), IDLE_COLOR);

    control.flash_long();
    for _ in 0..7 {
        control.tick(&state, &mut led);
    }
    assert_eq!(led.rgb(), LONG_PRESS_COLOR);
    control.tick(&state, &mut led);
    assert!(!control.feedback_active());
    assert_eq!(
        led.history(),
        &[SHORT_PRESS_COLOR, IDLE_COLOR, LONG_PRESS_COLOR, IDLE_COLOR]
    );
}

#[test]
fn test_recording_led_collapses_repeats() {
    let mut led = RecordingLed::new();
    led.set_rgb(1, 1, 1);
    led.set_rgb(1, 1, 1);
    led.set_rgb(2, 2, 2);
    assert_eq!(led.history().len(), 2);
}

// ---------------------------------------------------------------------------
// Button sources
// ---------------------------------------------------------------------------

#[test]
fn test_scripted_press_parsing() {
    assert_eq!("A@5".parse::<ScriptedPress>().unwrap(), ScriptedPress::short(Button::A, 5));
    assert_eq!(
        "x@3:7".parse::<ScriptedPress>().unwrap(),
        ScriptedPress {
            button: Button::X,
            start: 3,
            duration: 7
        }
    );
    assert_eq!("Y@0:long".parse::<ScriptedPress>().unwrap(), ScriptedPress::long(Button::Y, 0));
    for bad in ["Q@1", "A5", "A@x", "B@1:soon"] {
        assert!(bad.parse::<ScriptedPress>().is_err(), "{bad}");
    }
}

#[test]
fn test_scripted_timeline() {
    let mut buttons = ScriptedButtons::new(vec![ScriptedPress::short(Button::B, 1)]);
    assert_eq!(buttons.last_tick(), 3);
    buttons.tick();
    assert_eq!(buttons.current_tick(), 0);
    assert!(!buttons.raw(Button::B));
    buttons.tick();
    assert!(buttons.raw(Button::B));
    buttons.tick();
    buttons.tick();
    assert!(!buttons.raw(Button::B));
}

#[test]
fn test_shared_buttons_across_clones() {
    let source = SharedButtons::new();
    let reader = source.clone();
    source.press(Button::X);
    source.press(Button::Y);
    assert!(reader.raw(Button::X));
    assert!(!reader.raw(Button::A));
    source.release_all();
    assert!(!reader.raw(Button::Y));
}
