#[allow(dead_code)]
mod common;

use fractalis_core::device::{Display, FrameBuffer};
use fractalis_core::render::overlay::{
    center_lines, coordinate_decimals, format_zoom, LABEL_A, LABEL_B, LABEL_X, LABEL_Y,
};
use fractalis_core::render::{hsv_to_rgb, Palette, Region, Renderer};
use fractalis_core::state::{CalcPhase, PanDirection, PixelState, RenderPhase};

use common::{fill_grid, make_quiescent, make_state};

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

#[test]
fn test_hsv_primaries() {
    assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), [255, 0, 0]);
    assert_eq!(hsv_to_rgb(1.0 / 3.0, 1.0, 1.0), [0, 255, 0]);
    assert_eq!(hsv_to_rgb(2.0 / 3.0, 1.0, 1.0), [0, 0, 255]);
    assert_eq!(hsv_to_rgb(0.0, 0.0, 0.5), [128, 128, 128]);
    assert_eq!(hsv_to_rgb(0.5, 1.0, 0.0), [0, 0, 0]);
}

#[test]
fn test_bounded_pixels_are_black() {
    let palette = Palette::default();
    let bounded = PixelState::finished(100, 1.0);
    assert_eq!(palette.shade(bounded, 100), None);
    assert_eq!(palette.rgb(bounded, 100), [0, 0, 0]);

    let escaped = PixelState::finished(12, 12.4);
    let (h, s, v) = palette.shade(escaped, 100).unwrap();
    assert!((0.0..1.0).contains(&h));
    assert_eq!(s, 1.0);
    assert_eq!(v, 1.0);
    assert_ne!(palette.rgb(escaped, 100), [0, 0, 0]);
}

#[test]
fn test_first_escape_is_dark() {
    let palette = Palette::default();
    let (h, s, v) = palette.hsv(0.0);
    assert!((h - palette.start_hue).abs() < 1e-6);
    assert_eq!(s, 0.0);
    assert_eq!(v, 0.0);
}

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

#[test]
fn test_strip_regions() {
    let (w, h) = (30, 20);
    assert_eq!(Region::strip(PanDirection::Right, 2, w, h), Region { x0: 28, y0: 0, x1: 30, y1: 20 });
    assert_eq!(Region::strip(PanDirection::Left, 2, w, h), Region { x0: 0, y0: 0, x1: 2, y1: 20 });
    assert_eq!(Region::strip(PanDirection::Up, 3, w, h), Region { x0: 0, y0: 0, x1: 30, y1: 3 });
    assert_eq!(Region::strip(PanDirection::Down, 3, w, h), Region { x0: 0, y0: 17, x1: 30, y1: 20 });
    assert_eq!(Region::strip(PanDirection::None, 3, w, h), Region::full(w, h));
    assert_eq!(Region::strip(PanDirection::Right, 99, w, h).area(), 600);
}

#[test]
fn test_around_center_clips_to_screen() {
    let region = Region::around_center(2, 10, 10);
    assert_eq!(region, Region { x0: 3, y0: 3, x1: 8, y1: 8 });
    assert_eq!(Region::around_center(50, 10, 6), Region::full(10, 6));
    let none = Region::full(10, 10).intersect(&Region { x0: 20, y0: 20, x1: 30, y1: 30 });
    assert_eq!(none.area(), 0);
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

#[test]
fn test_idle_render_steps_down() {
    let state = make_state(10, 10);
    fill_grid(&state, |x, _| x as u32);
    state.set_calculating(CalcPhase::Idle);
    let mut display = FrameBuffer::new(10, 10).unwrap();
    let mut renderer = Renderer::default();

    let report = renderer.render(&state, &mut display);
    assert_eq!(report.pixels_painted, 100);
    assert_eq!(report.phase, Some(RenderPhase::Full));
    assert_eq!(state.rendering(), RenderPhase::Strip);

    let report = renderer.render(&state, &mut display);
    assert_eq!(report.pixels_painted, 100);
    assert_eq!(state.rendering(), RenderPhase::Done);

    let report = renderer.render(&state, &mut display);
    assert_eq!(report.pixels_painted, 0);
    assert_eq!(report.phase, None);
}

#[test]
fn test_paints_palette_colours() {
    let state = make_state(10, 10);
    fill_grid(&state, |x, _| if x < 5 { 3 } else { 1_000 });
    state.set_calculating(CalcPhase::Idle);
    state.set_iteration_limit(1_000);
    let mut display = FrameBuffer::new(10, 10).unwrap();
    Renderer::default().render(&state, &mut display);

    let expected = Palette::default().rgb(state.grid().get(2, 2), 1_000);
    assert_eq!(display.get_pixel(2, 2), expected);
    assert_ne!(expected, [0, 0, 0]);
    assert_eq!(display.get_pixel(7, 2), [0, 0, 0]);
}

#[test]
fn test_incomplete_pixels_are_left_alone() {
    let state = make_state(10, 10);
    fill_grid(&state, |_, _| 3);
    state.grid().clear(0, 0);
    state.grid().reset_complete(9, 9, 9, 9);
    state.set_calculating(CalcPhase::Idle);

    let mut display = FrameBuffer::new(10, 10).unwrap();
    display.set_pen(1, 2, 3);
    display.pixel(0, 0);
    let report = Renderer::default().render(&state, &mut display);

    assert_eq!(report.pixels_painted, 98);
    assert_eq!(display.get_pixel(0, 0), [1, 2, 3]);
}

#[test]
fn test_progressive_paint_follows_scanner() {
    let state = make_state(10, 10);
    fill_grid(&state, |_, _| 3);
    state.set_calculating(CalcPhase::Fine);
    let mut display = FrameBuffer::new(10, 10).unwrap();
    let mut renderer = Renderer::default();

    // First tick of a generation repaints everything already there.
    assert_eq!(renderer.render(&state, &mut display).pixels_painted, 100);

    state.set_last_updated_radius(2);
    assert_eq!(renderer.render(&state, &mut display).pixels_painted, 25);
    assert_eq!(state.rendering(), RenderPhase::Full);

    // A new generation widens the paint again.
    state.bump_calculation_id();
    assert_eq!(renderer.render(&state, &mut display).pixels_painted, 100);
}

#[test]
fn test_strip_after_pan() {
    let state = make_state(30, 20);
    fill_grid(&state, |_, _| 3);
    make_quiescent(&state);

    state.pan(0.2, 0.0);
    assert_eq!(state.last_pan_pixels(), 2);
    fill_grid(&state, |_, _| 4);
    state.set_calculating(CalcPhase::Idle);

    let mut display = FrameBuffer::new(30, 20).unwrap();
    let mut renderer = Renderer::default();
    assert_eq!(renderer.render(&state, &mut display).pixels_painted, 600);
    assert_eq!(state.rendering(), RenderPhase::Strip);

    assert_eq!(renderer.render(&state, &mut display).pixels_painted, 40);
    assert_eq!(state.rendering(), RenderPhase::Done);
    assert_eq!(state.last_pan_direction(), PanDirection::None);
}

// ---------------------------------------------------------------------------
// Overlay
// ---------------------------------------------------------------------------

#[test]
fn test_overlay_labels_and_status() {
    let state = make_state(240, 135);
    let mut display = FrameBuffer::new(240, 135).unwrap();
    Renderer::default().draw(&state, &mut display);
    display.update().unwrap();

    let runs = display.overlay();
    let find = |text: &str| runs.iter().find(|r| r.text == text).cloned();

    let a = find(LABEL_A).unwrap();
    assert_eq!((a.x, a.y), (2, 2));
    assert_eq!(a.color, [255, 255, 255]);
    let x = find(LABEL_X).unwrap();
    assert_eq!(x.x + display.measure_text(LABEL_X, 1.0), 238);
    assert!(find(LABEL_B).unwrap().y > 100);
    assert!(find(LABEL_Y).is_some());

    assert!(find("Re: -0.5000").is_some());
    assert!(find("Im: 0.0000").is_some());
    assert!(find("Zoom: x1.00").is_some());
    assert!(find("Auto Zoom: ON").is_none());
}

#[test]
fn test_hidden_overlay_draws_no_text() {
    let state = make_state(40, 30);
    state.toggle_hide_ui();
    let mut display = FrameBuffer::new(40, 30).unwrap();
    Renderer::default().draw(&state, &mut display);
    display.update().unwrap();
    assert!(display.overlay().is_empty());
}

#[test]
fn test_auto_zoom_line() {
    let state = make_state(40, 30);
    state.set_auto_zoom(true);
    let lines = center_lines(&state);
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[3], "Auto Zoom: ON");
}

#[test]
fn test_zoom_and_coordinate_formatting() {
    assert_eq!(format_zoom(1.2), "Zoom: x1.20");
    assert_eq!(format_zoom(12_345.0), "Zoom: x1.23e4");
    assert_eq!(coordinate_decimals(0.5), 4);
    assert_eq!(coordinate_decimals(2e6), 10);
    assert_eq!(coordinate_decimals(1e40), 30);

    let state = make_state(40, 30);
    state.zoom(2e6 - 1.0);
    let lines = center_lines(&state);
    assert_eq!(lines[0], "Re: -0.5000000000");
}
