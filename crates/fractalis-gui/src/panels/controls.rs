use fractalis_core::device::Button;

use crate::app::SimulatorApp;
use crate::panels::section_header;

const RIGHT_PANEL_WIDTH: f32 = 220.0;
const BUTTON_SIZE: f32 = 44.0;

/// Face buttons with what a short and a long press do.
const BUTTONS: [(Button, &str, &str); 4] = [
    (Button::A, "Auto-zoom", "Hide UI"),
    (Button::B, "Pan left", "Pan down"),
    (Button::X, "Pan right", "Pan up"),
    (Button::Y, "Zoom in", "Zoom out"),
];

pub fn show(ctx: &egui::Context, app: &mut SimulatorApp) {
    egui::SidePanel::right("controls")
        .default_width(RIGHT_PANEL_WIDTH)
        .resizable(false)
        .show(ctx, |ui| {
            buttons_section(ui, app);
            ui.separator();
            led_section(ui, app);
            ui.separator();
            engine_section(ui, app);
        });
}

fn buttons_section(ui: &mut egui::Ui, app: &mut SimulatorApp) {
    section_header(ui, "Buttons", Some("hold to long-press"));
    ui.add_space(4.0);

    egui::Grid::new("buttons")
        .num_columns(2)
        .spacing([8.0, 6.0])
        .show(ui, |ui| {
            for (button, short, long) in BUTTONS {
                let response = ui.add_sized(
                    [BUTTON_SIZE, BUTTON_SIZE],
                    egui::Button::new(egui::RichText::new(button.to_string()).size(20.0).strong()),
                );
                app.held[button.index()] = response.is_pointer_button_down_on();
                ui.vertical(|ui| {
                    ui.label(short);
                    ui.small(format!("hold: {long}"));
                });
                ui.end_row();
            }
        });

    ui.add_space(4.0);
    ui.small("Keys A, B, X and Y work too.");
}

fn led_section(ui: &mut egui::Ui, app: &mut SimulatorApp) {
    let led = app.session.ui.led();
    let [r, g, b] = led.rgb();
    section_header(ui, "LED", Some(&format!("{}%", led.brightness())));
    ui.add_space(4.0);

    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(egui::vec2(24.0, 24.0), egui::Sense::hover());
        ui.painter()
            .circle_filled(rect.center(), 10.0, egui::Color32::from_rgb(r, g, b));
        ui.monospace(format!("#{r:02x}{g:02x}{b:02x}"));
    });
}

fn engine_section(ui: &mut egui::Ui, app: &mut SimulatorApp) {
    let state = &app.session.state;
    section_header(ui, "Engine", Some(&format!("gen {}", state.calculation_id())));
    ui.add_space(4.0);

    let mut auto_zoom = state.auto_zoom();
    if ui.checkbox(&mut auto_zoom, "Auto-zoom").changed() {
        state.set_auto_zoom(auto_zoom);
    }

    let dive = app.session.ui.auto_zoom();
    ui.label(format!("Dive: {:?}", dive.phase()));
    ui.label(format!("Screen: {}", app.config.screen));
    ui.label(format!("Skip coarse: {}", state.skip_pre_render()));
}
