use fractalis_core::render::overlay::center_lines;

use crate::app::SimulatorApp;

pub fn show(ctx: &egui::Context, app: &mut SimulatorApp) {
    egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
        ui.add_space(2.0);

        // Log area, fixed at three lines.
        let line_height = ui.text_style_height(&egui::TextStyle::Body);
        let spacing = ui.spacing().item_spacing.y;
        let log_height = line_height * 3.0 + spacing * 2.0;

        egui::ScrollArea::vertical()
            .max_height(log_height)
            .min_scrolled_height(log_height)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                if app.log_messages.is_empty() {
                    for _ in 0..3 {
                        ui.label("");
                    }
                } else {
                    for msg in &app.log_messages {
                        ui.label(msg);
                    }
                }
            });

        let state = &app.session.state;
        ui.horizontal(|ui| {
            for line in center_lines(state) {
                ui.monospace(line);
                ui.separator();
            }
            ui.label(format!("Pass: {}", state.calculating()));
            ui.separator();
            ui.label(format!("Paint: {}", state.rendering()));
            ui.separator();
            ui.label(format!("Iterations: {}", state.iteration_limit()));
            ui.separator();
            ui.label(format!("Tick {}", app.session.ui.ticks()));
        });

        ui.add_space(2.0);
    });
}
