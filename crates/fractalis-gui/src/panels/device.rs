use fractalis_core::device::{TextRun, GLYPH_HEIGHT};

use crate::app::SimulatorApp;

/// Bezel drawn around the simulated panel, in screen points.
const BEZEL: f32 = 12.0;

pub fn show(ctx: &egui::Context, app: &mut SimulatorApp) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let rect = ui.available_rect_before_wrap();
        ui.painter()
            .rect_filled(rect, 0.0, egui::Color32::from_gray(30));

        let Some(texture) = app.texture.as_ref() else {
            ui.centered_and_justified(|ui| {
                ui.label(
                    egui::RichText::new("Starting...")
                        .size(18.0)
                        .color(egui::Color32::from_gray(100)),
                );
            });
            return;
        };

        let [w, h] = texture.size();
        let scale = pixel_scale(rect.size() - egui::vec2(2.0 * BEZEL, 2.0 * BEZEL), w, h);
        let screen = egui::Rect::from_center_size(
            rect.center(),
            egui::vec2(w as f32 * scale, h as f32 * scale),
        );

        let painter = ui.painter_at(rect);
        painter.rect_filled(screen.expand(BEZEL), 6.0, egui::Color32::from_gray(12));
        painter.image(
            texture.id(),
            screen,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        for run in app.session.ui.display().overlay() {
            draw_text_run(&painter, screen.min, scale, run);
        }
    });
}

/// Largest whole-number magnification that fits, or a fraction when the
/// window is smaller than the panel.
fn pixel_scale(available: egui::Vec2, w: usize, h: usize) -> f32 {
    let fit = (available.x / w as f32).min(available.y / h as f32);
    if fit >= 1.0 {
        fit.floor()
    } else {
        fit.max(0.1)
    }
}

fn draw_text_run(painter: &egui::Painter, origin: egui::Pos2, scale: f32, run: &TextRun) {
    let font = egui::FontId::monospace(GLYPH_HEIGHT as f32 * run.scale * scale);
    let color = egui::Color32::from_rgb(run.color[0], run.color[1], run.color[2]);
    let wrap = if run.wrap > 0 {
        run.wrap as f32 * scale
    } else {
        f32::INFINITY
    };
    let galley = painter.layout(run.text.clone(), font, color, wrap);
    let pos = origin + egui::vec2(run.x as f32 * scale, run.y as f32 * scale);
    painter.galley(pos, galley, color);
}
