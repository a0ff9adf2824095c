use std::path::PathBuf;

use fractalis_core::config::ExplorerConfig;

use crate::app::SimulatorApp;
use crate::messages::DialogResult;

pub fn show(ctx: &egui::Context, app: &mut SimulatorApp) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                let save_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::S);
                if ui
                    .add(egui::Button::new("Save Screenshot...").shortcut_text(ctx.format_shortcut(&save_shortcut)))
                    .clicked()
                {
                    ui.close();
                    save_screenshot(app);
                }

                ui.separator();

                if ui.button("Load Config...").clicked() {
                    ui.close();
                    load_config(app);
                }

                if ui.button("Save Config...").clicked() {
                    ui.close();
                    save_config(app);
                }

                ui.separator();

                let quit_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q);
                if ui
                    .add(egui::Button::new("Quit").shortcut_text(ctx.format_shortcut(&quit_shortcut)))
                    .clicked()
                {
                    ui.close();
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("Edit", |ui| {
                if ui.button("Reset View").clicked() {
                    ui.close();
                    let config = app.config.clone();
                    app.restart(config);
                }
                if ui.button("Reset Defaults").clicked() {
                    ui.close();
                    app.config_path = None;
                    app.restart(ExplorerConfig::default());
                }
            });

            ui.menu_button("Help", |ui| {
                if ui.button("About").clicked() {
                    ui.close();
                    app.show_about = true;
                }
            });
        });

        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::S))) {
            save_screenshot(app);
        }
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q))) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}

fn save_screenshot(app: &mut SimulatorApp) {
    let tx = app.dialog_tx.clone();
    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name("fractalis.png")
            .save_file()
        {
            let _ = tx.send(DialogResult::ScreenshotPath { path });
        }
    });
}

fn load_config(app: &mut SimulatorApp) {
    let tx = app.dialog_tx.clone();
    std::thread::spawn(move || {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("TOML", &["toml"])
            .pick_file()
        else {
            return;
        };
        let result = match ExplorerConfig::load(&path) {
            Ok(config) => DialogResult::ConfigLoaded {
                path,
                config: Box::new(config),
            },
            Err(e) => DialogResult::ConfigFailed {
                path,
                message: e.to_string(),
            },
        };
        let _ = tx.send(result);
    });
}

fn save_config(app: &mut SimulatorApp) {
    let tx = app.dialog_tx.clone();
    let suggested = app
        .config_path
        .as_ref()
        .and_then(|p| p.file_name())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("fractalis.toml"));
    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("TOML", &["toml"])
            .set_file_name(suggested.to_string_lossy())
            .save_file()
        {
            let _ = tx.send(DialogResult::ConfigSavePath { path });
        }
    });
}
