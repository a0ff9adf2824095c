mod app;
mod convert;
mod messages;
mod panels;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 640.0])
            .with_min_inner_size([640.0, 400.0])
            .with_title("Fractalis"),
        ..Default::default()
    };

    eframe::run_native(
        "Fractalis",
        options,
        Box::new(|_cc| {
            let app = app::SimulatorApp::new()?;
            Ok(Box::new(app))
        }),
    )
}
