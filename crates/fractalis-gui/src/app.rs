use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use fractalis_core::config::ExplorerConfig;
use fractalis_core::device::{Button, FrameBuffer, RecordingLed, SharedButtons};
use fractalis_core::engine::{ComputeWorker, UiLoop, WorkerHandle};
use fractalis_core::snapshot::save_png;
use fractalis_core::state::EngineState;
use tracing::{error, info};

use crate::convert::frame_buffer_to_color_image;
use crate::messages::DialogResult;
use crate::panels;

/// UI ticks run in one egui frame at most; a longer stall drops the backlog.
const MAX_TICKS_PER_FRAME: u32 = 4;
const MAX_LOG_MESSAGES: usize = 50;

pub const KEY_MAP: [(egui::Key, Button); 4] = [
    (egui::Key::A, Button::A),
    (egui::Key::B, Button::B),
    (egui::Key::X, Button::X),
    (egui::Key::Y, Button::Y),
];

/// One running explorer: shared state, the compute thread and the UI loop.
pub struct Session {
    pub state: Arc<EngineState>,
    pub ui: UiLoop<FrameBuffer, SharedButtons, RecordingLed>,
    buttons: SharedButtons,
    worker: Option<WorkerHandle>,
}

impl Session {
    pub fn start(config: &ExplorerConfig) -> Result<Self> {
        config.validate()?;
        let (width, height) = (config.screen.width, config.screen.height);
        let state = Arc::new(EngineState::with_viewport(width, height, config.start_viewport()?)?);
        let buttons = SharedButtons::new();
        let ui = UiLoop::new(
            Arc::clone(&state),
            FrameBuffer::new(width, height)?,
            buttons.clone(),
            RecordingLed::new(),
            config.ui_settings(),
        )?;
        let worker = ComputeWorker::new(Arc::clone(&state), config.worker_settings())
            .spawn()
            .context("Failed to start the compute thread")?;

        info!(screen = %config.screen, start = %config.start, "Session started");
        Ok(Self {
            state,
            ui,
            buttons,
            worker: Some(worker),
        })
    }

    pub fn stop(&mut self) -> Result<()> {
        self.buttons.release_all();
        match self.worker.take() {
            Some(worker) => Ok(worker.stop()?),
            None => Ok(()),
        }
    }
}

pub struct SimulatorApp {
    pub config: ExplorerConfig,
    pub config_path: Option<PathBuf>,
    pub session: Session,
    pub texture: Option<egui::TextureHandle>,
    /// Buttons held with the mouse on the control panel.
    pub held: [bool; 4],
    pub dialog_tx: mpsc::Sender<DialogResult>,
    dialog_rx: mpsc::Receiver<DialogResult>,
    pub log_messages: Vec<String>,
    pub show_about: bool,
    presented_frame: u64,
    last_update: Option<Instant>,
    pending: Duration,
    halted: bool,
}

impl SimulatorApp {
    pub fn new() -> Result<Self> {
        let config = ExplorerConfig::default();
        let session = Session::start(&config)?;
        let (dialog_tx, dialog_rx) = mpsc::channel();

        Ok(Self {
            config,
            config_path: None,
            session,
            texture: None,
            held: [false; 4],
            dialog_tx,
            dialog_rx,
            log_messages: Vec::new(),
            show_about: false,
            presented_frame: 0,
            last_update: None,
            pending: Duration::ZERO,
            halted: false,
        })
    }

    pub fn add_log(&mut self, message: String) {
        self.log_messages.push(message);
        if self.log_messages.len() > MAX_LOG_MESSAGES {
            self.log_messages.remove(0);
        }
    }

    /// Replace the running session with a fresh one built from `config`.
    pub fn restart(&mut self, config: ExplorerConfig) {
        if let Err(e) = self.session.stop() {
            error!("Stopping session: {e:#}");
        }
        match Session::start(&config) {
            Ok(session) => {
                self.session = session;
                self.config = config;
                self.texture = None;
                self.presented_frame = 0;
                self.pending = Duration::ZERO;
                self.halted = false;
                self.add_log(format!("Started at {} on {}", self.config.start, self.config.screen));
            }
            Err(e) => {
                self.add_log(format!("ERROR: {e:#}"));
                // The previous config is known to be good.
                match Session::start(&self.config) {
                    Ok(session) => self.session = session,
                    Err(e) => {
                        self.halted = true;
                        self.add_log(format!("ERROR: {e:#}"));
                    }
                }
            }
        }
    }

    fn poll_dialogs(&mut self) {
        while let Ok(result) = self.dialog_rx.try_recv() {
            match result {
                DialogResult::ConfigLoaded { path, config } => {
                    self.add_log(format!("Loaded config {}", path.display()));
                    self.config_path = Some(path);
                    self.restart(*config);
                }
                DialogResult::ConfigFailed { path, message } => {
                    self.add_log(format!("ERROR: {}: {message}", path.display()));
                }
                DialogResult::ScreenshotPath { path } => {
                    match save_png(self.session.ui.display().image(), &path) {
                        Ok(()) => self.add_log(format!("Saved: {}", path.display())),
                        Err(e) => self.add_log(format!("ERROR: {e}")),
                    }
                }
                DialogResult::ConfigSavePath { path } => match self.config.save(&path) {
                    Ok(()) => {
                        self.add_log(format!("Config saved to {}", path.display()));
                        self.config_path = Some(path);
                    }
                    Err(e) => self.add_log(format!("ERROR: {e}")),
                },
            }
        }
    }

    /// Mirror keyboard and mouse holds onto the simulated button levels.
    fn sync_buttons(&self, ctx: &egui::Context) {
        let keys_enabled = !ctx.wants_keyboard_input();
        for (key, button) in KEY_MAP {
            let key_down = keys_enabled && ctx.input(|i| i.key_down(key));
            self.session
                .buttons
                .set(button, key_down || self.held[button.index()]);
        }
    }

    /// Run as many UI ticks as wall time allows since the last frame.
    fn advance(&mut self) {
        let now = Instant::now();
        if let Some(last) = self.last_update.replace(now) {
            self.pending += now - last;
        }
        if self.halted {
            return;
        }

        let tick = self.config.tick();
        let mut ran = 0;
        while self.pending >= tick && ran < MAX_TICKS_PER_FRAME {
            self.pending -= tick;
            ran += 1;
            if let Err(e) = self.session.ui.tick() {
                error!("UI tick failed: {e}");
                self.halted = true;
                self.add_log(format!("ERROR: {e}"));
                return;
            }
        }
        if ran == MAX_TICKS_PER_FRAME {
            self.pending = Duration::ZERO;
        }
    }

    fn update_viewport_texture(&mut self, ctx: &egui::Context) {
        let display = self.session.ui.display();
        if self.texture.is_some() && display.frame_count() == self.presented_frame {
            return;
        }
        let image = frame_buffer_to_color_image(display.image());
        self.presented_frame = display.frame_count();
        match &mut self.texture {
            Some(texture) => texture.set(image, egui::TextureOptions::NEAREST),
            None => {
                self.texture = Some(ctx.load_texture(
                    "viewport",
                    image,
                    egui::TextureOptions::NEAREST,
                ));
            }
        }
    }
}

impl eframe::App for SimulatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_dialogs();
        self.sync_buttons(ctx);
        self.advance();
        self.update_viewport_texture(ctx);

        panels::menu_bar::show(ctx, self);
        panels::status::show(ctx, self);
        panels::controls::show(ctx, self);
        panels::device::show(ctx, self);

        if self.show_about {
            egui::Window::new("About Fractalis")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading("Fractalis");
                        ui.label("Mandelbrot Explorer Simulator");
                        ui.add_space(8.0);
                        ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                        ui.add_space(8.0);
                        if ui.button("Close").clicked() {
                            self.show_about = false;
                        }
                    });
                });
        }

        ctx.request_repaint_after(self.config.tick());
    }
}
