use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use fractalis_core::autozoom::DiveAction;
use fractalis_core::device::{FrameBuffer, RecordingLed, ScriptedButtons, ScriptedPress};
use fractalis_core::engine::{ComputeWorker, StepOutcome, UiLoop};
use fractalis_core::kernel::Precision;
use fractalis_core::snapshot::save_png;
use fractalis_core::state::EngineState;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::summary::{print_session_summary, SessionSummary};

/// Passes the lock-step worker may run per tick before giving up on idle.
const MAX_PASSES_PER_TICK: usize = 8;

#[derive(Args)]
pub struct RunArgs {
    /// Explorer config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of 16 ms UI ticks to run
    #[arg(long, default_value = "600")]
    pub ticks: u64,

    /// Scripted press, BUTTON@TICK, BUTTON@TICK:TICKS or BUTTON@TICK:long (repeatable)
    #[arg(long = "press", value_name = "PRESS")]
    pub presses: Vec<ScriptedPress>,

    /// Start with auto-zoom enabled
    #[arg(long)]
    pub auto_zoom: bool,

    /// Seed for the auto-zoom jitter
    #[arg(long)]
    pub seed: Option<u64>,

    /// Run the compute worker on the UI thread, to idle after every tick,
    /// for reproducible output
    #[arg(long)]
    pub lockstep: bool,

    /// Sleep one tick period between UI ticks, as the device does
    #[arg(long, conflicts_with = "lockstep")]
    pub realtime: bool,

    /// Also save every Nth frame
    #[arg(long)]
    pub frames_every: Option<u64>,

    /// Directory for the frames saved with --frames-every
    #[arg(long, default_value = "frames")]
    pub frames_dir: PathBuf,

    /// Final frame output path
    #[arg(short, long, default_value = "session.png")]
    pub output: PathBuf,
}

pub fn run(args: &RunArgs) -> Result<()> {
    let mut config = super::load_config(args.config.as_deref())?;
    if args.seed.is_some() {
        config.auto_zoom.seed = args.seed;
    }

    let (width, height) = (config.screen.width, config.screen.height);
    let state = Arc::new(EngineState::with_viewport(width, height, config.start_viewport()?)?);
    state.set_auto_zoom(args.auto_zoom);

    let mut ui = UiLoop::new(
        Arc::clone(&state),
        FrameBuffer::new(width, height)?,
        ScriptedButtons::new(args.presses.clone()),
        RecordingLed::new(),
        config.ui_settings(),
    )?;

    let worker = ComputeWorker::new(Arc::clone(&state), config.worker_settings());
    let (lockstep_worker, handle) = if args.lockstep {
        (Some(worker), None)
    } else {
        (None, Some(worker.spawn()?))
    };

    if let Some(every) = args.frames_every {
        if every == 0 {
            anyhow::bail!("--frames-every must be at least 1");
        }
        std::fs::create_dir_all(&args.frames_dir)
            .with_context(|| format!("Failed to create {}", args.frames_dir.display()))?;
    }

    info!(
        screen = %config.screen,
        start = %config.start,
        ticks = args.ticks,
        presses = args.presses.len(),
        lockstep = args.lockstep,
        "Session start"
    );

    let pb = ProgressBar::new(args.ticks);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:24} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );

    let started = Instant::now();
    let mut summary = SessionSummary {
        lockstep: args.lockstep,
        ..SessionSummary::default()
    };
    for tick in 0..args.ticks {
        let report = ui.tick()?;
        summary.presses += report.events.len();
        match report.dive {
            Some(DiveAction::Pan { .. }) => summary.dive_pans += 1,
            Some(DiveAction::Zoom { .. }) => summary.dive_zooms += 1,
            _ => {}
        }

        if let Some(worker) = &lockstep_worker {
            for _ in 0..MAX_PASSES_PER_TICK {
                match worker.step() {
                    StepOutcome::Idle => break,
                    StepOutcome::Completed { precision, .. } => {
                        summary.passes += 1;
                        if precision == Precision::Extended {
                            summary.extended_passes += 1;
                        }
                    }
                    StepOutcome::Cancelled => summary.cancelled += 1,
                }
            }
        } else if args.realtime {
            std::thread::sleep(config.tick());
        }

        if let Some(every) = args.frames_every {
            if tick % every == 0 {
                let path = args.frames_dir.join(format!("frame_{tick:05}.png"));
                save_png(ui.display().image(), &path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                summary.frames_saved += 1;
            }
        }

        pb.set_message(format!("{} x{:.3e}", state.calculating(), state.zoom_level()));
        pb.set_position(tick + 1);
    }
    pb.finish_with_message("Done");

    if let Some(handle) = handle {
        handle.stop()?;
    }

    save_png(ui.display().image(), &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    summary.ticks = ui.ticks();
    summary.elapsed = started.elapsed();
    summary.output = args.output.clone();
    print_session_summary(&state, ui.led(), &summary);
    Ok(())
}
