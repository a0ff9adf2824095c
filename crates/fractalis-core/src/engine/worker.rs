use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info, trace};

use crate::consts::{HIGH_PRECISION_ZOOM, LOWEST_ITER, MAX_ITER, SKIP_PRE_RENDER_ZOOM, UPDATE_INTERVAL, UPDATE_SLEEP_MS};
use crate::engine::caps::IterationCaps;
use crate::error::{FractalisError, Result};
use crate::kernel::{ExtendedKernel, KernelSettings, NativeKernel, Precision};
use crate::scanner::{PassOutcome, RingScanner};
use crate::state::{CalcPhase, EngineState, RenderPhase};

/// Tunables for the compute side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorkerSettings {
    pub kernel: KernelSettings,
    pub lowest_iter: u32,
    pub max_iter: u32,
    /// Above this zoom the coarse pass is skipped.
    pub skip_pre_render_zoom: f64,
    pub update_interval: usize,
    pub idle_sleep: Duration,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            kernel: KernelSettings {
                high_precision_zoom: HIGH_PRECISION_ZOOM,
                ..KernelSettings::default()
            },
            lowest_iter: LOWEST_ITER,
            max_iter: MAX_ITER,
            skip_pre_render_zoom: SKIP_PRE_RENDER_ZOOM,
            update_interval: UPDATE_INTERVAL,
            idle_sleep: Duration::from_millis(UPDATE_SLEEP_MS),
        }
    }
}

/// Result of one worker step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Nothing to compute.
    Idle,
    /// A pass ran to the end.
    Completed {
        phase: CalcPhase,
        limit: u32,
        precision: Precision,
    },
    /// The generation changed under the pass.
    Cancelled,
}

/// Runs scanner passes whenever `calculating` asks for one.
pub struct ComputeWorker {
    state: Arc<EngineState>,
    settings: WorkerSettings,
}

impl ComputeWorker {
    pub fn new(state: Arc<EngineState>, settings: WorkerSettings) -> Self {
        Self { state, settings }
    }

    pub fn state(&self) -> &Arc<EngineState> {
        &self.state
    }

    /// Run at most one pass. Never sleeps.
    pub fn step(&self) -> StepOutcome {
        let state = &*self.state;
        // Generation first: a request that lands after this read is caught
        // by the scanner even if the phase below already reflects it.
        let (generation, viewport) = state.stable_viewport();
        let mut phase = state.calculating();
        if phase == CalcPhase::Idle {
            return StepOutcome::Idle;
        }

        let caps = IterationCaps::with_bounds(
            state.width(),
            viewport.zoom,
            self.settings.lowest_iter,
            self.settings.max_iter,
        );

        let skip = viewport.zoom > self.settings.skip_pre_render_zoom || state.auto_zoom();
        state.set_skip_pre_render(skip);
        if phase == CalcPhase::Coarse && skip {
            state.lower_calculating(CalcPhase::Coarse, CalcPhase::Fine, generation);
            phase = CalcPhase::Fine;
        }

        let limit = match phase {
            CalcPhase::Coarse => caps.coarse,
            _ => caps.fine,
        };
        state.set_iteration_limit(limit);

        let precision = Precision::for_zoom(viewport.zoom, self.settings.kernel.high_precision_zoom);
        debug!(generation, %phase, limit, %precision, zoom = viewport.zoom, "Pass start");

        let started = Instant::now();
        let scanner = RingScanner::new(state).with_update_interval(self.settings.update_interval);
        let outcome = match precision {
            Precision::Native => {
                let kernel = NativeKernel::with_settings(
                    viewport,
                    state.width(),
                    state.height(),
                    &self.settings.kernel,
                );
                scanner.run(&kernel, limit, generation)
            }
            Precision::Extended => {
                let kernel = ExtendedKernel::new(viewport, state.width(), state.height());
                scanner.run(&kernel, limit, generation)
            }
        };

        if outcome == PassOutcome::Cancelled {
            trace!(generation, "Pass abandoned, restarting with a coarse pass");
            state.wait_for_update();
            state.raise_calculating(CalcPhase::Coarse);
            return StepOutcome::Cancelled;
        }

        match phase {
            CalcPhase::Coarse => {
                state.grid().reset_complete_all();
                state.set_last_updated_radius(0);
                state.lower_calculating(CalcPhase::Coarse, CalcPhase::Fine, generation);
            }
            _ => {
                state.raise_rendering(RenderPhase::Full);
                state.lower_calculating(CalcPhase::Fine, CalcPhase::Idle, generation);
            }
        }

        info!(
            generation,
            %phase,
            limit,
            %precision,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Pass complete"
        );
        StepOutcome::Completed {
            phase,
            limit,
            precision,
        }
    }

    /// Step until `shutdown` is raised, sleeping while idle.
    pub fn run(&self, shutdown: &AtomicBool) {
        while !shutdown.load(Ordering::Acquire) {
            if self.step() == StepOutcome::Idle {
                std::thread::sleep(self.settings.idle_sleep);
            }
        }
    }

    /// Move the worker onto its own thread.
    pub fn spawn(self) -> Result<WorkerHandle> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&shutdown);
        let thread = std::thread::Builder::new()
            .name("fractalis-compute".into())
            .spawn(move || self.run(&flag))?;
        Ok(WorkerHandle {
            shutdown,
            thread: Some(thread),
        })
    }
}

/// Owner of a running compute thread. Dropping it stops the thread.
pub struct WorkerHandle {
    shutdown: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Ask the thread to stop and wait for it.
    pub fn stop(mut self) -> Result<()> {
        self.join()
    }

    fn join(&mut self) -> Result<()> {
        self.shutdown.store(true, Ordering::Release);
        match self.thread.take() {
            Some(thread) => thread.join().map_err(|_| FractalisError::WorkerPanicked),
            None => Ok(()),
        }
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        let _ = self.join();
    }
}
