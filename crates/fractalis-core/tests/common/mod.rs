use std::sync::Arc;

use fractalis_core::engine::{ComputeWorker, StepOutcome, WorkerSettings};
use fractalis_core::state::{CalcPhase, EngineState, PixelState, RenderPhase};

/// Fresh state at the default viewport.
pub fn make_state(width: usize, height: usize) -> Arc<EngineState> {
    Arc::new(EngineState::new(width, height).expect("valid dimensions"))
}

/// Mark every cell complete with `f(x, y)` as its iteration count.
pub fn fill_grid(state: &EngineState, f: impl Fn(usize, usize) -> u32) {
    let grid = state.grid();
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            grid.set(x, y, PixelState::finished(f(x, y), 2.0));
        }
    }
}

/// Put the engine at rest: no pass running, nothing left to paint.
pub fn make_quiescent(state: &EngineState) {
    state.set_calculating(CalcPhase::Idle);
    state.set_rendering(RenderPhase::Done);
}

/// Step the worker on the current thread until it reports idle.
pub fn run_to_idle(worker: &ComputeWorker) -> Vec<StepOutcome> {
    let mut outcomes = Vec::new();
    for _ in 0..16 {
        let outcome = worker.step();
        if outcome == StepOutcome::Idle {
            return outcomes;
        }
        outcomes.push(outcome);
    }
    panic!("worker never went idle: {outcomes:?}");
}

pub fn make_worker(state: &Arc<EngineState>) -> ComputeWorker {
    ComputeWorker::new(Arc::clone(state), WorkerSettings::default())
}
