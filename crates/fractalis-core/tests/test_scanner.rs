#[allow(dead_code)]
mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use fractalis_core::kernel::{Escape, EscapeKernel};
use fractalis_core::scanner::{PassOutcome, RingScanner};
use fractalis_core::state::EngineState;

use common::make_state;

/// Records the order in which cells are visited.
#[derive(Default)]
struct RecordingKernel {
    visits: Mutex<Vec<(usize, usize)>>,
}

impl RecordingKernel {
    fn visits(&self) -> Vec<(usize, usize)> {
        self.visits.lock().unwrap().clone()
    }
}

impl EscapeKernel for RecordingKernel {
    fn escape(&self, x: usize, y: usize, _limit: u32) -> Escape {
        self.visits.lock().unwrap().push((x, y));
        Escape::escaped((x + y) as u32 % 7, 16.0)
    }
}

/// Starts a new generation on its `bump_at`-th call.
struct BumpingKernel<'a> {
    state: &'a EngineState,
    calls: AtomicUsize,
    bump_at: usize,
}

impl EscapeKernel for BumpingKernel<'_> {
    fn escape(&self, _x: usize, _y: usize, limit: u32) -> Escape {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.bump_at {
            self.state.bump_calculation_id();
        }
        Escape::bounded(limit)
    }
}

// ---------------------------------------------------------------------------
// Coverage
// ---------------------------------------------------------------------------

#[test]
fn test_pass_covers_every_cell_once() {
    for (w, h) in [(1, 1), (2, 3), (8, 8), (17, 5), (5, 17), (240, 135)] {
        let state = make_state(w, h);
        let kernel = RecordingKernel::default();
        let outcome = RingScanner::new(&state).run(&kernel, 50, state.calculation_id());

        assert_eq!(outcome, PassOutcome::Completed, "{w}x{h}");
        assert_eq!(state.grid().complete_count(), w * h, "{w}x{h}");
        assert_eq!(kernel.visits().len(), w * h, "{w}x{h}");
    }
}

#[test]
fn test_stored_values_come_from_kernel() {
    let state = make_state(6, 4);
    let kernel = RecordingKernel::default();
    RingScanner::new(&state).run(&kernel, 50, 0);

    let cell = state.grid().get(5, 3);
    assert!(cell.complete);
    assert_eq!(cell.iteration, 8 % 7);
}

#[test]
fn test_radius_reaches_max_after_pass() {
    let state = make_state(30, 20);
    let scanner = RingScanner::new(&state).with_update_interval(1_000_000);
    assert_eq!(scanner.max_radius(), 15);
    scanner.run(&RecordingKernel::default(), 50, 0);
    assert_eq!(state.last_updated_radius(), 15);
}

#[test]
fn test_second_pass_computes_nothing() {
    let state = make_state(9, 7);
    RingScanner::new(&state).run(&RecordingKernel::default(), 50, 0);

    let kernel = RecordingKernel::default();
    let outcome = RingScanner::new(&state).run(&kernel, 50, 0);
    assert_eq!(outcome, PassOutcome::Completed);
    assert!(kernel.visits().is_empty());
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

#[test]
fn test_centre_first_then_outward() {
    let (w, h) = (13, 9);
    let state = make_state(w, h);
    let kernel = RecordingKernel::default();
    RingScanner::new(&state).run(&kernel, 50, 0);

    let visits = kernel.visits();
    assert_eq!(visits[0], (w / 2, h / 2));

    let distance = |(x, y): (usize, usize)| {
        let dx = (x as i64 - (w / 2) as i64).abs();
        let dy = (y as i64 - (h / 2) as i64).abs();
        dx.max(dy)
    };
    for pair in visits.windows(2) {
        assert!(distance(pair[0]) <= distance(pair[1]), "{pair:?}");
    }
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

#[test]
fn test_stale_generation_cancels_before_any_store() {
    let state = make_state(8, 8);
    state.bump_calculation_id();

    let kernel = RecordingKernel::default();
    let outcome = RingScanner::new(&state).run(&kernel, 50, 0);
    assert_eq!(outcome, PassOutcome::Cancelled);
    assert_eq!(state.grid().complete_count(), 0);
    assert!(kernel.visits().is_empty());
}

#[test]
fn test_store_after_bump_is_rolled_back() {
    let state = make_state(16, 16);
    let kernel = BumpingKernel {
        state: &state,
        calls: AtomicUsize::new(0),
        bump_at: 30,
    };

    let outcome = RingScanner::new(&state).run(&kernel, 50, 0);
    assert_eq!(outcome, PassOutcome::Cancelled);
    assert_eq!(kernel.calls.load(Ordering::SeqCst), 30);
    assert_eq!(state.grid().complete_count(), 29);
}
