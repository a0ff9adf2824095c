//! The two loops of the explorer: [`UiLoop`] on the UI thread and
//! [`ComputeWorker`] on its own thread, sharing one [`EngineState`].
//!
//! [`EngineState`]: crate::state::EngineState

pub mod caps;
pub mod ui;
pub mod worker;

pub use caps::IterationCaps;
pub use ui::{TickReport, UiLoop, UiSettings};
pub use worker::{ComputeWorker, StepOutcome, WorkerHandle, WorkerSettings};
