pub mod atomic;
pub mod grid;
pub mod viewport;

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicU8, Ordering};

use num_complex::Complex;

use crate::consts::LOWEST_ITER;
use crate::error::Result;
use crate::scalar::DoubleDouble;

pub use atomic::{AtomicDoubleDouble, AtomicF64};
pub use grid::{PixelGrid, PixelState};
pub use viewport::{CalcPhase, PanDirection, RenderPhase, ViewportSnapshot};

/// State shared between the UI thread and the compute thread.
///
/// The UI owns the viewport, the modes and `calculation_id`; the compute
/// thread owns the grid contents, `last_updated_radius` and
/// `iteration_limit`. Both sides move `calculating` and `rendering`: the UI
/// only ever raises them, the compute thread only ever lowers them.
///
/// `calculation_id` doubles as a sequence lock. A UI action makes it odd,
/// writes the viewport, moves the grid and sets the phase flags, then makes
/// it even again. A pass only runs under an even id read on both sides of
/// its viewport snapshot, and every cell store is checked against that id,
/// so nothing computed while an action is half applied stays marked
/// complete. A cancelled pass waits for the id to turn even before it asks
/// for a coarse restart, so the restart lands after the action's own flags.
pub struct EngineState {
    width: usize,
    height: usize,
    grid: PixelGrid,

    center_re: AtomicDoubleDouble,
    center_im: AtomicDoubleDouble,
    pan_re: AtomicDoubleDouble,
    pan_im: AtomicDoubleDouble,
    zoom: AtomicF64,
    last_pan_direction: AtomicU8,
    last_pan_pixels: AtomicU32,

    calculation_id: AtomicU64,
    calculating: AtomicU8,
    rendering: AtomicU8,
    last_updated_radius: AtomicU32,
    iteration_limit: AtomicU32,
    skip_pre_render: AtomicBool,

    auto_zoom: AtomicBool,
    hide_ui: AtomicBool,
}

impl EngineState {
    /// Fresh state at the default viewport, with a coarse pass and a full
    /// repaint pending.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Self::with_viewport(width, height, ViewportSnapshot::default())
    }

    pub fn with_viewport(width: usize, height: usize, viewport: ViewportSnapshot) -> Result<Self> {
        let grid = PixelGrid::new(width, height)?;
        Ok(Self {
            width,
            height,
            grid,
            center_re: AtomicDoubleDouble::new(viewport.center.re),
            center_im: AtomicDoubleDouble::new(viewport.center.im),
            pan_re: AtomicDoubleDouble::new(viewport.pan.re),
            pan_im: AtomicDoubleDouble::new(viewport.pan.im),
            zoom: AtomicF64::new(viewport.zoom),
            last_pan_direction: AtomicU8::new(PanDirection::None as u8),
            last_pan_pixels: AtomicU32::new(0),
            calculation_id: AtomicU64::new(0),
            calculating: AtomicU8::new(CalcPhase::Coarse as u8),
            rendering: AtomicU8::new(RenderPhase::Full as u8),
            last_updated_radius: AtomicU32::new(0),
            iteration_limit: AtomicU32::new(LOWEST_ITER),
            skip_pre_render: AtomicBool::new(false),
            auto_zoom: AtomicBool::new(false),
            hide_ui: AtomicBool::new(false),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn grid(&self) -> &PixelGrid {
        &self.grid
    }

    // -- viewport ----------------------------------------------------------

    pub fn viewport(&self) -> ViewportSnapshot {
        ViewportSnapshot {
            center: Complex::new(
                self.center_re.load(Ordering::Acquire),
                self.center_im.load(Ordering::Acquire),
            ),
            pan: Complex::new(
                self.pan_re.load(Ordering::Acquire),
                self.pan_im.load(Ordering::Acquire),
            ),
            zoom: self.zoom.load(Ordering::Acquire),
        }
    }

    pub fn zoom_level(&self) -> f64 {
        self.zoom.load(Ordering::Acquire)
    }

    pub(crate) fn store_zoom(&self, zoom: f64) {
        self.zoom.store(zoom, Ordering::Release);
    }

    pub fn pan_offset(&self) -> Complex<DoubleDouble> {
        Complex::new(
            self.pan_re.load(Ordering::Acquire),
            self.pan_im.load(Ordering::Acquire),
        )
    }

    pub(crate) fn store_pan(&self, pan: Complex<DoubleDouble>) {
        self.pan_re.store(pan.re, Ordering::Release);
        self.pan_im.store(pan.im, Ordering::Release);
    }

    pub fn effective_center(&self) -> Complex<DoubleDouble> {
        self.viewport().effective_center()
    }

    pub fn last_pan_direction(&self) -> PanDirection {
        PanDirection::from_u8(self.last_pan_direction.load(Ordering::Acquire))
    }

    /// Pixel extent of the strip uncovered by the last pan.
    pub fn last_pan_pixels(&self) -> usize {
        self.last_pan_pixels.load(Ordering::Acquire) as usize
    }

    pub(crate) fn record_pan(&self, direction: PanDirection, pixels: usize) {
        self.last_pan_pixels.store(pixels as u32, Ordering::Release);
        self.last_pan_direction.store(direction as u8, Ordering::Release);
    }

    pub(crate) fn clear_pan_direction(&self) {
        self.last_pan_direction
            .store(PanDirection::None as u8, Ordering::Release);
    }

    // -- generation --------------------------------------------------------

    pub fn calculation_id(&self) -> u64 {
        self.calculation_id.load(Ordering::Acquire)
    }

    /// Open a viewport update. The id turns odd, which no pass runs under,
    /// so every pass in flight fails its next check. Pairs with
    /// [`EngineState::end_update`].
    pub fn begin_update(&self) -> u64 {
        self.calculation_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Close the update opened by [`EngineState::begin_update`]. Returns the
    /// new, even, generation.
    pub fn end_update(&self) -> u64 {
        self.calculation_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Start a new generation without touching the viewport.
    pub fn bump_calculation_id(&self) -> u64 {
        self.begin_update();
        self.end_update()
    }

    /// True while a UI action is half applied.
    pub fn is_updating(&self) -> bool {
        self.calculation_id() % 2 == 1
    }

    /// Spin until no UI action is half applied.
    pub fn wait_for_update(&self) {
        while self.is_updating() {
            std::thread::yield_now();
        }
    }

    /// A generation and the viewport it belongs to, read as a pair. Waits
    /// out an open update and retries if one starts during the read.
    pub fn stable_viewport(&self) -> (u64, ViewportSnapshot) {
        loop {
            let generation = self.calculation_id.load(Ordering::SeqCst);
            if generation % 2 == 1 {
                std::thread::yield_now();
                continue;
            }
            let viewport = self.viewport();
            if self.generation_is(generation) {
                return (generation, viewport);
            }
        }
    }

    /// Strong re-check used right after a cell store.
    pub(crate) fn generation_is(&self, generation: u64) -> bool {
        self.calculation_id.load(Ordering::SeqCst) == generation
    }

    // -- phases ------------------------------------------------------------

    pub fn calculating(&self) -> CalcPhase {
        CalcPhase::from_u8(self.calculating.load(Ordering::Acquire))
    }

    pub fn set_calculating(&self, phase: CalcPhase) {
        self.calculating.store(phase as u8, Ordering::SeqCst);
    }

    /// Raise `calculating` to at least `phase`.
    pub fn raise_calculating(&self, phase: CalcPhase) {
        self.calculating.fetch_max(phase as u8, Ordering::SeqCst);
    }

    /// Lower `calculating` from `from` to `to` on behalf of the pass that
    /// ran under `generation`. Returns false if the value had already moved.
    ///
    /// If the UI started a new generation around the exchange, `from` is
    /// restored so the UI's raise is not lost.
    pub fn lower_calculating(&self, from: CalcPhase, to: CalcPhase, generation: u64) -> bool {
        let lowered = self
            .calculating
            .compare_exchange(from as u8, to as u8, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();
        if lowered && !self.generation_is(generation) {
            self.calculating.fetch_max(from as u8, Ordering::SeqCst);
        }
        lowered
    }

    pub fn rendering(&self) -> RenderPhase {
        RenderPhase::from_u8(self.rendering.load(Ordering::Acquire))
    }

    pub fn set_rendering(&self, phase: RenderPhase) {
        self.rendering.store(phase as u8, Ordering::SeqCst);
    }

    pub fn raise_rendering(&self, phase: RenderPhase) {
        self.rendering.fetch_max(phase as u8, Ordering::SeqCst);
    }

    /// Move `rendering` from `from` to `to` if nothing else moved it first.
    pub fn advance_rendering(&self, from: RenderPhase, to: RenderPhase) -> bool {
        self.rendering
            .compare_exchange(from as u8, to as u8, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// True when no pass is running and no repaint is pending.
    pub fn is_quiescent(&self) -> bool {
        self.calculating() == CalcPhase::Idle && self.rendering() == RenderPhase::Done
    }

    // -- progress ----------------------------------------------------------

    pub fn last_updated_radius(&self) -> usize {
        self.last_updated_radius.load(Ordering::Acquire) as usize
    }

    pub fn set_last_updated_radius(&self, radius: usize) {
        self.last_updated_radius
            .store(radius as u32, Ordering::Release);
    }

    pub fn iteration_limit(&self) -> u32 {
        self.iteration_limit.load(Ordering::Acquire)
    }

    pub fn set_iteration_limit(&self, limit: u32) {
        self.iteration_limit.store(limit, Ordering::Release);
    }

    pub fn skip_pre_render(&self) -> bool {
        self.skip_pre_render.load(Ordering::Acquire)
    }

    pub fn set_skip_pre_render(&self, skip: bool) {
        self.skip_pre_render.store(skip, Ordering::Release);
    }

    // -- modes -------------------------------------------------------------

    pub fn auto_zoom(&self) -> bool {
        self.auto_zoom.load(Ordering::Acquire)
    }

    pub fn set_auto_zoom(&self, enabled: bool) {
        self.auto_zoom.store(enabled, Ordering::Release);
    }

    /// Flip auto-zoom and return the new value.
    pub fn toggle_auto_zoom(&self) -> bool {
        !self.auto_zoom.fetch_xor(true, Ordering::AcqRel)
    }

    pub fn hide_ui(&self) -> bool {
        self.hide_ui.load(Ordering::Acquire)
    }

    pub fn toggle_hide_ui(&self) -> bool {
        !self.hide_ui.fetch_xor(true, Ordering::AcqRel)
    }
}

impl std::fmt::Debug for EngineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineState")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("viewport", &self.viewport())
            .field("calculation_id", &self.calculation_id())
            .field("calculating", &self.calculating())
            .field("rendering", &self.rendering())
            .field("iteration_limit", &self.iteration_limit())
            .finish()
    }
}
