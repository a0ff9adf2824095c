use std::sync::atomic::{AtomicU64, Ordering};

use ndarray::Array2;

use crate::error::{FractalisError, Result};

const ITERATION_MASK: u64 = 0x7FFF_FFFF;
const COMPLETE_BIT: u64 = 1 << 31;
const SMOOTH_SHIFT: u32 = 32;

/// Largest iteration count a cell can hold.
pub const MAX_CELL_ITERATION: u32 = ITERATION_MASK as u32;

/// Per-pixel compute result.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PixelState {
    pub iteration: u32,
    pub complete: bool,
    pub smooth: f32,
}

impl PixelState {
    pub fn finished(iteration: u32, smooth: f32) -> Self {
        Self {
            iteration,
            complete: true,
            smooth,
        }
    }

    fn pack(self) -> u64 {
        let mut word = u64::from(self.iteration.min(MAX_CELL_ITERATION));
        if self.complete {
            word |= COMPLETE_BIT;
        }
        word | (u64::from(self.smooth.to_bits()) << SMOOTH_SHIFT)
    }

    fn unpack(word: u64) -> Self {
        Self {
            iteration: (word & ITERATION_MASK) as u32,
            complete: word & COMPLETE_BIT != 0,
            smooth: f32::from_bits((word >> SMOOTH_SHIFT) as u32),
        }
    }
}

/// Row-major `H x W` grid of pixel results shared between the UI and
/// compute threads.
///
/// Each cell is one 64-bit word, so a reader never sees a cell whose
/// iteration, flag and smooth value come from different writes.
pub struct PixelGrid {
    cells: Array2<AtomicU64>,
    width: usize,
    height: usize,
}

impl PixelGrid {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 || width > i32::MAX as usize || height > i32::MAX as usize {
            return Err(FractalisError::InvalidDimensions { width, height });
        }
        Ok(Self {
            cells: Array2::from_shape_fn((height, width), |_| AtomicU64::new(0)),
            width,
            height,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Read one cell. Panics when out of bounds.
    pub fn get(&self, x: usize, y: usize) -> PixelState {
        PixelState::unpack(self.cells[[y, x]].load(Ordering::Acquire))
    }

    /// Read one cell by signed coordinates, `None` when outside the grid.
    pub fn try_get(&self, x: i64, y: i64) -> Option<PixelState> {
        self.index(x, y).map(|(x, y)| self.get(x, y))
    }

    pub fn set(&self, x: usize, y: usize, state: PixelState) {
        self.cells[[y, x]].store(state.pack(), Ordering::SeqCst);
    }

    /// Clear a cell back to the empty, incomplete state.
    pub fn clear(&self, x: usize, y: usize) {
        self.cells[[y, x]].store(0, Ordering::SeqCst);
    }

    pub fn is_complete(&self, x: usize, y: usize) -> bool {
        self.cells[[y, x]].load(Ordering::Acquire) & COMPLETE_BIT != 0
    }

    pub(crate) fn index(&self, x: i64, y: i64) -> Option<(usize, usize)> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            None
        } else {
            Some((x as usize, y as usize))
        }
    }

    /// Clear the complete flag on the inclusive rectangle spanned by two
    /// corners. Corners are clamped into the grid and may be given in any order.
    pub fn reset_complete(&self, x1: i64, y1: i64, x2: i64, y2: i64) {
        let max_x = self.width as i64 - 1;
        let max_y = self.height as i64 - 1;
        let (mut x1, mut x2) = (x1.clamp(0, max_x), x2.clamp(0, max_x));
        let (mut y1, mut y2) = (y1.clamp(0, max_y), y2.clamp(0, max_y));
        if x1 > x2 {
            std::mem::swap(&mut x1, &mut x2);
        }
        if y1 > y2 {
            std::mem::swap(&mut y1, &mut y2);
        }

        for y in y1 as usize..=y2 as usize {
            for x in x1 as usize..=x2 as usize {
                self.cells[[y, x]].fetch_and(!COMPLETE_BIT, Ordering::SeqCst);
            }
        }
    }

    pub fn reset_complete_all(&self) {
        for cell in self.cells.iter() {
            cell.fetch_and(!COMPLETE_BIT, Ordering::SeqCst);
        }
    }

    /// Translate the grid contents in place by whole pixels.
    ///
    /// Positive `dx` moves content right and clears the leftmost `dx`
    /// columns; negative `dx` moves it left and clears the rightmost
    /// columns. `dy` does the same for rows. A delta at least as large as the
    /// dimension clears everything.
    pub fn shift(&self, dx: i64, dy: i64) {
        if dx.unsigned_abs() >= self.width as u64 || dy.unsigned_abs() >= self.height as u64 {
            self.clear_all();
            return;
        }
        if dx != 0 {
            self.shift_columns(dx);
        }
        if dy != 0 {
            self.shift_rows(dy);
        }
    }

    fn shift_columns(&self, dx: i64) {
        let w = self.width;
        let d = dx.unsigned_abs() as usize;
        for row in self.cells.rows() {
            if dx > 0 {
                for x in (d..w).rev() {
                    row[x].store(row[x - d].load(Ordering::Acquire), Ordering::SeqCst);
                }
                for cell in row.iter().take(d) {
                    cell.store(0, Ordering::SeqCst);
                }
            } else {
                for x in 0..w - d {
                    row[x].store(row[x + d].load(Ordering::Acquire), Ordering::SeqCst);
                }
                for cell in row.iter().skip(w - d) {
                    cell.store(0, Ordering::SeqCst);
                }
            }
        }
    }

    fn shift_rows(&self, dy: i64) {
        let h = self.height;
        let d = dy.unsigned_abs() as usize;
        if dy > 0 {
            for y in (d..h).rev() {
                self.copy_row(y - d, y);
            }
            for y in 0..d {
                self.clear_row(y);
            }
        } else {
            for y in 0..h - d {
                self.copy_row(y + d, y);
            }
            for y in h - d..h {
                self.clear_row(y);
            }
        }
    }

    fn copy_row(&self, from: usize, to: usize) {
        let src = self.cells.row(from);
        let dst = self.cells.row(to);
        for (s, d) in src.iter().zip(dst.iter()) {
            d.store(s.load(Ordering::Acquire), Ordering::SeqCst);
        }
    }

    fn clear_row(&self, y: usize) {
        for cell in self.cells.row(y) {
            cell.store(0, Ordering::SeqCst);
        }
    }

    fn clear_all(&self) {
        for cell in self.cells.iter() {
            cell.store(0, Ordering::SeqCst);
        }
    }

    /// Snapshot of every cell's iteration count, indexed `[y, x]`.
    pub fn iterations(&self) -> Array2<u32> {
        self.cells
            .map(|cell| PixelState::unpack(cell.load(Ordering::Acquire)).iteration)
    }

    /// Snapshot of every cell, indexed `[y, x]`.
    pub fn snapshot(&self) -> Array2<PixelState> {
        self.cells.map(|cell| PixelState::unpack(cell.load(Ordering::Acquire)))
    }

    pub fn complete_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.load(Ordering::Acquire) & COMPLETE_BIT != 0)
            .count()
    }
}

impl std::fmt::Debug for PixelGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelGrid")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("complete", &self.complete_count())
            .finish()
    }
}
