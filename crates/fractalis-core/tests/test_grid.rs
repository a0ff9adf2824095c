use fractalis_core::error::FractalisError;
use fractalis_core::state::{PixelGrid, PixelState};

fn filled_grid(width: usize, height: usize) -> PixelGrid {
    let grid = PixelGrid::new(width, height).unwrap();
    for y in 0..height {
        for x in 0..width {
            grid.set(x, y, PixelState::finished((y * 100 + x) as u32, 1.5));
        }
    }
    grid
}

// ---------------------------------------------------------------------------
// Construction and cells
// ---------------------------------------------------------------------------

#[test]
fn test_new_rejects_zero_dimensions() {
    assert!(matches!(
        PixelGrid::new(0, 10),
        Err(FractalisError::InvalidDimensions { width: 0, height: 10 })
    ));
    assert!(PixelGrid::new(10, 0).is_err());
}

#[test]
fn test_new_grid_is_empty() {
    let grid = PixelGrid::new(4, 3).unwrap();
    assert_eq!(grid.width(), 4);
    assert_eq!(grid.height(), 3);
    assert_eq!(grid.complete_count(), 0);
    assert_eq!(grid.get(3, 2), PixelState::default());
}

#[test]
fn test_cell_keeps_all_fields() {
    let grid = PixelGrid::new(2, 2).unwrap();
    let state = PixelState::finished(9_999, 12.75);
    grid.set(1, 0, state);
    assert_eq!(grid.get(1, 0), state);
    assert!(grid.is_complete(1, 0));

    grid.clear(1, 0);
    assert_eq!(grid.get(1, 0), PixelState::default());
}

#[test]
fn test_try_get_out_of_bounds() {
    let grid = PixelGrid::new(3, 3).unwrap();
    assert!(grid.try_get(-1, 0).is_none());
    assert!(grid.try_get(0, 3).is_none());
    assert!(grid.try_get(2, 2).is_some());
}

// ---------------------------------------------------------------------------
// reset_complete
// ---------------------------------------------------------------------------

#[test]
fn test_reset_complete_clamps_and_normalises() {
    let grid = filled_grid(8, 6);
    grid.reset_complete(5, 5, -3, 2);

    for y in 0..6 {
        for x in 0..8 {
            let inside = x <= 5 && (2..=5).contains(&y);
            assert_eq!(grid.is_complete(x, y), !inside, "cell ({x}, {y})");
        }
    }
}

#[test]
fn test_reset_complete_keeps_values() {
    let grid = filled_grid(4, 4);
    grid.reset_complete(1, 1, 1, 1);
    let cell = grid.get(1, 1);
    assert!(!cell.complete);
    assert_eq!(cell.iteration, 101);
    assert_eq!(cell.smooth, 1.5);
}

#[test]
fn test_reset_complete_all() {
    let grid = filled_grid(5, 5);
    grid.reset_complete_all();
    assert_eq!(grid.complete_count(), 0);
}

// ---------------------------------------------------------------------------
// shift
// ---------------------------------------------------------------------------

#[test]
fn test_shift_right_clears_left_columns() {
    let grid = filled_grid(6, 3);
    grid.shift(2, 0);

    for y in 0..3 {
        for x in 0..2 {
            let cell = grid.get(x, y);
            assert!(!cell.complete);
            assert_eq!(cell.iteration, 0);
        }
        for x in 2..6 {
            let cell = grid.get(x, y);
            assert!(cell.complete);
            assert_eq!(cell.iteration, (y * 100 + x - 2) as u32);
        }
    }
}

#[test]
fn test_shift_left_clears_right_columns() {
    let grid = filled_grid(6, 3);
    grid.shift(-2, 0);

    for y in 0..3 {
        for x in 0..4 {
            assert_eq!(grid.get(x, y).iteration, (y * 100 + x + 2) as u32);
        }
        for x in 4..6 {
            assert!(!grid.is_complete(x, y));
            assert_eq!(grid.get(x, y).iteration, 0);
        }
    }
}

#[test]
fn test_shift_up_and_down() {
    let grid = filled_grid(3, 5);
    grid.shift(0, -1);
    for x in 0..3 {
        for y in 0..4 {
            assert_eq!(grid.get(x, y).iteration, ((y + 1) * 100 + x) as u32);
        }
        assert!(!grid.is_complete(x, 4));
    }

    let grid = filled_grid(3, 5);
    grid.shift(0, 2);
    for x in 0..3 {
        assert!(!grid.is_complete(x, 0));
        assert!(!grid.is_complete(x, 1));
        for y in 2..5 {
            assert_eq!(grid.get(x, y).iteration, ((y - 2) * 100 + x) as u32);
        }
    }
}

#[test]
fn test_shift_both_axes() {
    let grid = filled_grid(5, 5);
    grid.shift(-1, 1);
    assert_eq!(grid.get(0, 1).iteration, 1);
    assert_eq!(grid.get(3, 4).iteration, 304);
    assert!(!grid.is_complete(4, 2));
    assert!(!grid.is_complete(2, 0));
    assert_eq!(grid.complete_count(), 16);
}

#[test]
fn test_shift_beyond_dimension_clears_everything() {
    let grid = filled_grid(4, 4);
    grid.shift(4, 0);
    assert_eq!(grid.complete_count(), 0);

    let grid = filled_grid(4, 4);
    grid.shift(0, -9);
    assert_eq!(grid.complete_count(), 0);
}

#[test]
fn test_shift_zero_is_noop() {
    let grid = filled_grid(3, 3);
    grid.shift(0, 0);
    assert_eq!(grid.complete_count(), 9);
    assert_eq!(grid.get(2, 1).iteration, 102);
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

#[test]
fn test_iterations_snapshot_is_row_major() {
    let grid = filled_grid(4, 2);
    let snap = grid.iterations();
    assert_eq!(snap.dim(), (2, 4));
    assert_eq!(snap[[1, 3]], 103);
    assert_eq!(grid.snapshot()[[0, 2]].iteration, 2);
}
