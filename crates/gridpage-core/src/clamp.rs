#![forbid(unsafe_code)]

//! Bounds clamping of grid placements.
//!
//! ```text
//! col'    = max(0, min(gridCols - 1, col))
//! row'    = max(0, min(sectionRows - 1, row))
//! width'  = max(1, min(gridCols - col', width))
//! height' = max(1, min(sectionRows - row', height))
//! ```
//!
//! # Invariants
//!
//! 1. Position is clamped first; extent is clamped against the *clamped*
//!    position, so the result never pokes past the grid even when the
//!    requested position was out of range.
//! 2. For `gridCols >= 1` and `sectionRows >= 1` the result satisfies
//!    [`GridRect::fits`].
//! 3. Clamping is idempotent: `clamp(clamp(r)) == clamp(r)`.
//!
//! # Failure Modes
//!
//! None. Out-of-range input is always resolved, never rejected. A degenerate
//! grid (zero columns or rows) collapses to a `1 × 1` rect at the origin.

use crate::geometry::{CellExtent, CellPoint, GridRect};

/// Clamp a requested placement into a `grid_cols × section_rows` grid.
#[must_use]
pub fn clamp_to_grid(
    origin: CellPoint,
    extent: CellExtent,
    grid_cols: u32,
    section_rows: u32,
) -> GridRect {
    let cols = i64::from(grid_cols);
    let rows = i64::from(section_rows);

    let x = origin.col.min(cols - 1).max(0);
    let y = origin.row.min(rows - 1).max(0);
    let width = extent.width.min(cols - x).max(1);
    let height = extent.height.min(rows - y).max(1);

    GridRect::new(to_u32(x), to_u32(y), to_u32(width), to_u32(height))
}

/// Clamp a new position for an item whose extent should be kept.
///
/// The position is first pulled in far enough for the existing extent to fit
/// (`0 ..= gridCols - width`, `0 ..= sectionRows - height`), then the whole
/// placement goes through [`clamp_to_grid`]. The extent only changes when it
/// cannot fit the grid at all.
#[must_use]
pub fn clamp_placement(
    origin: CellPoint,
    extent: CellExtent,
    grid_cols: u32,
    section_rows: u32,
) -> GridRect {
    let max_col = i64::from(grid_cols).saturating_sub(extent.width).max(0);
    let max_row = i64::from(section_rows).saturating_sub(extent.height).max(0);
    let pulled = CellPoint::new(origin.col.min(max_col).max(0), origin.row.min(max_row).max(0));
    clamp_to_grid(pulled, extent, grid_cols, section_rows)
}

fn to_u32(value: i64) -> u32 {
    u32::try_from(value).unwrap_or(if value < 0 { 0 } else { u32::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clamp(col: i64, row: i64, w: i64, h: i64, cols: u32, rows: u32) -> GridRect {
        clamp_to_grid(CellPoint::new(col, row), CellExtent::new(w, h), cols, rows)
    }

    #[test]
    fn in_range_placement_is_unchanged() {
        assert_eq!(clamp(5, 3, 2, 2, 24, 24), GridRect::new(5, 3, 2, 2));
    }

    #[test]
    fn width_shrinks_to_remaining_columns() {
        assert_eq!(clamp(23, 0, 5, 5, 24, 24), GridRect::new(23, 0, 1, 5));
    }

    #[test]
    fn negative_position_clamps_to_origin() {
        assert_eq!(clamp(-4, -9, 3, 2, 24, 24), GridRect::new(0, 0, 3, 2));
    }

    #[test]
    fn extent_is_clamped_against_clamped_position() {
        // Unclamped x=30 would give gridCols - x = -6; the clamped x=23 gives 1.
        assert_eq!(clamp(30, 40, 8, 8, 24, 24), GridRect::new(23, 23, 1, 1));
    }

    #[test]
    fn zero_and_negative_extents_become_one() {
        assert_eq!(clamp(0, 0, 0, -5, 12, 12), GridRect::new(0, 0, 1, 1));
    }

    #[test]
    fn degenerate_grid_collapses_to_unit_rect() {
        assert_eq!(clamp(7, 7, 3, 3, 0, 0), GridRect::new(0, 0, 1, 1));
    }

    #[test]
    fn huge_values_do_not_overflow() {
        let r = clamp(i64::MAX, i64::MIN, i64::MAX, i64::MAX, u32::MAX, 12);
        assert_eq!(r, GridRect::new(u32::MAX - 1, 0, 1, 12));
    }

    #[test]
    fn placement_pulls_position_in_to_keep_extent() {
        let r = clamp_placement(CellPoint::new(23, 0), CellExtent::new(2, 2), 24, 24);
        assert_eq!(r, GridRect::new(22, 0, 2, 2));
    }

    #[test]
    fn placement_pulls_row_in_to_keep_extent() {
        let r = clamp_placement(CellPoint::new(0, 30), CellExtent::new(4, 11), 24, 24);
        assert_eq!(r, GridRect::new(0, 13, 4, 11));
    }

    #[test]
    fn placement_with_oversized_extent_shrinks_it() {
        let r = clamp_placement(CellPoint::new(5, 0), CellExtent::new(20, 2), 12, 24);
        assert_eq!(r, GridRect::new(0, 0, 12, 2));
    }
}
