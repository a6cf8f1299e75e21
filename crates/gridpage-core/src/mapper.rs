#![forbid(unsafe_code)]

//! Bidirectional pixel ↔ grid-cell conversion.
//!
//! All conversions use the cell *pitch*: cell size plus the inter-cell gap.
//!
//! | conversion | rule |
//! |---|---|
//! | [`CoordinateMapper::pixel_to_grid`] | `floor(p / pitch)` |
//! | [`CoordinateMapper::grid_to_pixel`] | `cell * pitch` |
//! | [`CoordinateMapper::pixel_extent_to_grid_extent`] | `round(p / pitch)` |
//! | [`CoordinateMapper::snap_to_nearest`] | `round(p / pitch)` |
//!
//! Positions snap their leading edge down; extents and settled item drags
//! round to the nearest whole cell. Rounding is half-up (`-2.5 → -2`,
//! `2.5 → 3`), the same tie rule a browser's `Math.round` uses.
//!
//! Input pixel coordinates are relative to the grid container's own origin;
//! callers subtract the container offset first.
//!
//! # Failure Modes
//!
//! A mapper can only be built from ready metrics, so no conversion ever
//! divides by zero. Callers holding [`CellMetrics::NOT_READY`] get `None`
//! from [`CoordinateMapper::new`] and must skip the geometry step.

use crate::geometry::{CellExtent, CellPoint, GridRect, PixelPoint, PixelRect, PixelSize};
use crate::metrics::CellMetrics;

/// Pure pixel/cell transform for one set of cell metrics and gap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    metrics: CellMetrics,
    gap: f64,
}

impl CoordinateMapper {
    /// Build a mapper, or `None` when the metrics are not ready or the gap is
    /// negative or non-finite.
    #[must_use]
    pub fn new(metrics: CellMetrics, gap: f64) -> Option<Self> {
        if !metrics.is_ready() || !gap.is_finite() || gap < 0.0 {
            return None;
        }
        Some(Self { metrics, gap })
    }

    /// Mapper using the default 8px gap.
    #[must_use]
    pub fn with_default_gap(metrics: CellMetrics) -> Option<Self> {
        Self::new(metrics, crate::GAP_PX)
    }

    #[inline]
    #[must_use]
    pub const fn metrics(&self) -> CellMetrics {
        self.metrics
    }

    #[inline]
    #[must_use]
    pub const fn gap(&self) -> f64 {
        self.gap
    }

    /// Horizontal distance between the leading edges of adjacent cells.
    #[inline]
    #[must_use]
    pub fn column_pitch(&self) -> f64 {
        self.metrics.cell_width + self.gap
    }

    /// Vertical distance between the leading edges of adjacent rows.
    #[inline]
    #[must_use]
    pub fn row_pitch(&self) -> f64 {
        self.metrics.cell_height + self.gap
    }

    /// Cell containing a container-relative pixel point.
    #[must_use]
    pub fn pixel_to_grid(&self, point: PixelPoint) -> CellPoint {
        CellPoint::new(
            floor_cells(point.x, self.column_pitch()),
            floor_cells(point.y, self.row_pitch()),
        )
    }

    /// Leading-edge pixel position of a cell.
    #[must_use]
    pub fn grid_to_pixel(&self, cell: CellPoint) -> PixelPoint {
        PixelPoint::new(
            cell.col as f64 * self.column_pitch(),
            cell.row as f64 * self.row_pitch(),
        )
    }

    /// Nearest whole-cell extent for a pixel extent.
    #[must_use]
    pub fn pixel_extent_to_grid_extent(&self, size: PixelSize) -> CellExtent {
        CellExtent::new(
            round_cells(size.width, self.column_pitch()),
            round_cells(size.height, self.row_pitch()),
        )
    }

    /// Nearest cell to a pixel offset. Used when a moved item settles.
    #[must_use]
    pub fn snap_to_nearest(&self, point: PixelPoint) -> CellPoint {
        CellPoint::new(
            round_cells(point.x, self.column_pitch()),
            round_cells(point.y, self.row_pitch()),
        )
    }

    /// Whole-row delta for a vertical pointer travel.
    #[must_use]
    pub fn rows_for_pixel_delta(&self, dy: f64) -> i64 {
        round_cells(dy, self.row_pitch())
    }

    /// Rendered pixel size of an extent: cells plus the gaps between them.
    ///
    /// Extents below one cell render as zero.
    #[must_use]
    pub fn grid_extent_to_pixel_extent(&self, extent: CellExtent) -> PixelSize {
        PixelSize::new(
            span_px(extent.width, self.metrics.cell_width, self.gap),
            span_px(extent.height, self.metrics.cell_height, self.gap),
        )
    }

    /// Rendered pixel rectangle of a placement.
    #[must_use]
    pub fn grid_rect_to_pixels(&self, rect: GridRect) -> PixelRect {
        let origin = self.grid_to_pixel(rect.origin());
        let size = self.grid_extent_to_pixel_extent(rect.extent());
        PixelRect::new(origin.x, origin.y, size.width, size.height)
    }

    /// Pixel height of a section with `rows` rows.
    #[must_use]
    pub fn section_pixel_height(&self, rows: u32) -> f64 {
        span_px(i64::from(rows), self.metrics.cell_height, self.gap)
    }

    /// Pixel width of a canvas with `cols` columns.
    #[must_use]
    pub fn canvas_pixel_width(&self, cols: u32) -> f64 {
        span_px(i64::from(cols), self.metrics.cell_width, self.gap)
    }
}

/// `floor(px / pitch)`, corrected against the cell edges themselves so a
/// point exactly on `c * pitch` lands in cell `c` and nothing short of it
/// does.
fn floor_cells(px: f64, pitch: f64) -> i64 {
    let mut cells = (px / pitch).floor();
    if cells * pitch > px {
        cells -= 1.0;
    } else if (cells + 1.0) * pitch <= px {
        cells += 1.0;
    }
    // `as` saturates and maps NaN to 0.
    cells as i64
}

fn round_cells(px: f64, pitch: f64) -> i64 {
    round_half_up(px / pitch) as i64
}

fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

fn span_px(cells: i64, cell: f64, gap: f64) -> f64 {
    if cells <= 0 {
        return 0.0;
    }
    cells as f64 * cell + (cells - 1) as f64 * gap
}
