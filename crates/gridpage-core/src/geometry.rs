#![forbid(unsafe_code)]

//! Geometric primitives in two spaces: pixels and grid cells.
//!
//! Pixel values are `f64` CSS pixels relative to a grid container's origin.
//! Cell values come in two flavours: signed, unclamped [`CellPoint`] /
//! [`CellExtent`] produced straight from pointer math, and the clamped,
//! always-valid [`GridRect`] that the page tree stores.

use serde::{Deserialize, Serialize};

/// A pixel coordinate relative to a grid container's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - origin`.
    #[inline]
    #[must_use]
    pub fn offset_from(self, origin: Self) -> Self {
        Self::new(self.x - origin.x, self.y - origin.y)
    }

    /// Whether both components are finite numbers.
    #[inline]
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A pixel extent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelSize {
    pub width: f64,
    pub height: f64,
}

impl PixelSize {
    #[inline]
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    #[must_use]
    pub const fn origin(&self) -> PixelPoint {
        PixelPoint::new(self.x, self.y)
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> PixelSize {
        PixelSize::new(self.width, self.height)
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    #[must_use]
    pub fn contains(&self, point: PixelPoint) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

/// An unclamped cell coordinate. May be negative or past the grid edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellPoint {
    pub col: i64,
    pub row: i64,
}

impl CellPoint {
    #[inline]
    #[must_use]
    pub const fn new(col: i64, row: i64) -> Self {
        Self { col, row }
    }
}

/// An unclamped cell extent. May be zero or negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellExtent {
    pub width: i64,
    pub height: i64,
}

impl CellExtent {
    #[inline]
    #[must_use]
    pub const fn new(width: i64, height: i64) -> Self {
        Self { width, height }
    }
}

/// A clamped placement in grid cells.
///
/// Produced by [`crate::clamp::clamp_to_grid`]; for the grid it was clamped
/// against it satisfies `x < cols`, `y < rows`, `x + width <= cols`,
/// `y + height <= rows`, `width >= 1`, `height >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl GridRect {
    #[inline]
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    #[inline]
    #[must_use]
    pub const fn origin(&self) -> CellPoint {
        CellPoint::new(self.x as i64, self.y as i64)
    }

    #[inline]
    #[must_use]
    pub const fn extent(&self) -> CellExtent {
        CellExtent::new(self.width as i64, self.height as i64)
    }

    /// Whether this rect satisfies the placement bounds of a grid with
    /// `grid_cols` columns and `section_rows` rows.
    #[must_use]
    pub const fn fits(&self, grid_cols: u32, section_rows: u32) -> bool {
        self.width >= 1
            && self.height >= 1
            && self.x < grid_cols
            && self.y < section_rows
            && self.right() <= grid_cols as u64
            && self.bottom() <= section_rows as u64
    }
}
