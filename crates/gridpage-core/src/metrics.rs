#![forbid(unsafe_code)]

//! Per-cell pixel metrics.
//!
//! The rendering layer measures one laid-out reference cell and hands its
//! width to [`CellMetrics::from_measured_width`]; the height follows from the
//! fixed aspect ratio. Until a measurement exists the metrics are
//! [`CellMetrics::NOT_READY`] (`0 × 0`) and every downstream geometry
//! operation must be suppressed.

use serde::{Deserialize, Serialize};

use crate::CELL_ASPECT_RATIO;

/// Pixel size of one grid cell, excluding the gap.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CellMetrics {
    pub cell_width: f64,
    pub cell_height: f64,
}

impl CellMetrics {
    /// Metrics before the grid has been measured.
    pub const NOT_READY: Self = Self {
        cell_width: 0.0,
        cell_height: 0.0,
    };

    /// Metrics with explicit width and height.
    #[inline]
    #[must_use]
    pub const fn new(cell_width: f64, cell_height: f64) -> Self {
        Self {
            cell_width,
            cell_height,
        }
    }

    /// Derive metrics from a measured reference-cell width using the default
    /// 1.6:1 aspect ratio.
    #[must_use]
    pub fn from_measured_width(measured: Option<f64>) -> Self {
        Self::from_measured_width_with_ratio(measured, CELL_ASPECT_RATIO)
    }

    /// Derive metrics from a measured reference-cell width.
    ///
    /// A missing, non-positive or non-finite measurement, or an unusable
    /// ratio, yields [`Self::NOT_READY`].
    #[must_use]
    pub fn from_measured_width_with_ratio(measured: Option<f64>, aspect_ratio: f64) -> Self {
        let Some(width) = measured else {
            return Self::NOT_READY;
        };
        if !(width.is_finite() && width > 0.0 && aspect_ratio.is_finite() && aspect_ratio > 0.0) {
            return Self::NOT_READY;
        }
        Self {
            cell_width: width,
            cell_height: width / aspect_ratio,
        }
    }

    /// Whether both dimensions are usable divisors.
    #[inline]
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.cell_width.is_finite()
            && self.cell_height.is_finite()
            && self.cell_width > 0.0
            && self.cell_height > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_follows_aspect_ratio() {
        let m = CellMetrics::from_measured_width(Some(40.0));
        assert_eq!(m.cell_width, 40.0);
        assert_eq!(m.cell_height, 25.0);
        assert!(m.is_ready());
    }

    #[test]
    fn missing_measurement_is_not_ready() {
        let m = CellMetrics::from_measured_width(None);
        assert_eq!(m, CellMetrics::NOT_READY);
        assert!(!m.is_ready());
    }

    #[test]
    fn zero_and_negative_widths_are_not_ready() {
        assert!(!CellMetrics::from_measured_width(Some(0.0)).is_ready());
        assert!(!CellMetrics::from_measured_width(Some(-3.0)).is_ready());
        assert!(!CellMetrics::from_measured_width(Some(f64::NAN)).is_ready());
    }

    #[test]
    fn bad_ratio_is_not_ready() {
        assert!(!CellMetrics::from_measured_width_with_ratio(Some(40.0), 0.0).is_ready());
        assert!(!CellMetrics::from_measured_width_with_ratio(Some(40.0), f64::INFINITY).is_ready());
    }

    #[test]
    fn explicit_zero_height_is_not_ready() {
        assert!(!CellMetrics::new(40.0, 0.0).is_ready());
    }
}
