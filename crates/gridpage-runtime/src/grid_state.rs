#![forbid(unsafe_code)]

//! Responsive grid state.
//!
//! [`GridState`] keeps the latest viewport classification and cell metrics.
//! The host reports every viewport resize and every re-measurement of the
//! reference cell; sessions read a [`GridGeometry`] snapshot per event.
//!
//! # Invariants
//!
//! 1. Before the first cell measurement the metrics are
//!    [`CellMetrics::NOT_READY`] and [`GridGeometry::mapper`] is `None`.
//! 2. A notification that does not change the state reports `false`.

use gridpage_core::{CellMetrics, CoordinateMapper, GridConfig, ViewportClass};
use gridpage_layout::GridContext;
use tracing::debug;

/// Viewport classification and cell metrics, recomputed on resize.
#[derive(Debug, Clone, PartialEq)]
pub struct GridState {
    config: GridConfig,
    viewport: ViewportClass,
    metrics: CellMetrics,
}

/// What a session needs from the grid for one event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    /// `None` until the grid has been measured.
    pub mapper: Option<CoordinateMapper>,
    pub grid: GridContext,
    pub min_section_rows: u32,
}

impl GridState {
    /// Unmeasured state: mobile columns, metrics not ready.
    #[must_use]
    pub fn new(config: GridConfig) -> Self {
        Self {
            config,
            viewport: ViewportClass::default(),
            metrics: CellMetrics::NOT_READY,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &GridConfig {
        &self.config
    }

    #[must_use]
    pub const fn viewport(&self) -> ViewportClass {
        self.viewport
    }

    #[must_use]
    pub const fn metrics(&self) -> CellMetrics {
        self.metrics
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.metrics.is_ready()
    }

    /// Reclassify for a new viewport width. Returns whether the class changed.
    pub fn on_viewport_width(&mut self, width_px: f64) -> bool {
        let next = self.config.classify(width_px);
        if next == self.viewport {
            return false;
        }
        debug!(
            width_px,
            columns = next.columns,
            is_mobile = next.is_mobile,
            "viewport reclassified"
        );
        self.viewport = next;
        true
    }

    /// Recompute metrics from a reference-cell measurement. `None` means the
    /// cell is not laid out (yet). Returns whether the metrics changed.
    pub fn on_cell_measured(&mut self, measured_width: Option<f64>) -> bool {
        let next =
            CellMetrics::from_measured_width_with_ratio(measured_width, self.config.cell_aspect_ratio);
        if next == self.metrics {
            return false;
        }
        debug!(
            cell_width = next.cell_width,
            cell_height = next.cell_height,
            ready = next.is_ready(),
            "cell metrics updated"
        );
        self.metrics = next;
        true
    }

    /// Active context and its column count.
    #[must_use]
    pub fn grid_context(&self) -> GridContext {
        GridContext::from(self.viewport)
    }

    #[must_use]
    pub fn mapper(&self) -> Option<CoordinateMapper> {
        CoordinateMapper::new(self.metrics, self.config.gap_px)
    }

    #[must_use]
    pub fn geometry(&self) -> GridGeometry {
        GridGeometry {
            mapper: self.mapper(),
            grid: self.grid_context(),
            min_section_rows: self.config.min_section_rows,
        }
    }

    /// Rendered pixel height of a section, or `None` before measurement.
    #[must_use]
    pub fn section_pixel_height(&self, rows: u32) -> Option<f64> {
        self.mapper().map(|m| m.section_pixel_height(rows))
    }

    /// Rendered pixel width of the canvas, or `None` before measurement.
    #[must_use]
    pub fn canvas_pixel_width(&self) -> Option<f64> {
        self.mapper()
            .map(|m| m.canvas_pixel_width(self.viewport.columns))
    }
}

impl Default for GridState {
    fn default() -> Self {
        Self::new(GridConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridpage_core::ViewContext;

    #[test]
    fn starts_mobile_and_not_ready() {
        let state = GridState::default();
        assert_eq!(state.grid_context(), GridContext::new(ViewContext::Mobile, 12));
        assert!(!state.is_ready());
        assert_eq!(state.mapper(), None);
        assert_eq!(state.section_pixel_height(24), None);
    }

    #[test]
    fn viewport_changes_report_only_real_transitions() {
        let mut state = GridState::default();
        assert!(!state.on_viewport_width(375.0));
        assert!(state.on_viewport_width(1280.0));
        assert!(!state.on_viewport_width(1024.0));
        assert_eq!(state.grid_context(), GridContext::new(ViewContext::Desktop, 24));
        assert!(state.on_viewport_width(767.9));
        assert_eq!(state.viewport().columns, 12);
    }

    #[test]
    fn measurement_makes_mapper_available() {
        let mut state = GridState::default();
        assert!(state.on_cell_measured(Some(40.0)));
        assert_eq!(state.metrics(), CellMetrics::new(40.0, 25.0));
        let mapper = state.mapper().unwrap();
        assert_eq!(mapper.column_pitch(), 48.0);
        assert_eq!(mapper.row_pitch(), 33.0);
        assert!(!state.on_cell_measured(Some(40.0)));
    }

    #[test]
    fn losing_the_measurement_suppresses_geometry() {
        let mut state = GridState::default();
        state.on_cell_measured(Some(40.0));
        assert!(state.on_cell_measured(None));
        assert!(state.geometry().mapper.is_none());
    }

    #[test]
    fn pixel_sizes_follow_metrics() {
        let mut state = GridState::default();
        state.on_viewport_width(1280.0);
        state.on_cell_measured(Some(40.0));
        // 24 rows * 25px + 23 gaps * 8px
        assert_eq!(state.section_pixel_height(24), Some(784.0));
        // 24 cols * 40px + 23 gaps * 8px
        assert_eq!(state.canvas_pixel_width(), Some(1144.0));
    }
}
