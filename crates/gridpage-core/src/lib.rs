#![forbid(unsafe_code)]

//! Core: grid constants, geometry primitives, and the pure coordinate rules
//! of the page builder.
//!
//! # Role in gridpage
//! `gridpage-core` is the geometry layer. It turns raw viewport widths and
//! measured cell sizes into a responsive grid configuration, converts pointer
//! pixels into grid cells and back, and clamps placements into the grid.
//!
//! # Primary responsibilities
//! - **Viewport classification**: column count and device context from width.
//! - **Cell metrics**: per-cell pixel size from a measured reference cell.
//! - **Coordinate mapping**: pixel ↔ cell conversions with a fixed gap.
//! - **Bounds clamping**: position first, then extent against the clamped
//!   position.
//!
//! # How it fits in the system
//! `gridpage-layout` stores placements in cell units and routes every
//! geometry mutation through [`clamp`]. `gridpage-runtime` feeds pointer
//! coordinates through [`mapper::CoordinateMapper`] during interaction
//! sessions. Nothing in this crate touches a DOM, a store, or I/O other than
//! config loading.

pub mod clamp;
pub mod config;
pub mod geometry;
pub mod logging;
pub mod mapper;
pub mod metrics;
pub mod viewport;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, warn};

pub use clamp::{clamp_placement, clamp_to_grid};
pub use config::{ConfigError, GridConfig};
pub use geometry::{CellExtent, CellPoint, GridRect, PixelPoint, PixelRect, PixelSize};
pub use mapper::CoordinateMapper;
pub use metrics::CellMetrics;
pub use viewport::{ViewContext, ViewportClass, classify_viewport};

/// Inter-cell gap in CSS pixels.
pub const GAP_PX: f64 = 8.0;

/// Cell width : cell height.
pub const CELL_ASPECT_RATIO: f64 = 1.6;

/// Viewports narrower than this are mobile.
pub const MOBILE_BREAKPOINT_PX: f64 = 768.0;

/// Column count below the breakpoint.
pub const MOBILE_COLUMNS: u32 = 12;

/// Column count at or above the breakpoint.
pub const DESKTOP_COLUMNS: u32 = 24;

/// Sections never shrink below this many rows.
pub const MIN_SECTION_ROWS: u32 = 12;

/// Row count of a freshly created section.
pub const DEFAULT_SECTION_ROWS: u32 = 24;

/// Background of a freshly created section.
pub const DEFAULT_SECTION_BACKGROUND: &str = "#ffffff";
