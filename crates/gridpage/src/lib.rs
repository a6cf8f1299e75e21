#![forbid(unsafe_code)]

//! gridpage public facade crate.
//!
//! Re-exports the common types of the geometry, layout, runtime and web
//! crates, a single [`Error`] for their fallible operations, and a prelude
//! for day-to-day usage.

use std::fmt;
use std::path::Path;

// --- Geometry re-exports ---------------------------------------------------

pub use gridpage_core::{
    CellExtent, CellMetrics, CellPoint, ConfigError, CoordinateMapper, GridConfig, GridRect,
    PixelPoint, PixelRect, PixelSize, ViewContext, ViewportClass, clamp_placement, clamp_to_grid,
    classify_viewport,
};

// --- Layout re-exports -----------------------------------------------------

pub use gridpage_layout::{
    DocumentError, FilePageStore, GridContext, Item, ItemDefaults, ItemId, ItemType, LayoutRules,
    MemoryPageStore, Page, PageStore, PageTree, Repair, Section, SectionId, StoreError, Timestamp,
};

// --- Runtime re-exports ----------------------------------------------------

pub use gridpage_runtime::{
    CancelReason, Editor, GridState, ItemGestureEvent, NoopReason, PaletteDragEvent, ResizeHandle,
    SectionResizeEvent,
};

// --- Web re-exports --------------------------------------------------------

#[cfg(feature = "web")]
pub use gridpage_web::{DomAdapterConfig, DomDispatch, DomEvent, GridPageDomAdapter, HostCommand};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for gridpage hosts.
#[derive(Debug)]
pub enum Error {
    /// Grid or defaults config could not be loaded.
    Config(ConfigError),
    /// A page document could not be decoded or encoded.
    Document(DocumentError),
    /// The page store failed.
    Store(StoreError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Document(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Document(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<DocumentError> for Error {
    fn from(err: DocumentError) -> Self {
        Self::Document(err)
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

/// Standard result type for gridpage APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Setup ----------------------------------------------------------------

/// Build layout rules from optional TOML files. A missing path keeps the
/// built-in table.
pub fn load_rules(grid_toml: Option<&Path>, defaults_toml: Option<&Path>) -> Result<LayoutRules> {
    let grid = match grid_toml {
        Some(path) => GridConfig::from_toml_file(path)?,
        None => GridConfig::default(),
    };
    let defaults = match defaults_toml {
        Some(path) => ItemDefaults::from_toml_file(path)?,
        None => ItemDefaults::default(),
    };
    Ok(LayoutRules::new(grid, defaults))
}

/// An editor over the page in `store`, or over a fresh page when the store
/// is empty. Load-time repairs are returned alongside.
pub fn open_editor(
    rules: LayoutRules,
    store: &impl PageStore,
) -> Result<(Editor, Option<Vec<Repair>>)> {
    let mut editor = Editor::new(std::sync::Arc::new(rules));
    let repairs = editor.load_from(store)?;
    Ok((editor, repairs))
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        CellPoint, Editor, Error, GridConfig, GridRect, ItemType, LayoutRules, PageStore,
        PageTree, PixelPoint, Result, SectionId, ViewContext,
    };

    #[cfg(feature = "web")]
    pub use crate::{DomEvent, GridPageDomAdapter, HostCommand};

    pub use crate::{core, layout, runtime};
}

pub use gridpage_core as core;
pub use gridpage_layout as layout;
pub use gridpage_runtime as runtime;
#[cfg(feature = "web")]
pub use gridpage_web as web;
