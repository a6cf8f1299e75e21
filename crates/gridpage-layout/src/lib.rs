#![forbid(unsafe_code)]

//! Layout: the page document and the only API that changes it.
//!
//! # Role in gridpage
//! `gridpage-layout` owns the persisted page shape (pages, sections, items
//! with a desktop and a mobile style each), the palette's default extents,
//! and [`PageTree`], the immutable mutator every geometry change goes
//! through. It also defines the persistence boundary: a JSON codec with
//! validation and load-time repair, and single-slot [`PageStore`]s.
//!
//! # How it fits in the system
//! Geometry comes from `gridpage-core`: every placement written here passes
//! through [`gridpage_core::clamp_to_grid`] or
//! [`gridpage_core::clamp_placement`]. `gridpage-runtime` drives the tree
//! from interaction sessions and never edits a [`Page`] directly.

pub mod defaults;
pub mod document;
pub mod id;
pub mod model;
pub mod store;
pub mod tree;

pub use defaults::{CellSize, ExtentPair, ItemDefaults};
pub use document::{DocumentError, Repair, repair};
pub use id::{IdAllocator, ItemId, PageId, SectionId};
pub use model::{
    DualStyle, ExtraFields, GridPosition, Item, ItemStyle, ItemType, Page, Section, Timestamp,
    VisualProps,
};
pub use store::{FilePageStore, MemoryPageStore, PageStore, StoreError};
pub use tree::{BoundsViolation, CreationClamp, GridContext, LayoutRules, PageTree, Selection};
