#![forbid(unsafe_code)]

//! Runtime: interaction sessions and the editor store.
//!
//! # Role in gridpage
//! `gridpage-runtime` turns a stream of host events (viewport resizes, cell
//! measurements, palette drags, item pointer gestures, section handle drags)
//! into page tree changes. Each interaction is an explicit state machine
//! that reports a transition with an effect; [`Editor`] owns the tree and
//! applies those effects.
//!
//! # Primary responsibilities
//! - **Grid state**: latest viewport class and cell metrics.
//! - **Grid visibility**: which section shows its overlay.
//! - **Sessions**: palette drag/drop, item move/resize, section resize.
//! - **Editor**: one owner for the tree, sessions and persistence calls.
//!
//! # How it fits in the system
//! Geometry comes from `gridpage-core`, every change goes through
//! `gridpage-layout`'s `PageTree`. `gridpage-web` adapts DOM events into the
//! session events defined here.

pub mod drag_drop;
pub mod editor;
pub mod grid_state;
pub mod item_gesture;
pub mod section_resize;
pub mod session;
pub mod visibility;

pub use drag_drop::{
    PaletteDragEffect, PaletteDragEvent, PaletteDragSession, PaletteDragState,
    PaletteDragTransition,
};
pub use editor::{Editor, Unmounted};
pub use grid_state::{GridGeometry, GridState};
pub use item_gesture::{
    GestureTarget, ItemGestureEffect, ItemGestureEvent, ItemGestureSession, ItemGestureState,
    ItemGestureTransition, ResizeHandle,
};
pub use section_resize::{
    SectionResizeEffect, SectionResizeEvent, SectionResizeSession, SectionResizeState,
    SectionResizeTransition, resized_height,
};
pub use session::{CancelReason, NoopReason};
pub use visibility::GridVisibility;
