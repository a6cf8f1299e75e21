#![forbid(unsafe_code)]

//! `gridpage-web` connects a browser host to the gridpage editor.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment (JS) pushes DOM listener
//!   callbacks and measurements; nothing here touches the DOM directly.
//! - **Deterministic**: every callback yields a [`DomDispatch`] describing the
//!   session transitions it caused and the listener command the host must run.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! This crate does not bind to `wasm-bindgen`. A thin JS shim forwards
//! callbacks either through the typed methods on [`GridPageDomAdapter`] or,
//! with the `event-json` feature, as JSON through [`parse_dom_event`].

pub mod adapter;
pub mod dom;
pub mod event;

pub use adapter::{
    DomAdapterConfig, DomDispatch, DomIgnoredReason, DomLogEntry, DomLogOutcome, DomPhase,
    GridPageDomAdapter, SessionTransition,
};
pub use dom::{DomNodeId, HostCommand, is_boundary_leave, to_container};
pub use event::DomEvent;
#[cfg(feature = "event-json")]
pub use event::{DomEventParseError, parse_dom_event};
