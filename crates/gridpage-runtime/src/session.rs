#![forbid(unsafe_code)]

//! Vocabulary shared by the interaction sessions.

use serde::{Deserialize, Serialize};

/// Why an active session ended without committing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    /// The drag ended over something that is not a section.
    DroppedOutside,
    /// Dropped before any preview existed.
    DroppedWithoutPreview,
    /// The drag source reported the end of the drag.
    DragEnded,
    PointerCancel,
    /// The section or item the session targets no longer exists.
    TargetRemoved,
    /// Canceled by the owner, e.g. on unmount.
    Programmatic,
}

/// Explicit no-op diagnostics for events a session safely ignores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoopReason {
    IdleWithoutActiveSession,
    /// Cell metrics are not measured yet; geometry is suppressed.
    MetricsNotReady,
    UnknownSection,
    UnknownItem,
    /// Shapes have no default extent and cannot be dropped from the palette.
    NoPaletteDefault,
    /// A leave event for a section other than the previewed one.
    LeaveOfOtherSection,
    /// A leave event while no preview is shown.
    NothingPreviewed,
    NonFinitePosition,
    PreviewUnchanged,
}

/// Monotonic transition ids for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct TransitionCounter(u64);

impl TransitionCounter {
    pub(crate) fn next(&mut self) -> u64 {
        self.0 = self.0.saturating_add(1);
        self.0
    }
}
