#![forbid(unsafe_code)]

//! Palette → canvas drag/drop session.
//!
//! ```text
//! Idle -> Dragging <-> PreviewingAt -> Idle (drop)
//!            \              |
//!             \-------------+--> Idle (drop outside, drag end)
//! ```
//!
//! Leaving the previewed section discards the preview and falls back to
//! `Dragging`, so the same drag can still hover and drop on another section.
//!
//! Entering `Dragging` captures the palette item type only. Every drag-over
//! recomputes the hovered cell from the container-relative pointer position
//! and a preview rect clamped against the hovered section. A drop commits
//! through [`PageTree::add_item`], which the owner applies; the session
//! itself never touches the tree.
//!
//! # Invariants
//!
//! 1. Every preview rect fits the active column count and the hovered
//!    section's height.
//! 2. Each drag-over is computed from the pointer position alone, never from
//!    the previous preview.
//! 3. Starting a drag while another is open supersedes the stale one.
//! 4. Only a drop, a drop outside or the end of the drag returns to `Idle`.
//!
//! # Failure Modes
//!
//! Events that cannot be acted on (idle session, unmeasured grid, unknown
//! section, non-finite pointer) produce a `Noop` transition and leave the
//! state untouched.

use gridpage_core::{CellPoint, GridRect, PixelPoint, clamp_to_grid};
use gridpage_layout::{ItemType, PageTree, SectionId};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::grid_state::GridGeometry;
use crate::session::{CancelReason, NoopReason, TransitionCounter};

/// Palette drag lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PaletteDragState {
    #[default]
    Idle,
    Dragging {
        item_type: ItemType,
    },
    PreviewingAt {
        item_type: ItemType,
        section: SectionId,
        /// Hovered cell before clamping; this is what a drop commits.
        cell: CellPoint,
        preview: GridRect,
    },
}

impl PaletteDragState {
    #[must_use]
    pub fn item_type(&self) -> Option<ItemType> {
        match self {
            Self::Idle => None,
            Self::Dragging { item_type } | Self::PreviewingAt { item_type, .. } => Some(*item_type),
        }
    }
}

/// Host input for the palette session. Positions are relative to the
/// hovered section's grid container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PaletteDragEvent {
    Start {
        item_type: ItemType,
    },
    Over {
        section: SectionId,
        position: PixelPoint,
    },
    /// A true boundary exit of `section`.
    Leave {
        section: SectionId,
    },
    Drop {
        section: SectionId,
        position: PixelPoint,
    },
    DropOutside,
    /// The palette source saw the drag end.
    End,
}

/// Effect of one palette transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum PaletteDragEffect {
    Started {
        item_type: ItemType,
    },
    Superseded {
        previous: ItemType,
        item_type: ItemType,
    },
    PreviewUpdated {
        section: SectionId,
        cell: CellPoint,
        preview: GridRect,
    },
    /// The pointer left `section`; its preview is gone but the drag goes on.
    PreviewCleared {
        section: SectionId,
    },
    /// The owner adds `item_type` at `cell` in `section`.
    Committed {
        section: SectionId,
        item_type: ItemType,
        cell: CellPoint,
    },
    Canceled {
        item_type: ItemType,
        reason: CancelReason,
    },
    Noop {
        reason: NoopReason,
    },
}

/// One palette session transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteDragTransition {
    pub transition_id: u64,
    pub from: PaletteDragState,
    pub to: PaletteDragState,
    pub effect: PaletteDragEffect,
}

/// Palette drag/drop state machine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaletteDragSession {
    state: PaletteDragState,
    transitions: TransitionCounter,
}

impl PaletteDragSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> &PaletteDragState {
        &self.state
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self.state, PaletteDragState::Idle)
    }

    /// Apply one host event.
    pub fn apply_event(
        &mut self,
        event: &PaletteDragEvent,
        geometry: &GridGeometry,
        tree: &PageTree,
    ) -> PaletteDragTransition {
        let from = self.state.clone();
        match (&from, event) {
            (_, PaletteDragEvent::Start { item_type }) => {
                if tree.rules().defaults.get(*item_type).is_none() {
                    return self.noop(NoopReason::NoPaletteDefault);
                }
                let effect = match from.item_type() {
                    Some(previous) => PaletteDragEffect::Superseded {
                        previous,
                        item_type: *item_type,
                    },
                    None => PaletteDragEffect::Started {
                        item_type: *item_type,
                    },
                };
                self.transition(
                    PaletteDragState::Dragging {
                        item_type: *item_type,
                    },
                    effect,
                )
            }

            (PaletteDragState::Idle, _) => self.noop(NoopReason::IdleWithoutActiveSession),

            (_, PaletteDragEvent::Over { section, position }) => {
                let Some(item_type) = from.item_type() else {
                    return self.noop(NoopReason::IdleWithoutActiveSession);
                };
                let (cell, preview) = match hover(item_type, section, *position, geometry, tree) {
                    Ok(hit) => hit,
                    Err(reason) => return self.noop(reason),
                };
                let unchanged = matches!(
                    &from,
                    PaletteDragState::PreviewingAt { section: current, cell: current_cell, .. }
                        if current == section && *current_cell == cell
                );
                if unchanged {
                    return self.noop(NoopReason::PreviewUnchanged);
                }
                self.transition(
                    PaletteDragState::PreviewingAt {
                        item_type,
                        section: section.clone(),
                        cell,
                        preview,
                    },
                    PaletteDragEffect::PreviewUpdated {
                        section: section.clone(),
                        cell,
                        preview,
                    },
                )
            }

            (
                PaletteDragState::PreviewingAt {
                    item_type,
                    section: current,
                    ..
                },
                PaletteDragEvent::Leave { section },
            ) => {
                if current != section {
                    return self.noop(NoopReason::LeaveOfOtherSection);
                }
                self.transition(
                    PaletteDragState::Dragging {
                        item_type: *item_type,
                    },
                    PaletteDragEffect::PreviewCleared {
                        section: section.clone(),
                    },
                )
            }
            (PaletteDragState::Dragging { .. }, PaletteDragEvent::Leave { .. }) => {
                self.noop(NoopReason::NothingPreviewed)
            }

            (_, PaletteDragEvent::Drop { section, position }) => {
                let Some(item_type) = from.item_type() else {
                    return self.noop(NoopReason::IdleWithoutActiveSession);
                };
                // The drop position wins; the last preview is the fallback.
                let cell = match hover(item_type, section, *position, geometry, tree) {
                    Ok((cell, _)) => Some(cell),
                    Err(_) => match &from {
                        PaletteDragState::PreviewingAt {
                            section: previewed,
                            cell,
                            ..
                        } if previewed == section => Some(*cell),
                        _ => None,
                    },
                };
                match cell {
                    Some(cell) => self.transition(
                        PaletteDragState::Idle,
                        PaletteDragEffect::Committed {
                            section: section.clone(),
                            item_type,
                            cell,
                        },
                    ),
                    None => self.cancel(item_type, CancelReason::DroppedWithoutPreview),
                }
            }

            (_, PaletteDragEvent::DropOutside) => match from.item_type() {
                Some(item_type) => self.cancel(item_type, CancelReason::DroppedOutside),
                None => self.noop(NoopReason::IdleWithoutActiveSession),
            },

            (_, PaletteDragEvent::End) => match from.item_type() {
                Some(item_type) => self.cancel(item_type, CancelReason::DragEnded),
                None => self.noop(NoopReason::IdleWithoutActiveSession),
            },
        }
    }

    /// End an open session without committing.
    pub fn force_cancel(&mut self) -> Option<PaletteDragTransition> {
        let item_type = self.state.item_type()?;
        Some(self.cancel(item_type, CancelReason::Programmatic))
    }

    fn cancel(&mut self, item_type: ItemType, reason: CancelReason) -> PaletteDragTransition {
        self.transition(
            PaletteDragState::Idle,
            PaletteDragEffect::Canceled { item_type, reason },
        )
    }

    fn noop(&mut self, reason: NoopReason) -> PaletteDragTransition {
        trace!(?reason, state = ?self.state, "palette drag event ignored");
        let transition_id = self.transitions.next();
        PaletteDragTransition {
            transition_id,
            from: self.state.clone(),
            to: self.state.clone(),
            effect: PaletteDragEffect::Noop { reason },
        }
    }

    fn transition(
        &mut self,
        to: PaletteDragState,
        effect: PaletteDragEffect,
    ) -> PaletteDragTransition {
        let transition_id = self.transitions.next();
        let from = std::mem::replace(&mut self.state, to.clone());
        debug!(transition_id, effect = ?effect, "palette drag transition");
        PaletteDragTransition {
            transition_id,
            from,
            to,
            effect,
        }
    }
}

/// Hovered cell and clamped preview for `item_type` over `section`.
fn hover(
    item_type: ItemType,
    section_id: &SectionId,
    position: PixelPoint,
    geometry: &GridGeometry,
    tree: &PageTree,
) -> Result<(CellPoint, GridRect), NoopReason> {
    let mapper = geometry.mapper.ok_or(NoopReason::MetricsNotReady)?;
    if !position.is_finite() {
        return Err(NoopReason::NonFinitePosition);
    }
    let section = tree.section(section_id).ok_or(NoopReason::UnknownSection)?;
    let extent = tree
        .rules()
        .defaults
        .extent(item_type, geometry.grid.context)
        .ok_or(NoopReason::NoPaletteDefault)?;
    let cell = mapper.pixel_to_grid(position);
    let preview = clamp_to_grid(cell, extent, geometry.grid.columns, section.height);
    Ok((cell, preview))
}
