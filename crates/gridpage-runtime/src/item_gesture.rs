#![forbid(unsafe_code)]

//! Move and handle-resize of an item already on the canvas.
//!
//! ```text
//! Idle -> Moving   -> Idle
//!      \> Resizing -> Idle
//! ```
//!
//! A pointer-down snapshots the item's rect in the active context and the
//! pointer position. Every later move recomputes the preview from that
//! snapshot plus the total pointer delta, so rounding never accumulates.
//!
//! - **Move**: the snapshot's pixel origin plus the delta snaps to the
//!   nearest cell, then [`clamp_placement`] keeps the extent.
//! - **Resize**: the handle's edges follow the delta; the resulting pixel
//!   box maps to a cell origin (nearest) and a cell extent (rounded), then
//!   [`clamp_to_grid`].
//!
//! On release the owner writes the preview through
//! `PageTree::update_item_placement` / `update_item_extent` for the context
//! the gesture started in.
//!
//! # Failure Modes
//!
//! If the section or item disappears mid-gesture the next event cancels with
//! [`CancelReason::TargetRemoved`].

use gridpage_core::{
    CellExtent, CellPoint, CoordinateMapper, GridRect, PixelPoint, PixelSize, ViewContext,
    clamp_placement, clamp_to_grid,
};
use gridpage_layout::{ItemId, PageTree, SectionId};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::grid_state::GridGeometry;
use crate::session::{CancelReason, NoopReason, TransitionCounter};

/// Which edges a resize handle drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeHandle {
    Top,
    Right,
    Bottom,
    Left,
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl ResizeHandle {
    pub const ALL: [Self; 8] = [
        Self::Top,
        Self::Right,
        Self::Bottom,
        Self::Left,
        Self::TopLeft,
        Self::TopRight,
        Self::BottomRight,
        Self::BottomLeft,
    ];

    const fn moves_left(self) -> bool {
        matches!(self, Self::Left | Self::TopLeft | Self::BottomLeft)
    }

    const fn moves_right(self) -> bool {
        matches!(self, Self::Right | Self::TopRight | Self::BottomRight)
    }

    const fn moves_top(self) -> bool {
        matches!(self, Self::Top | Self::TopLeft | Self::TopRight)
    }

    const fn moves_bottom(self) -> bool {
        matches!(self, Self::Bottom | Self::BottomLeft | Self::BottomRight)
    }
}

/// The item a gesture edits, and in which context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GestureTarget {
    pub section: SectionId,
    pub item: ItemId,
    pub context: ViewContext,
}

/// Item gesture lifecycle state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ItemGestureState {
    #[default]
    Idle,
    Moving {
        target: GestureTarget,
        pointer_origin: PixelPoint,
        start: GridRect,
        preview: GridRect,
    },
    Resizing {
        target: GestureTarget,
        handle: ResizeHandle,
        pointer_origin: PixelPoint,
        start: GridRect,
        preview: GridRect,
    },
}

impl ItemGestureState {
    #[must_use]
    pub fn target(&self) -> Option<&GestureTarget> {
        match self {
            Self::Idle => None,
            Self::Moving { target, .. } | Self::Resizing { target, .. } => Some(target),
        }
    }

    #[must_use]
    pub fn preview(&self) -> Option<GridRect> {
        match self {
            Self::Idle => None,
            Self::Moving { preview, .. } | Self::Resizing { preview, .. } => Some(*preview),
        }
    }
}

/// Host input for an item gesture. Positions are relative to the section's
/// grid container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ItemGestureEvent {
    /// Pointer down on the item body (`handle: None`) or a resize handle.
    PointerDown {
        section: SectionId,
        item: ItemId,
        handle: Option<ResizeHandle>,
        position: PixelPoint,
    },
    PointerMove {
        position: PixelPoint,
    },
    PointerUp {
        position: PixelPoint,
    },
    PointerCancel,
}

/// Effect of one gesture transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum ItemGestureEffect {
    Started {
        target: GestureTarget,
        handle: Option<ResizeHandle>,
        start: GridRect,
    },
    Superseded {
        previous: GestureTarget,
        target: GestureTarget,
    },
    PreviewUpdated {
        target: GestureTarget,
        preview: GridRect,
    },
    /// The owner writes `origin` with the item's existing extent.
    MoveCommitted {
        target: GestureTarget,
        origin: CellPoint,
    },
    /// The owner writes `origin` and `extent` together.
    ResizeCommitted {
        target: GestureTarget,
        origin: CellPoint,
        extent: CellExtent,
    },
    /// Released where it started; nothing to write.
    Released {
        target: GestureTarget,
    },
    Canceled {
        target: GestureTarget,
        reason: CancelReason,
    },
    Noop {
        reason: NoopReason,
    },
}

/// One gesture transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemGestureTransition {
    pub transition_id: u64,
    pub from: ItemGestureState,
    pub to: ItemGestureState,
    pub effect: ItemGestureEffect,
}

/// Item move/resize state machine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemGestureSession {
    state: ItemGestureState,
    transitions: TransitionCounter,
}

impl ItemGestureSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> &ItemGestureState {
        &self.state
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self.state, ItemGestureState::Idle)
    }

    pub fn apply_event(
        &mut self,
        event: &ItemGestureEvent,
        geometry: &GridGeometry,
        tree: &PageTree,
    ) -> ItemGestureTransition {
        match event {
            ItemGestureEvent::PointerDown {
                section,
                item,
                handle,
                position,
            } => self.pointer_down(section, item, *handle, *position, geometry, tree),
            ItemGestureEvent::PointerMove { position } => {
                self.pointer_move(*position, geometry, tree)
            }
            ItemGestureEvent::PointerUp { position } => self.pointer_up(*position, geometry, tree),
            ItemGestureEvent::PointerCancel => match self.state.target().cloned() {
                Some(target) => self.cancel(target, CancelReason::PointerCancel),
                None => self.noop(NoopReason::IdleWithoutActiveSession),
            },
        }
    }

    /// End an open gesture without committing.
    pub fn force_cancel(&mut self) -> Option<ItemGestureTransition> {
        let target = self.state.target()?.clone();
        Some(self.cancel(target, CancelReason::Programmatic))
    }

    fn pointer_down(
        &mut self,
        section_id: &SectionId,
        item_id: &ItemId,
        handle: Option<ResizeHandle>,
        position: PixelPoint,
        geometry: &GridGeometry,
        tree: &PageTree,
    ) -> ItemGestureTransition {
        if geometry.mapper.is_none() {
            return self.noop(NoopReason::MetricsNotReady);
        }
        if !position.is_finite() {
            return self.noop(NoopReason::NonFinitePosition);
        }
        if tree.section(section_id).is_none() {
            return self.noop(NoopReason::UnknownSection);
        }
        let Some(item) = tree.item(section_id, item_id) else {
            return self.noop(NoopReason::UnknownItem);
        };

        let target = GestureTarget {
            section: section_id.clone(),
            item: item_id.clone(),
            context: geometry.grid.context,
        };
        let start = item.style.get(target.context).rect();
        let to = match handle {
            None => ItemGestureState::Moving {
                target: target.clone(),
                pointer_origin: position,
                start,
                preview: start,
            },
            Some(handle) => ItemGestureState::Resizing {
                target: target.clone(),
                handle,
                pointer_origin: position,
                start,
                preview: start,
            },
        };
        let effect = match self.state.target() {
            Some(previous) => ItemGestureEffect::Superseded {
                previous: previous.clone(),
                target,
            },
            None => ItemGestureEffect::Started {
                target,
                handle,
                start,
            },
        };
        self.transition(to, effect)
    }

    fn pointer_move(
        &mut self,
        position: PixelPoint,
        geometry: &GridGeometry,
        tree: &PageTree,
    ) -> ItemGestureTransition {
        let Some(target) = self.state.target().cloned() else {
            return self.noop(NoopReason::IdleWithoutActiveSession);
        };
        let preview = match self.preview_at(&target, position, geometry, tree) {
            Ok(preview) => preview,
            Err(Outcome::Noop(reason)) => return self.noop(reason),
            Err(Outcome::Cancel(reason)) => return self.cancel(target, reason),
        };
        if self.state.preview() == Some(preview) {
            return self.noop(NoopReason::PreviewUnchanged);
        }
        let mut to = self.state.clone();
        match &mut to {
            ItemGestureState::Moving { preview: p, .. }
            | ItemGestureState::Resizing { preview: p, .. } => *p = preview,
            ItemGestureState::Idle => {}
        }
        self.transition(to, ItemGestureEffect::PreviewUpdated { target, preview })
    }

    fn pointer_up(
        &mut self,
        position: PixelPoint,
        geometry: &GridGeometry,
        tree: &PageTree,
    ) -> ItemGestureTransition {
        let Some(target) = self.state.target().cloned() else {
            return self.noop(NoopReason::IdleWithoutActiveSession);
        };
        let preview = match self.preview_at(&target, position, geometry, tree) {
            Ok(preview) => preview,
            Err(Outcome::Cancel(reason)) => return self.cancel(target, reason),
            // Without usable geometry the last preview stands.
            Err(Outcome::Noop(_)) => match self.state.preview() {
                Some(preview) => preview,
                None => return self.noop(NoopReason::IdleWithoutActiveSession),
            },
        };
        let effect = match &self.state {
            ItemGestureState::Moving { start, .. } | ItemGestureState::Resizing { start, .. }
                if *start == preview =>
            {
                ItemGestureEffect::Released { target }
            }
            ItemGestureState::Moving { .. } => ItemGestureEffect::MoveCommitted {
                target,
                origin: preview.origin(),
            },
            ItemGestureState::Resizing { .. } => ItemGestureEffect::ResizeCommitted {
                target,
                origin: preview.origin(),
                extent: preview.extent(),
            },
            ItemGestureState::Idle => return self.noop(NoopReason::IdleWithoutActiveSession),
        };
        self.transition(ItemGestureState::Idle, effect)
    }

    fn preview_at(
        &self,
        target: &GestureTarget,
        position: PixelPoint,
        geometry: &GridGeometry,
        tree: &PageTree,
    ) -> Result<GridRect, Outcome> {
        let Some(section) = tree.section(&target.section) else {
            return Err(Outcome::Cancel(CancelReason::TargetRemoved));
        };
        if section.item(&target.item).is_none() {
            return Err(Outcome::Cancel(CancelReason::TargetRemoved));
        }
        let mapper = geometry
            .mapper
            .ok_or(Outcome::Noop(NoopReason::MetricsNotReady))?;
        if !position.is_finite() {
            return Err(Outcome::Noop(NoopReason::NonFinitePosition));
        }

        let columns = if target.context == geometry.grid.context {
            geometry.grid.columns
        } else {
            tree.rules().grid.columns_for(target.context)
        };
        let rect = match &self.state {
            ItemGestureState::Moving {
                start,
                pointer_origin,
                ..
            } => {
                let delta = position.offset_from(*pointer_origin);
                moved(&mapper, *start, delta, columns, section.height)
            }
            ItemGestureState::Resizing {
                start,
                handle,
                pointer_origin,
                ..
            } => {
                let delta = position.offset_from(*pointer_origin);
                resized(&mapper, *start, *handle, delta, columns, section.height)
            }
            ItemGestureState::Idle => {
                return Err(Outcome::Noop(NoopReason::IdleWithoutActiveSession));
            }
        };
        Ok(rect)
    }

    fn cancel(&mut self, target: GestureTarget, reason: CancelReason) -> ItemGestureTransition {
        self.transition(
            ItemGestureState::Idle,
            ItemGestureEffect::Canceled { target, reason },
        )
    }

    fn noop(&mut self, reason: NoopReason) -> ItemGestureTransition {
        trace!(?reason, state = ?self.state, "item gesture event ignored");
        let transition_id = self.transitions.next();
        ItemGestureTransition {
            transition_id,
            from: self.state.clone(),
            to: self.state.clone(),
            effect: ItemGestureEffect::Noop { reason },
        }
    }

    fn transition(&mut self, to: ItemGestureState, effect: ItemGestureEffect) -> ItemGestureTransition {
        let transition_id = self.transitions.next();
        let from = std::mem::replace(&mut self.state, to.clone());
        debug!(transition_id, effect = ?effect, "item gesture transition");
        ItemGestureTransition {
            transition_id,
            from,
            to,
            effect,
        }
    }
}

enum Outcome {
    Noop(NoopReason),
    Cancel(CancelReason),
}

fn moved(
    mapper: &CoordinateMapper,
    start: GridRect,
    delta: PixelPoint,
    columns: u32,
    rows: u32,
) -> GridRect {
    let origin = mapper.grid_to_pixel(start.origin());
    let cell = mapper.snap_to_nearest(PixelPoint::new(origin.x + delta.x, origin.y + delta.y));
    clamp_placement(cell, start.extent(), columns, rows)
}

fn resized(
    mapper: &CoordinateMapper,
    start: GridRect,
    handle: ResizeHandle,
    delta: PixelPoint,
    columns: u32,
    rows: u32,
) -> GridRect {
    let px = mapper.grid_rect_to_pixels(start);
    let (mut x, mut y, mut width, mut height) = (px.x, px.y, px.width, px.height);
    if handle.moves_left() {
        x += delta.x;
        width -= delta.x;
    }
    if handle.moves_right() {
        width += delta.x;
    }
    if handle.moves_top() {
        y += delta.y;
        height -= delta.y;
    }
    if handle.moves_bottom() {
        height += delta.y;
    }
    let origin = mapper.snap_to_nearest(PixelPoint::new(x, y));
    let extent = mapper.pixel_extent_to_grid_extent(PixelSize::new(width, height));
    clamp_to_grid(origin, extent, columns, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use gridpage_core::CellMetrics;
    use gridpage_layout::{GridContext, ItemType, LayoutRules};

    fn desktop() -> GridGeometry {
        GridGeometry {
            mapper: CoordinateMapper::new(CellMetrics::new(40.0, 25.0), 8.0),
            grid: GridContext::new(ViewContext::Desktop, 24),
            min_section_rows: 12,
        }
    }

    /// One section with a desktop box at (4, 4) 2x2.
    fn tree() -> (PageTree, SectionId, ItemId) {
        let tree = PageTree::new(Arc::new(LayoutRules::default()));
        let section = tree.sections()[0].id.clone();
        let tree = tree.add_item(
            &section,
            ItemType::Box,
            CellPoint::new(4, 4),
            desktop().grid,
        );
        let item = tree.sections()[0].items[0].id.clone();
        (tree, section, item)
    }

    fn down(
        session: &mut ItemGestureSession,
        tree: &PageTree,
        section: &SectionId,
        item: &ItemId,
        handle: Option<ResizeHandle>,
    ) -> ItemGestureTransition {
        session.apply_event(
            &ItemGestureEvent::PointerDown {
                section: section.clone(),
                item: item.clone(),
                handle,
                position: PixelPoint::new(200.0, 140.0),
            },
            &desktop(),
            tree,
        )
    }

    fn at(dx: f64, dy: f64) -> PixelPoint {
        PixelPoint::new(200.0 + dx, 140.0 + dy)
    }

    #[test]
    fn move_snaps_to_nearest_cell() {
        let (tree, section, item) = tree();
        let mut session = ItemGestureSession::new();
        let t = down(&mut session, &tree, &section, &item, None);
        assert!(matches!(t.effect, ItemGestureEffect::Started { start, .. } if start == GridRect::new(4, 4, 2, 2)));

        // +70px / 48 = 1.46 -> 1 column; +20px / 33 = 0.6 -> 1 row
        let t = session.apply_event(&ItemGestureEvent::PointerMove { position: at(70.0, 20.0) }, &desktop(), &tree);
        assert_eq!(t.to.preview(), Some(GridRect::new(5, 5, 2, 2)));

        let t = session.apply_event(&ItemGestureEvent::PointerUp { position: at(100.0, 20.0) }, &desktop(), &tree);
        assert!(matches!(
            t.effect,
            ItemGestureEffect::MoveCommitted { origin, .. } if origin == CellPoint::new(6, 5)
        ));
        assert!(!session.is_active());
    }

    #[test]
    fn move_keeps_extent_at_the_edge() {
        let (tree, section, item) = tree();
        let mut session = ItemGestureSession::new();
        down(&mut session, &tree, &section, &item, None);
        let t = session.apply_event(
            &ItemGestureEvent::PointerMove { position: at(5000.0, 5000.0) },
            &desktop(),
            &tree,
        );
        assert_eq!(t.to.preview(), Some(GridRect::new(22, 22, 2, 2)));
    }

    #[test]
    fn moves_are_computed_from_the_start_snapshot() {
        let (tree, section, item) = tree();
        let mut session = ItemGestureSession::new();
        down(&mut session, &tree, &section, &item, None);
        for step in 1..=10 {
            session.apply_event(
                &ItemGestureEvent::PointerMove { position: at(f64::from(step) * 3.7, 0.0) },
                &desktop(),
                &tree,
            );
        }
        // 37px total -> 0.77 -> 1 column, regardless of the path taken.
        assert_eq!(session.state().preview(), Some(GridRect::new(5, 4, 2, 2)));
    }

    #[test]
    fn bottom_right_resize_rounds_extent() {
        let (tree, section, item) = tree();
        let mut session = ItemGestureSession::new();
        down(&mut session, &tree, &section, &item, Some(ResizeHandle::BottomRight));
        // 2x2 renders as 88 x 58; +100 / +40 -> 188 / 48 = 3.9 -> 4, 98 / 33 = 2.97 -> 3
        let t = session.apply_event(
            &ItemGestureEvent::PointerUp { position: at(100.0, 40.0) },
            &desktop(),
            &tree,
        );
        assert!(matches!(
            t.effect,
            ItemGestureEffect::ResizeCommitted { origin, extent, .. }
                if origin == CellPoint::new(4, 4) && extent == CellExtent::new(4, 3)
        ));
    }

    #[test]
    fn left_resize_moves_origin_and_never_collapses() {
        let (tree, section, item) = tree();
        let mut session = ItemGestureSession::new();
        down(&mut session, &tree, &section, &item, Some(ResizeHandle::Left));
        let t = session.apply_event(
            &ItemGestureEvent::PointerMove { position: at(-96.0, 0.0) },
            &desktop(),
            &tree,
        );
        assert_eq!(t.to.preview(), Some(GridRect::new(2, 4, 4, 2)));

        let t = session.apply_event(
            &ItemGestureEvent::PointerMove { position: at(300.0, 0.0) },
            &desktop(),
            &tree,
        );
        let preview = t.to.preview().unwrap();
        assert!(preview.width >= 1);
        assert!(preview.fits(24, 24));
    }

    #[test]
    fn release_in_place_writes_nothing() {
        let (tree, section, item) = tree();
        let mut session = ItemGestureSession::new();
        down(&mut session, &tree, &section, &item, None);
        let t = session.apply_event(&ItemGestureEvent::PointerUp { position: at(3.0, 2.0) }, &desktop(), &tree);
        assert!(matches!(t.effect, ItemGestureEffect::Released { .. }));
    }

    #[test]
    fn deleted_item_cancels_on_next_move() {
        let (tree, section, item) = tree();
        let mut session = ItemGestureSession::new();
        down(&mut session, &tree, &section, &item, None);
        let without = tree.delete_item(&section, &item);
        let t = session.apply_event(&ItemGestureEvent::PointerMove { position: at(50.0, 0.0) }, &desktop(), &without);
        assert!(matches!(
            t.effect,
            ItemGestureEffect::Canceled { reason: CancelReason::TargetRemoved, .. }
        ));
        assert!(!session.is_active());
    }

    #[test]
    fn unknown_item_and_unmeasured_grid_are_noops() {
        let (tree, section, item) = tree();
        let mut session = ItemGestureSession::new();
        let t = down(&mut session, &tree, &section, &ItemId::new("missing"), None);
        assert_eq!(t.effect, ItemGestureEffect::Noop { reason: NoopReason::UnknownItem });

        let t = session.apply_event(
            &ItemGestureEvent::PointerDown {
                section,
                item,
                handle: None,
                position: PixelPoint::new(0.0, 0.0),
            },
            &GridGeometry { mapper: None, ..desktop() },
            &tree,
        );
        assert_eq!(t.effect, ItemGestureEffect::Noop { reason: NoopReason::MetricsNotReady });
        assert!(!session.is_active());
    }

    #[test]
    fn second_pointer_down_supersedes() {
        let (tree, section, item) = tree();
        let mut session = ItemGestureSession::new();
        down(&mut session, &tree, &section, &item, None);
        let t = down(&mut session, &tree, &section, &item, Some(ResizeHandle::Top));
        assert!(matches!(t.effect, ItemGestureEffect::Superseded { .. }));
        assert!(matches!(session.state(), ItemGestureState::Resizing { handle: ResizeHandle::Top, .. }));
    }

    #[test]
    fn pointer_cancel_and_force_cancel_end_the_gesture() {
        let (tree, section, item) = tree();
        let mut session = ItemGestureSession::new();
        assert!(session.force_cancel().is_none());
        down(&mut session, &tree, &section, &item, None);
        let t = session.apply_event(&ItemGestureEvent::PointerCancel, &desktop(), &tree);
        assert!(matches!(t.effect, ItemGestureEffect::Canceled { reason: CancelReason::PointerCancel, .. }));
        down(&mut session, &tree, &section, &item, None);
        let t = session.force_cancel().unwrap();
        assert!(matches!(t.effect, ItemGestureEffect::Canceled { reason: CancelReason::Programmatic, .. }));
    }
}
