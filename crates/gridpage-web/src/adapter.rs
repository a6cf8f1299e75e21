#![forbid(unsafe_code)]

//! Deterministic DOM adapter for the page editor.
//!
//! This module bridges browser listener callbacks into `gridpage-runtime`
//! session events while enforcing:
//! - container-relative coordinates computed from the bounding client rect,
//! - drag-leave honored only on a true boundary exit (`target ==
//!   currentTarget`), never on a leave bubbled from a child element, and
//! - explicit document-listener attach/detach commands for the JS host, so a
//!   session that ended (pointer-up, cancel, blur, unmount) never receives
//!   another move.

use gridpage_core::{PixelPoint, PixelRect};
use gridpage_layout::{ItemId, ItemType, SectionId};
use gridpage_runtime::{
    Editor, ItemGestureEffect, ItemGestureEvent, ItemGestureTransition, NoopReason,
    PaletteDragEffect, PaletteDragEvent, PaletteDragTransition, ResizeHandle,
    SectionResizeEffect, SectionResizeEvent, SectionResizeTransition, Unmounted,
};

use crate::dom::{DomNodeId, HostCommand, is_boundary_leave, to_container};
use crate::event::DomEvent;

/// Adapter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomAdapterConfig {
    /// Window blur cancels pointer-tracked sessions.
    pub cancel_on_blur: bool,
    /// The page becoming hidden cancels pointer-tracked sessions.
    pub cancel_on_visibility_hidden: bool,
}

impl Default for DomAdapterConfig {
    fn default() -> Self {
        Self {
            cancel_on_blur: true,
            cancel_on_visibility_hidden: true,
        }
    }
}

/// Lifecycle phase recorded for one adapter dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomPhase {
    ViewportResized,
    CellMeasured,
    PaletteDragStart,
    PaletteDragEnd,
    PaletteClick,
    SectionDragOver,
    SectionDragLeave,
    SectionDrop,
    DocumentDrop,
    ItemPointerDown,
    SectionHandlePointerDown,
    DocumentPointerMove,
    DocumentPointerUp,
    PointerCancel,
    Blur,
    VisibilityHidden,
    Unmount,
}

/// Why an incoming callback was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomIgnoredReason {
    /// A leave bubbled up from a descendant of the section.
    LeaveFromDescendant,
    /// A document move/up with no pointer-tracked session open.
    NoDocumentSession,
    /// Nothing about the grid changed.
    GridUnchanged,
    /// Blur/visibility cancellation is disabled in the config.
    CancellationDisabled,
    /// The session accepted the event as a no-op.
    SessionNoop(NoopReason),
}

/// Outcome category for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomLogOutcome {
    SessionForwarded,
    GridUpdated,
    PageEdited,
    Ignored(DomIgnoredReason),
}

/// Structured log record for one dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct DomLogEntry {
    pub phase: DomPhase,
    pub section: Option<SectionId>,
    /// Container-relative position, when the callback carried one.
    pub position: Option<PixelPoint>,
    pub host_command: Option<HostCommand>,
    pub outcome: DomLogOutcome,
}

/// A transition from one of the editor's sessions.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionTransition {
    Palette(PaletteDragTransition),
    ItemGesture(ItemGestureTransition),
    SectionResize(SectionResizeTransition),
}

impl SessionTransition {
    /// The no-op reason, if the session ignored the event.
    #[must_use]
    pub fn noop_reason(&self) -> Option<NoopReason> {
        match self {
            Self::Palette(t) => match t.effect {
                PaletteDragEffect::Noop { reason } => Some(reason),
                _ => None,
            },
            Self::ItemGesture(t) => match t.effect {
                ItemGestureEffect::Noop { reason } => Some(reason),
                _ => None,
            },
            Self::SectionResize(t) => match t.effect {
                SectionResizeEffect::Noop { reason } => Some(reason),
                _ => None,
            },
        }
    }
}

/// Result of one DOM callback.
#[derive(Debug, Clone, PartialEq)]
pub struct DomDispatch {
    pub transitions: Vec<SessionTransition>,
    pub host_command: Option<HostCommand>,
    pub log: DomLogEntry,
}

impl DomDispatch {
    fn ignored(
        phase: DomPhase,
        reason: DomIgnoredReason,
        section: Option<SectionId>,
        position: Option<PixelPoint>,
    ) -> Self {
        Self {
            transitions: Vec::new(),
            host_command: None,
            log: DomLogEntry {
                phase,
                section,
                position,
                host_command: None,
                outcome: DomLogOutcome::Ignored(reason),
            },
        }
    }

    fn outcome(phase: DomPhase, outcome: DomLogOutcome) -> Self {
        Self {
            transitions: Vec::new(),
            host_command: None,
            log: DomLogEntry {
                phase,
                section: None,
                position: None,
                host_command: None,
                outcome,
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct DispatchContext<'a> {
    phase: DomPhase,
    section: Option<&'a SectionId>,
    position: Option<PixelPoint>,
}

/// Deterministic DOM adapter wrapping an [`Editor`].
///
/// The host calls one method per listener callback and carries out the
/// returned [`HostCommand`], if any.
#[derive(Debug, Clone)]
pub struct GridPageDomAdapter {
    editor: Editor,
    config: DomAdapterConfig,
    /// Bounding rect of the container an item gesture started in.
    gesture_container: Option<PixelRect>,
    listeners_attached: bool,
}

impl GridPageDomAdapter {
    #[must_use]
    pub fn new(editor: Editor, config: DomAdapterConfig) -> Self {
        Self {
            editor,
            config,
            gesture_container: None,
            listeners_attached: false,
        }
    }

    #[must_use]
    pub const fn editor(&self) -> &Editor {
        &self.editor
    }

    /// Direct access for persistence and programmatic edits.
    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    #[must_use]
    pub fn into_editor(self) -> Editor {
        self.editor
    }

    #[must_use]
    pub const fn config(&self) -> DomAdapterConfig {
        self.config
    }

    /// Whether the host currently has document listeners registered.
    #[must_use]
    pub const fn listeners_attached(&self) -> bool {
        self.listeners_attached
    }

    /// Route a decoded host event to its handler.
    pub fn dispatch(&mut self, event: &DomEvent) -> DomDispatch {
        match event {
            DomEvent::ViewportResized { width } => self.viewport_resized(*width),
            DomEvent::CellMeasured { width } => self.cell_measured(*width),
            DomEvent::PaletteDragStart { item_type } => self.palette_drag_start(*item_type),
            DomEvent::PaletteDragEnd => self.palette_drag_end(),
            DomEvent::PaletteClick { item_type } => self.palette_click(*item_type),
            DomEvent::SectionDragOver {
                section,
                client,
                container,
            } => self.section_drag_over(section, *client, *container),
            DomEvent::SectionDragLeave {
                section,
                target,
                current_target,
            } => self.section_drag_leave(section, *target, *current_target),
            DomEvent::SectionDrop {
                section,
                client,
                container,
            } => self.section_drop(section, *client, *container),
            DomEvent::DocumentDrop => self.document_drop(),
            DomEvent::ItemPointerDown {
                section,
                item,
                handle,
                client,
                container,
            } => self.item_pointer_down(section, item, *handle, *client, *container),
            DomEvent::SectionHandlePointerDown { section, client } => {
                self.section_handle_pointer_down(section, *client)
            }
            DomEvent::DocumentPointerMove { client } => self.document_pointer_move(*client),
            DomEvent::DocumentPointerUp { client } => self.document_pointer_up(*client),
            DomEvent::PointerCancel => self.pointer_cancel(),
            DomEvent::Blur => self.blur(),
            DomEvent::VisibilityHidden => self.visibility_hidden(),
            DomEvent::Unmount => self.unmount(),
        }
    }

    // =========================================================================
    // Grid notifications
    // =========================================================================

    /// Window resize.
    pub fn viewport_resized(&mut self, width_px: f64) -> DomDispatch {
        if self.editor.on_viewport_width(width_px) {
            finish(DomDispatch::outcome(DomPhase::ViewportResized, DomLogOutcome::GridUpdated))
        } else {
            DomDispatch::ignored(
                DomPhase::ViewportResized,
                DomIgnoredReason::GridUnchanged,
                None,
                None,
            )
        }
    }

    /// `ResizeObserver` or window resize re-measured the reference cell.
    pub fn cell_measured(&mut self, width_px: Option<f64>) -> DomDispatch {
        if self.editor.on_cell_measured(width_px) {
            finish(DomDispatch::outcome(DomPhase::CellMeasured, DomLogOutcome::GridUpdated))
        } else {
            DomDispatch::ignored(
                DomPhase::CellMeasured,
                DomIgnoredReason::GridUnchanged,
                None,
                None,
            )
        }
    }

    // =========================================================================
    // Palette drag and drop
    // =========================================================================

    pub fn palette_drag_start(&mut self, item_type: ItemType) -> DomDispatch {
        self.forward_palette(
            DispatchContext {
                phase: DomPhase::PaletteDragStart,
                section: None,
                position: None,
            },
            &PaletteDragEvent::Start { item_type },
        )
    }

    pub fn palette_drag_end(&mut self) -> DomDispatch {
        self.forward_palette(
            DispatchContext {
                phase: DomPhase::PaletteDragEnd,
                section: None,
                position: None,
            },
            &PaletteDragEvent::End,
        )
    }

    /// Palette click without a drag.
    pub fn palette_click(&mut self, item_type: ItemType) -> DomDispatch {
        self.editor.palette_click(item_type);
        finish(DomDispatch::outcome(DomPhase::PaletteClick, DomLogOutcome::PageEdited))
    }

    pub fn section_drag_over(
        &mut self,
        section: &SectionId,
        client: PixelPoint,
        container: PixelRect,
    ) -> DomDispatch {
        let position = to_container(client, container);
        self.forward_palette(
            DispatchContext {
                phase: DomPhase::SectionDragOver,
                section: Some(section),
                position: Some(position),
            },
            &PaletteDragEvent::Over {
                section: section.clone(),
                position,
            },
        )
    }

    /// `dragleave` on a section. Leaves bubbled from children are ignored.
    pub fn section_drag_leave(
        &mut self,
        section: &SectionId,
        target: DomNodeId,
        current_target: DomNodeId,
    ) -> DomDispatch {
        if !is_boundary_leave(target, current_target) {
            return DomDispatch::ignored(
                DomPhase::SectionDragLeave,
                DomIgnoredReason::LeaveFromDescendant,
                Some(section.clone()),
                None,
            );
        }
        self.forward_palette(
            DispatchContext {
                phase: DomPhase::SectionDragLeave,
                section: Some(section),
                position: None,
            },
            &PaletteDragEvent::Leave {
                section: section.clone(),
            },
        )
    }

    pub fn section_drop(
        &mut self,
        section: &SectionId,
        client: PixelPoint,
        container: PixelRect,
    ) -> DomDispatch {
        let position = to_container(client, container);
        self.forward_palette(
            DispatchContext {
                phase: DomPhase::SectionDrop,
                section: Some(section),
                position: Some(position),
            },
            &PaletteDragEvent::Drop {
                section: section.clone(),
                position,
            },
        )
    }

    /// Drop that no section accepted.
    pub fn document_drop(&mut self) -> DomDispatch {
        self.forward_palette(
            DispatchContext {
                phase: DomPhase::DocumentDrop,
                section: None,
                position: None,
            },
            &PaletteDragEvent::DropOutside,
        )
    }

    // =========================================================================
    // Pointer-tracked sessions
    // =========================================================================

    /// Pointer down on an item body (`handle: None`) or one of its handles.
    pub fn item_pointer_down(
        &mut self,
        section: &SectionId,
        item: &ItemId,
        handle: Option<ResizeHandle>,
        client: PixelPoint,
        container: PixelRect,
    ) -> DomDispatch {
        let position = to_container(client, container);
        let transition = self.editor.apply_item_gesture_event(&ItemGestureEvent::PointerDown {
            section: section.clone(),
            item: item.clone(),
            handle,
            position,
        });
        if self.editor.item_gesture().is_active() {
            self.gesture_container = Some(container);
        }
        self.forwarded(
            DispatchContext {
                phase: DomPhase::ItemPointerDown,
                section: Some(section),
                position: Some(position),
            },
            vec![SessionTransition::ItemGesture(transition)],
        )
    }

    /// Pointer down on a section's bottom resize handle.
    pub fn section_handle_pointer_down(
        &mut self,
        section: &SectionId,
        client: PixelPoint,
    ) -> DomDispatch {
        let transition = self
            .editor
            .apply_section_resize_event(&SectionResizeEvent::Start {
                section: section.clone(),
                pointer_y: client.y,
            });
        self.forwarded(
            DispatchContext {
                phase: DomPhase::SectionHandlePointerDown,
                section: Some(section),
                position: None,
            },
            vec![SessionTransition::SectionResize(transition)],
        )
    }

    /// Document-level pointer move. Only delivered while listeners are
    /// attached; a stray move after detach is ignored.
    pub fn document_pointer_move(&mut self, client: PixelPoint) -> DomDispatch {
        let mut transitions = Vec::new();
        let mut position = None;
        if self.editor.item_gesture().is_active() {
            let local = self.gesture_position(client);
            position = Some(local);
            transitions.push(SessionTransition::ItemGesture(
                self.editor
                    .apply_item_gesture_event(&ItemGestureEvent::PointerMove { position: local }),
            ));
        }
        if self.editor.section_resize().is_active() {
            transitions.push(SessionTransition::SectionResize(
                self.editor
                    .apply_section_resize_event(&SectionResizeEvent::Move { pointer_y: client.y }),
            ));
        }
        if transitions.is_empty() {
            return DomDispatch::ignored(
                DomPhase::DocumentPointerMove,
                DomIgnoredReason::NoDocumentSession,
                None,
                Some(client),
            );
        }
        self.forwarded(
            DispatchContext {
                phase: DomPhase::DocumentPointerMove,
                section: None,
                position,
            },
            transitions,
        )
    }

    /// Document-level pointer up: ends every pointer-tracked session.
    pub fn document_pointer_up(&mut self, client: PixelPoint) -> DomDispatch {
        let mut transitions = Vec::new();
        let mut position = None;
        if self.editor.item_gesture().is_active() {
            let local = self.gesture_position(client);
            position = Some(local);
            transitions.push(SessionTransition::ItemGesture(
                self.editor
                    .apply_item_gesture_event(&ItemGestureEvent::PointerUp { position: local }),
            ));
        }
        if self.editor.section_resize().is_active() {
            transitions.push(SessionTransition::SectionResize(
                self.editor.apply_section_resize_event(&SectionResizeEvent::End),
            ));
        }
        if transitions.is_empty() {
            return DomDispatch::ignored(
                DomPhase::DocumentPointerUp,
                DomIgnoredReason::NoDocumentSession,
                None,
                Some(client),
            );
        }
        self.forwarded(
            DispatchContext {
                phase: DomPhase::DocumentPointerUp,
                section: None,
                position,
            },
            transitions,
        )
    }

    /// Browser `pointercancel`.
    pub fn pointer_cancel(&mut self) -> DomDispatch {
        if !self.editor.item_gesture().is_active() && !self.editor.section_resize().is_active() {
            return DomDispatch::ignored(
                DomPhase::PointerCancel,
                DomIgnoredReason::NoDocumentSession,
                None,
                None,
            );
        }
        let mut transitions = Vec::new();
        if self.editor.item_gesture().is_active() {
            transitions.push(SessionTransition::ItemGesture(
                self.editor
                    .apply_item_gesture_event(&ItemGestureEvent::PointerCancel),
            ));
        }
        if self.editor.section_resize().is_active() {
            transitions.push(SessionTransition::SectionResize(
                self.editor.apply_section_resize_event(&SectionResizeEvent::End),
            ));
        }
        self.forwarded(
            DispatchContext {
                phase: DomPhase::PointerCancel,
                section: None,
                position: None,
            },
            transitions,
        )
    }

    pub fn blur(&mut self) -> DomDispatch {
        let enabled = self.config.cancel_on_blur;
        self.interrupt(DomPhase::Blur, enabled)
    }

    pub fn visibility_hidden(&mut self) -> DomDispatch {
        let enabled = self.config.cancel_on_visibility_hidden;
        self.interrupt(DomPhase::VisibilityHidden, enabled)
    }

    /// Component teardown: cancel every session and release listeners.
    pub fn unmount(&mut self) -> DomDispatch {
        let Unmounted {
            palette,
            item_gesture,
            section_resize,
        } = self.editor.unmount();
        let transitions: Vec<_> = palette
            .map(SessionTransition::Palette)
            .into_iter()
            .chain(item_gesture.map(SessionTransition::ItemGesture))
            .chain(section_resize.map(SessionTransition::SectionResize))
            .collect();
        self.forwarded(
            DispatchContext {
                phase: DomPhase::Unmount,
                section: None,
                position: None,
            },
            transitions,
        )
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn interrupt(&mut self, phase: DomPhase, enabled: bool) -> DomDispatch {
        if !self.editor.item_gesture().is_active() && !self.editor.section_resize().is_active() {
            return DomDispatch::ignored(phase, DomIgnoredReason::NoDocumentSession, None, None);
        }
        if !enabled {
            return DomDispatch::ignored(phase, DomIgnoredReason::CancellationDisabled, None, None);
        }
        let (gesture, resize) = self.editor.cancel_pointer_sessions();
        let transitions: Vec<_> = gesture
            .map(SessionTransition::ItemGesture)
            .into_iter()
            .chain(resize.map(SessionTransition::SectionResize))
            .collect();
        self.forwarded(
            DispatchContext {
                phase,
                section: None,
                position: None,
            },
            transitions,
        )
    }

    fn gesture_position(&self, client: PixelPoint) -> PixelPoint {
        match self.gesture_container {
            Some(container) => to_container(client, container),
            None => client,
        }
    }

    fn forward_palette(&mut self, ctx: DispatchContext<'_>, event: &PaletteDragEvent) -> DomDispatch {
        let transition = self.editor.apply_palette_event(event);
        self.forwarded(ctx, vec![SessionTransition::Palette(transition)])
    }

    /// Build the dispatch for forwarded transitions and reconcile document
    /// listeners with the sessions that are still open.
    fn forwarded(
        &mut self,
        ctx: DispatchContext<'_>,
        transitions: Vec<SessionTransition>,
    ) -> DomDispatch {
        let host_command = self.sync_listeners();
        let outcome = match transitions.as_slice() {
            [single] => match single.noop_reason() {
                Some(reason) => DomLogOutcome::Ignored(DomIgnoredReason::SessionNoop(reason)),
                None => DomLogOutcome::SessionForwarded,
            },
            [] => DomLogOutcome::Ignored(DomIgnoredReason::NoDocumentSession),
            _ => DomLogOutcome::SessionForwarded,
        };
        finish(DomDispatch {
            transitions,
            host_command,
            log: DomLogEntry {
                phase: ctx.phase,
                section: ctx.section.cloned(),
                position: ctx.position,
                host_command,
                outcome,
            },
        })
    }

    fn sync_listeners(&mut self) -> Option<HostCommand> {
        if !self.editor.item_gesture().is_active() {
            self.gesture_container = None;
        }
        let wanted =
            self.editor.item_gesture().is_active() || self.editor.section_resize().is_active();
        match (wanted, self.listeners_attached) {
            (true, false) => {
                self.listeners_attached = true;
                Some(HostCommand::AttachDocumentListeners)
            }
            (false, true) => {
                self.listeners_attached = false;
                Some(HostCommand::DetachDocumentListeners)
            }
            _ => None,
        }
    }
}

impl Default for GridPageDomAdapter {
    fn default() -> Self {
        Self::new(Editor::default(), DomAdapterConfig::default())
    }
}

#[cfg(feature = "tracing")]
fn finish(dispatch: DomDispatch) -> DomDispatch {
    tracing::debug!(
        phase = ?dispatch.log.phase,
        section = ?dispatch.log.section,
        outcome = ?dispatch.log.outcome,
        host_command = ?dispatch.host_command,
        transitions = dispatch.transitions.len(),
        "dom dispatch"
    );
    dispatch
}

#[cfg(not(feature = "tracing"))]
#[inline]
fn finish(dispatch: DomDispatch) -> DomDispatch {
    dispatch
}
