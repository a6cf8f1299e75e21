#![forbid(unsafe_code)]

//! The editor store.
//!
//! [`Editor`] is the single owner of the page tree. It holds the grid state,
//! the grid-visibility signal and the three interaction sessions, feeds each
//! host event to the right session and applies the resulting effect to the
//! tree. Every tree change is a whole-value replacement.
//!
//! # Invariants
//!
//! 1. Sessions never mutate the tree; only the effects applied here do.
//! 2. Item gestures commit in the context they started in, even if the
//!    viewport changed context mid-gesture.
//! 3. After [`Editor::unmount`] no session is active and no grid is shown.

use std::sync::Arc;

use gridpage_layout::{
    GridContext, ItemType, LayoutRules, PageStore, PageTree, Repair, StoreError, Timestamp,
};
use tracing::{debug, info};

use crate::drag_drop::{PaletteDragEffect, PaletteDragEvent, PaletteDragSession, PaletteDragTransition};
use crate::grid_state::GridState;
use crate::item_gesture::{
    GestureTarget, ItemGestureEffect, ItemGestureEvent, ItemGestureSession, ItemGestureTransition,
};
use crate::section_resize::{
    SectionResizeEffect, SectionResizeEvent, SectionResizeSession, SectionResizeTransition,
};
use crate::visibility::GridVisibility;

/// Cancellations produced by [`Editor::unmount`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Unmounted {
    pub palette: Option<PaletteDragTransition>,
    pub item_gesture: Option<ItemGestureTransition>,
    pub section_resize: Option<SectionResizeTransition>,
}

impl Unmounted {
    #[must_use]
    pub fn canceled_any(&self) -> bool {
        self.palette.is_some() || self.item_gesture.is_some() || self.section_resize.is_some()
    }
}

/// Page tree, grid state and interaction sessions behind one owner.
#[derive(Debug, Clone)]
pub struct Editor {
    rules: Arc<LayoutRules>,
    tree: PageTree,
    grid: GridState,
    visibility: GridVisibility,
    palette: PaletteDragSession,
    item_gesture: ItemGestureSession,
    section_resize: SectionResizeSession,
}

impl Editor {
    /// A fresh page with one default section.
    #[must_use]
    pub fn new(rules: Arc<LayoutRules>) -> Self {
        let tree = PageTree::new(Arc::clone(&rules));
        Self::with_tree(tree, rules)
    }

    /// Edit an existing tree. `rules` must be the tree's rules.
    #[must_use]
    pub fn with_tree(tree: PageTree, rules: Arc<LayoutRules>) -> Self {
        Self {
            grid: GridState::new(rules.grid.clone()),
            rules,
            tree,
            visibility: GridVisibility::new(),
            palette: PaletteDragSession::new(),
            item_gesture: ItemGestureSession::new(),
            section_resize: SectionResizeSession::new(),
        }
    }

    #[must_use]
    pub const fn tree(&self) -> &PageTree {
        &self.tree
    }

    #[must_use]
    pub const fn grid(&self) -> &GridState {
        &self.grid
    }

    #[must_use]
    pub const fn visibility(&self) -> &GridVisibility {
        &self.visibility
    }

    #[must_use]
    pub const fn palette(&self) -> &PaletteDragSession {
        &self.palette
    }

    #[must_use]
    pub const fn item_gesture(&self) -> &ItemGestureSession {
        &self.item_gesture
    }

    #[must_use]
    pub const fn section_resize(&self) -> &SectionResizeSession {
        &self.section_resize
    }

    // =========================================================================
    // Grid notifications
    // =========================================================================

    /// Viewport resized. Returns whether the column count or context changed.
    pub fn on_viewport_width(&mut self, width_px: f64) -> bool {
        self.grid.on_viewport_width(width_px)
    }

    /// Reference cell (re-)measured; `None` when it is not laid out.
    pub fn on_cell_measured(&mut self, measured_width: Option<f64>) -> bool {
        self.grid.on_cell_measured(measured_width)
    }

    // =========================================================================
    // Sessions
    // =========================================================================

    pub fn apply_palette_event(&mut self, event: &PaletteDragEvent) -> PaletteDragTransition {
        let geometry = self.grid.geometry();
        let transition = self.palette.apply_event(event, &geometry, &self.tree);
        self.apply_palette_effect(&transition.effect, geometry.grid);
        transition
    }

    pub fn apply_item_gesture_event(&mut self, event: &ItemGestureEvent) -> ItemGestureTransition {
        let geometry = self.grid.geometry();
        let transition = self.item_gesture.apply_event(event, &geometry, &self.tree);
        self.apply_item_gesture_effect(&transition.effect);
        transition
    }

    pub fn apply_section_resize_event(
        &mut self,
        event: &SectionResizeEvent,
    ) -> SectionResizeTransition {
        let geometry = self.grid.geometry();
        let transition = self.section_resize.apply_event(event, &geometry, &self.tree);
        if let SectionResizeEffect::HeightCommitted { section, height } = &transition.effect {
            self.tree = self.tree.set_section_height(section, *height);
        }
        transition
    }

    fn apply_palette_effect(&mut self, effect: &PaletteDragEffect, grid: GridContext) {
        match effect {
            PaletteDragEffect::PreviewUpdated { section, .. } => self.visibility.show(section),
            PaletteDragEffect::Committed {
                section,
                item_type,
                cell,
            } => {
                self.tree = self.tree.add_item(section, *item_type, *cell, grid);
                self.visibility.hide();
            }
            PaletteDragEffect::Superseded { .. }
            | PaletteDragEffect::PreviewCleared { .. }
            | PaletteDragEffect::Canceled { .. } => {
                self.visibility.hide();
            }
            PaletteDragEffect::Started { .. } | PaletteDragEffect::Noop { .. } => {}
        }
    }

    fn apply_item_gesture_effect(&mut self, effect: &ItemGestureEffect) {
        match effect {
            ItemGestureEffect::Started { target, .. } | ItemGestureEffect::Superseded { target, .. } => {
                self.visibility.show(&target.section);
            }
            ItemGestureEffect::MoveCommitted { target, origin } => {
                self.tree = self.tree.update_item_placement(
                    &target.section,
                    &target.item,
                    *origin,
                    self.commit_grid(target),
                );
                self.visibility.hide();
            }
            ItemGestureEffect::ResizeCommitted {
                target,
                origin,
                extent,
            } => {
                self.tree = self.tree.update_item_extent(
                    &target.section,
                    &target.item,
                    *origin,
                    *extent,
                    self.commit_grid(target),
                );
                self.visibility.hide();
            }
            ItemGestureEffect::Released { .. } | ItemGestureEffect::Canceled { .. } => {
                self.visibility.hide();
            }
            ItemGestureEffect::PreviewUpdated { .. } | ItemGestureEffect::Noop { .. } => {}
        }
    }

    fn commit_grid(&self, target: &GestureTarget) -> GridContext {
        GridContext::new(target.context, self.rules.grid.columns_for(target.context))
    }

    // =========================================================================
    // Direct edits
    // =========================================================================

    /// Palette click without a drag: add at the origin of the selected
    /// section.
    pub fn palette_click(&mut self, item_type: ItemType) {
        let grid = self.grid.grid_context();
        self.tree = self.tree.add_item_to_selected_section(item_type, grid);
    }

    /// Replace the tree with `f(tree)`.
    ///
    /// Open sessions notice removed targets on their next event.
    pub fn edit<F>(&mut self, f: F)
    where
        F: FnOnce(&PageTree) -> PageTree,
    {
        self.tree = f(&self.tree);
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Replace the page with the stored one, if any. Open sessions are
    /// canceled first. Returns the repairs applied on load.
    pub fn load_from(&mut self, store: &impl PageStore) -> Result<Option<Vec<Repair>>, StoreError> {
        let Some(json) = store.load_raw()? else {
            debug!("no stored page");
            return Ok(None);
        };
        let (tree, repairs) = PageTree::load_json(&json, Arc::clone(&self.rules))?;
        self.unmount();
        info!(
            page = %tree.page().id,
            sections = tree.sections().len(),
            items = tree.page().item_count(),
            repairs = repairs.len(),
            "page loaded"
        );
        self.tree = tree;
        Ok(Some(repairs))
    }

    /// Stamp `updatedAt` with the current time and save.
    pub fn save_to(&mut self, store: &mut impl PageStore) -> Result<Timestamp, StoreError> {
        self.save_at(store, Timestamp::now())
    }

    /// Stamp `updatedAt` with `at` and save. The tree keeps the stamp only if
    /// the store accepted the page.
    pub fn save_at(
        &mut self,
        store: &mut impl PageStore,
        at: Timestamp,
    ) -> Result<Timestamp, StoreError> {
        let stamped = self.tree.with_updated_at(at.clone());
        store.save(stamped.page())?;
        info!(page = %stamped.page().id, updated_at = %at, "page saved");
        self.tree = stamped;
        Ok(at)
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Force-cancel the pointer-tracked sessions (item gesture and section
    /// resize), e.g. on window blur. A palette drag is left alone.
    pub fn cancel_pointer_sessions(
        &mut self,
    ) -> (Option<ItemGestureTransition>, Option<SectionResizeTransition>) {
        let gesture = self.item_gesture.force_cancel();
        if let Some(t) = &gesture {
            self.apply_item_gesture_effect(&t.effect);
        }
        (gesture, self.section_resize.force_cancel())
    }

    /// Force-cancel every open session and hide the grid.
    pub fn unmount(&mut self) -> Unmounted {
        let unmounted = Unmounted {
            palette: self.palette.force_cancel(),
            item_gesture: self.item_gesture.force_cancel(),
            section_resize: self.section_resize.force_cancel(),
        };
        self.visibility.hide();
        if unmounted.canceled_any() {
            debug!(
                palette = unmounted.palette.is_some(),
                item_gesture = unmounted.item_gesture.is_some(),
                section_resize = unmounted.section_resize.is_some(),
                "sessions canceled on unmount"
            );
        }
        unmounted
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(Arc::new(LayoutRules::default()))
    }
}
