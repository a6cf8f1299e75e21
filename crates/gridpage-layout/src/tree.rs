#![forbid(unsafe_code)]

//! Immutable page tree mutator.
//!
//! [`PageTree`] owns a [`Page`], the editor selection and the id allocator.
//! Every operation takes `&self` and returns a new tree; the prior value is
//! never modified. Only the sections and items on the path to a change are
//! rebuilt, everything else is shared through [`Arc`].
//!
//! # Invariants
//!
//! 1. After every operation each item's style in the written context
//!    satisfies [`GridRect::fits`] for that context's column count and the
//!    owning section's height.
//! 2. Section heights never drop below the configured minimum.
//! 3. Writing one context's style never touches the other context.
//! 4. Section and item ids stay unique: transforms cannot rename a node.
//!
//! # Failure Modes
//!
//! Unknown section or item ids are not errors. The operation logs at `trace`
//! and returns a tree equal to the input.

use std::sync::Arc;

use gridpage_core::{
    CellExtent, CellPoint, GridConfig, GridRect, ViewContext, ViewportClass, clamp_placement,
    clamp_to_grid,
};
use tracing::{debug, trace};

use crate::defaults::ItemDefaults;
use crate::id::{IdAllocator, ItemId, SectionId};
use crate::model::{DualStyle, ExtraFields, Item, ItemStyle, ItemType, Page, Section, Timestamp};

/// The active viewing context and its column count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridContext {
    pub context: ViewContext,
    pub columns: u32,
}

impl GridContext {
    #[must_use]
    pub const fn new(context: ViewContext, columns: u32) -> Self {
        Self { context, columns }
    }
}

impl From<ViewportClass> for GridContext {
    fn from(class: ViewportClass) -> Self {
        Self::new(class.context(), class.columns)
    }
}

/// How a freshly created item's two contexts are clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CreationClamp {
    /// Each context is clamped against its own column count.
    #[default]
    PerContext,
    /// Both contexts are clamped against the active context's column count.
    /// The inactive context may be out of bounds until it is next edited.
    ActiveContextOnly,
}

/// Static rules a tree is built with.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutRules {
    pub grid: GridConfig,
    pub defaults: ItemDefaults,
    pub creation_clamp: CreationClamp,
}

impl LayoutRules {
    #[must_use]
    pub fn new(grid: GridConfig, defaults: ItemDefaults) -> Self {
        Self {
            grid,
            defaults,
            creation_clamp: CreationClamp::default(),
        }
    }

    #[must_use]
    pub fn with_creation_clamp(mut self, policy: CreationClamp) -> Self {
        self.creation_clamp = policy;
        self
    }

    fn creation_columns(&self, active: GridContext, context: ViewContext) -> u32 {
        match self.creation_clamp {
            CreationClamp::ActiveContextOnly => active.columns,
            CreationClamp::PerContext if context == active.context => active.columns,
            CreationClamp::PerContext => self.grid.columns_for(context),
        }
    }
}

/// Selected section and item.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    pub section: Option<SectionId>,
    pub item: Option<ItemId>,
}

/// An item whose stored style does not fit its grid in one context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundsViolation {
    pub section: SectionId,
    pub item: ItemId,
    pub context: ViewContext,
    pub rect: GridRect,
    pub columns: u32,
    pub rows: u32,
}

/// A page plus editor selection, updated by whole-value replacement.
#[derive(Debug, Clone, PartialEq)]
pub struct PageTree {
    page: Page,
    selection: Selection,
    ids: IdAllocator,
    rules: Arc<LayoutRules>,
}

impl PageTree {
    /// A fresh page with one default section, selected.
    #[must_use]
    pub fn new(rules: Arc<LayoutRules>) -> Self {
        let mut ids = IdAllocator::default();
        let now = Timestamp::now();
        let mut page = Page {
            id: ids.next_page_id(),
            sections: Vec::new(),
            created_at: now.clone(),
            updated_at: now,
            extra: ExtraFields::new(),
        };
        let section = default_section(&rules.grid, ids.next_section_id(&page));
        page.sections.push(Arc::new(section));
        Self::from_parts(page, ids, rules)
    }

    /// Wrap a loaded page. The first section is selected and the id
    /// allocator is seeded past the page's existing ids.
    #[must_use]
    pub fn from_page(page: Page, rules: Arc<LayoutRules>) -> Self {
        let ids = IdAllocator::seeded_from(&page);
        Self::from_parts(page, ids, rules)
    }

    fn from_parts(page: Page, ids: IdAllocator, rules: Arc<LayoutRules>) -> Self {
        let selection = Selection {
            section: page.sections.first().map(|s| s.id.clone()),
            item: None,
        };
        Self {
            page,
            selection,
            ids,
            rules,
        }
    }

    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.page
    }

    #[must_use]
    pub fn into_page(self) -> Page {
        self.page
    }

    /// The same tree with the page's `updatedAt` replaced.
    #[must_use]
    pub fn with_updated_at(&self, at: Timestamp) -> Self {
        let mut next = self.clone();
        next.page.updated_at = at;
        next
    }

    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn rules(&self) -> &LayoutRules {
        &self.rules
    }

    #[must_use]
    pub fn sections(&self) -> &[Arc<Section>] {
        &self.page.sections
    }

    #[must_use]
    pub fn section(&self, id: &SectionId) -> Option<&Arc<Section>> {
        self.page.section(id)
    }

    #[must_use]
    pub fn item(&self, section_id: &SectionId, item_id: &ItemId) -> Option<&Arc<Item>> {
        self.section(section_id).and_then(|s| s.item(item_id))
    }

    // =========================================================================
    // Sections
    // =========================================================================

    /// Append a section with default height, background and no items.
    #[must_use]
    pub fn add_section(&self) -> Self {
        let mut ids = self.ids;
        let section = default_section(&self.rules.grid, ids.next_section_id(&self.page));
        debug!(section = %section.id, height = section.height, "section added");
        let mut sections = self.page.sections.clone();
        sections.push(Arc::new(section));
        self.rebuilt(sections, self.selection.clone(), ids)
    }

    /// Replace section `id` with `transform(section)`.
    ///
    /// The id is kept and the height is raised to the configured minimum if
    /// the transform lowered it further.
    #[must_use]
    pub fn update_section<F>(&self, id: &SectionId, transform: F) -> Self
    where
        F: FnOnce(&Section) -> Section,
    {
        let min_rows = self.rules.grid.min_section_rows;
        self.replace_section("update_section", id, |section| {
            let mut next = transform(section);
            next.id = section.id.clone();
            if next.height < min_rows {
                debug!(section = %next.id, requested = next.height, floor = min_rows, "section height raised to floor");
                next.height = min_rows;
            }
            Some(next)
        })
    }

    /// Set a section's row count, floored at the configured minimum. Items
    /// are never moved; see [`PageTree::bounds_report`].
    #[must_use]
    pub fn set_section_height(&self, id: &SectionId, rows: u32) -> Self {
        let floored = rows.max(self.rules.grid.min_section_rows);
        self.replace_section("set_section_height", id, |section| {
            if section.height == floored {
                return None;
            }
            debug!(section = %section.id, from = section.height, to = floored, "section height set");
            Some(Section {
                height: floored,
                ..section.clone()
            })
        })
    }

    #[must_use]
    pub fn set_section_background(&self, id: &SectionId, color: impl Into<String>) -> Self {
        let color = color.into();
        self.replace_section("set_section_background", id, |section| {
            Some(Section {
                background_color: color,
                ..section.clone()
            })
        })
    }

    /// Remove a section and all of its items.
    ///
    /// A selection pointing at the section falls back to the first remaining
    /// section, or to nothing. A selected item inside it is cleared.
    #[must_use]
    pub fn delete_section(&self, id: &SectionId) -> Self {
        let Some(removed) = self.section(id) else {
            trace!(op = "delete_section", section = %id, "section not found");
            return self.clone();
        };
        let sections: Vec<Arc<Section>> = self
            .page
            .sections
            .iter()
            .filter(|s| &s.id != id)
            .cloned()
            .collect();

        let mut selection = self.selection.clone();
        if selection.section.as_ref() == Some(id) {
            selection.section = sections.first().map(|s| s.id.clone());
        }
        if selection
            .item
            .as_ref()
            .is_some_and(|item| removed.item(item).is_some())
        {
            selection.item = None;
        }
        debug!(section = %id, items = removed.items.len(), "section deleted");
        self.rebuilt(sections, selection, self.ids)
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// Create an item of `item_type` at `origin` in section `section_id`.
    ///
    /// Extents come from the default table; both contexts get the same raw
    /// origin and are clamped per the rules' [`CreationClamp`] policy against
    /// the section's current height. Types without a palette default are
    /// ignored.
    #[must_use]
    pub fn add_item(
        &self,
        section_id: &SectionId,
        item_type: ItemType,
        origin: CellPoint,
        grid: GridContext,
    ) -> Self {
        let Some(pair) = self.rules.defaults.get(item_type) else {
            trace!(op = "add_item", %item_type, "no palette default for item type");
            return self.clone();
        };
        let Some(section) = self.section(section_id) else {
            trace!(op = "add_item", section = %section_id, "section not found");
            return self.clone();
        };

        let rect_for = |context: ViewContext| {
            let columns = self.rules.creation_columns(grid, context);
            clamp_to_grid(
                origin,
                pair.get(context).extent(),
                columns,
                section.height,
            )
        };
        let desktop = rect_for(ViewContext::Desktop);
        let mobile = rect_for(ViewContext::Mobile);

        let mut ids = self.ids;
        let item = Item {
            id: ids.next_item_id(&self.page),
            item_type: Some(item_type),
            color: None,
            content: None,
            style: DualStyle {
                desktop: ItemStyle::from_rect(desktop),
                mobile: ItemStyle::from_rect(mobile),
            },
            children: item_type.carries_children().then(Vec::new),
            extra: ExtraFields::new(),
        };
        debug!(
            section = %section_id,
            item = %item.id,
            %item_type,
            desktop = ?desktop,
            mobile = ?mobile,
            "item added"
        );

        let mut items = section.items.clone();
        items.push(Arc::new(item));
        let next = Section {
            items,
            ..Section::clone(section)
        };
        self.with_section(section_id, next, self.selection.clone(), ids)
    }

    /// Palette click: add an item at the origin of the selected section.
    #[must_use]
    pub fn add_item_to_selected_section(&self, item_type: ItemType, grid: GridContext) -> Self {
        match self.selection.section.clone() {
            Some(section) => self.add_item(&section, item_type, CellPoint::new(0, 0), grid),
            None => {
                trace!(op = "add_item_to_selected_section", "no section selected");
                self.clone()
            }
        }
    }

    /// Remove an item. Clears the item selection if it pointed at it.
    #[must_use]
    pub fn delete_item(&self, section_id: &SectionId, item_id: &ItemId) -> Self {
        let Some(section) = self.section(section_id) else {
            trace!(op = "delete_item", section = %section_id, "section not found");
            return self.clone();
        };
        if section.item(item_id).is_none() {
            trace!(op = "delete_item", section = %section_id, item = %item_id, "item not found");
            return self.clone();
        }
        let items = section
            .items
            .iter()
            .filter(|item| &item.id != item_id)
            .cloned()
            .collect();
        let next = Section {
            items,
            ..Section::clone(section)
        };
        let mut selection = self.selection.clone();
        if selection.item.as_ref() == Some(item_id) {
            selection.item = None;
        }
        debug!(section = %section_id, item = %item_id, "item deleted");
        self.with_section(section_id, next, selection, self.ids)
    }

    /// Replace an item with `transform(item)`. The caller clamps any
    /// geometry it writes; the id is kept.
    #[must_use]
    pub fn update_item<F>(&self, section_id: &SectionId, item_id: &ItemId, transform: F) -> Self
    where
        F: FnOnce(&Item) -> Item,
    {
        self.replace_item("update_item", section_id, item_id, |item, _| {
            Some(transform(item))
        })
    }

    /// Move an item in `grid.context`, keeping its extent.
    #[must_use]
    pub fn update_item_placement(
        &self,
        section_id: &SectionId,
        item_id: &ItemId,
        origin: CellPoint,
        grid: GridContext,
    ) -> Self {
        self.replace_item("update_item_placement", section_id, item_id, |item, section| {
            let style = item.style.get(grid.context);
            let rect = clamp_placement(origin, style.extent(), grid.columns, section.height);
            if rect == style.rect() {
                return None;
            }
            debug!(
                section = %section_id,
                item = %item_id,
                context = %grid.context,
                rect = ?rect,
                "item moved"
            );
            Some(with_context_rect(item, grid.context, rect))
        })
    }

    /// Move and resize an item in `grid.context` in one step.
    #[must_use]
    pub fn update_item_extent(
        &self,
        section_id: &SectionId,
        item_id: &ItemId,
        origin: CellPoint,
        extent: CellExtent,
        grid: GridContext,
    ) -> Self {
        self.replace_item("update_item_extent", section_id, item_id, |item, section| {
            let rect = clamp_to_grid(origin, extent, grid.columns, section.height);
            if rect == item.style.get(grid.context).rect() {
                return None;
            }
            debug!(
                section = %section_id,
                item = %item_id,
                context = %grid.context,
                rect = ?rect,
                "item resized"
            );
            Some(with_context_rect(item, grid.context, rect))
        })
    }

    #[must_use]
    pub fn update_item_content(
        &self,
        section_id: &SectionId,
        item_id: &ItemId,
        content: impl Into<String>,
    ) -> Self {
        let content = content.into();
        self.replace_item("update_item_content", section_id, item_id, |item, _| {
            Some(Item {
                content: Some(content),
                ..item.clone()
            })
        })
    }

    // =========================================================================
    // Selection
    // =========================================================================

    #[must_use]
    pub fn select_section(&self, id: &SectionId) -> Self {
        if self.section(id).is_none() {
            trace!(op = "select_section", section = %id, "section not found");
            return self.clone();
        }
        let mut next = self.clone();
        next.selection.section = Some(id.clone());
        next
    }

    /// Select an item and its section.
    #[must_use]
    pub fn select_item(&self, section_id: &SectionId, item_id: &ItemId) -> Self {
        if self.item(section_id, item_id).is_none() {
            trace!(op = "select_item", section = %section_id, item = %item_id, "item not found");
            return self.clone();
        }
        let mut next = self.clone();
        next.selection = Selection {
            section: Some(section_id.clone()),
            item: Some(item_id.clone()),
        };
        next
    }

    #[must_use]
    pub fn clear_selection(&self) -> Self {
        let mut next = self.clone();
        next.selection = Selection::default();
        next
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// Every top-level item whose style in some context does not fit that
    /// context's column count and its section's height.
    #[must_use]
    pub fn bounds_report(&self) -> Vec<BoundsViolation> {
        let mut violations = Vec::new();
        for section in &self.page.sections {
            for item in &section.items {
                for context in ViewContext::ALL {
                    let columns = self.rules.grid.columns_for(context);
                    let rect = item.style.get(context).rect();
                    if !rect.fits(columns, section.height) {
                        violations.push(BoundsViolation {
                            section: section.id.clone(),
                            item: item.id.clone(),
                            context,
                            rect,
                            columns,
                            rows: section.height,
                        });
                    }
                }
            }
        }
        violations
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn rebuilt(&self, sections: Vec<Arc<Section>>, selection: Selection, ids: IdAllocator) -> Self {
        Self {
            page: Page {
                id: self.page.id.clone(),
                sections,
                created_at: self.page.created_at.clone(),
                updated_at: self.page.updated_at.clone(),
                extra: self.page.extra.clone(),
            },
            selection,
            ids,
            rules: Arc::clone(&self.rules),
        }
    }

    fn with_section(
        &self,
        id: &SectionId,
        next: Section,
        selection: Selection,
        ids: IdAllocator,
    ) -> Self {
        let next = Arc::new(next);
        let sections = self
            .page
            .sections
            .iter()
            .map(|s| if &s.id == id { Arc::clone(&next) } else { Arc::clone(s) })
            .collect();
        self.rebuilt(sections, selection, ids)
    }

    /// `f` returns `None` when nothing changes.
    fn replace_section<F>(&self, op: &'static str, id: &SectionId, f: F) -> Self
    where
        F: FnOnce(&Section) -> Option<Section>,
    {
        let Some(section) = self.section(id) else {
            trace!(op, section = %id, "section not found");
            return self.clone();
        };
        match f(section) {
            Some(next) => self.with_section(id, next, self.selection.clone(), self.ids),
            None => self.clone(),
        }
    }

    /// `f` returns `None` when nothing changes.
    fn replace_item<F>(&self, op: &'static str, section_id: &SectionId, item_id: &ItemId, f: F) -> Self
    where
        F: FnOnce(&Item, &Section) -> Option<Item>,
    {
        let Some(section) = self.section(section_id) else {
            trace!(op, section = %section_id, "section not found");
            return self.clone();
        };
        let Some(item) = section.item(item_id) else {
            trace!(op, section = %section_id, item = %item_id, "item not found");
            return self.clone();
        };
        let Some(mut next) = f(item, section) else {
            return self.clone();
        };
        next.id = item.id.clone();
        let next = Arc::new(next);
        let items = section
            .items
            .iter()
            .map(|i| if &i.id == item_id { Arc::clone(&next) } else { Arc::clone(i) })
            .collect();
        let section_next = Section {
            items,
            ..Section::clone(section)
        };
        self.with_section(section_id, section_next, self.selection.clone(), self.ids)
    }
}

fn default_section(grid: &GridConfig, id: SectionId) -> Section {
    Section::new(id, grid.default_section_rows, grid.default_section_background.clone())
}

fn with_context_rect(item: &Item, context: ViewContext, rect: GridRect) -> Item {
    let style = item.style.get(context).with_rect(rect);
    Item {
        style: item.style.with(context, style),
        ..item.clone()
    }
}
