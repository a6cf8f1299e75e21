#![forbid(unsafe_code)]

//! Page document model.
//!
//! The persisted shape is camelCase JSON:
//!
//! ```json
//! { "id": "...", "createdAt": "...", "updatedAt": "...",
//!   "sections": [ { "id": "...", "height": 24, "backgroundColor": "#ffffff",
//!     "items": [ { "id": "...", "type": "box",
//!       "style": { "desktop": { "position": { "x": 0, "y": 0 }, "width": 2, "height": 2 },
//!                  "mobile":  { "position": { "x": 0, "y": 0 }, "width": 2, "height": 2 } },
//!       "children": [] } ] } ] }
//! ```
//!
//! # Invariants
//!
//! 1. Geometry is stored in grid cells only, never pixels.
//! 2. Desktop and mobile styles are independent records; nothing here writes
//!    one as a side effect of writing the other.
//! 3. Every struct keeps an `extra` bag of unknown JSON fields and writes it
//!    back unchanged, so a load/save cycle reproduces fields this crate does
//!    not understand.
//! 4. Sections and items are held behind [`Arc`]; an update replaces the
//!    changed path and shares every untouched sibling with the prior page.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use gridpage_core::{CellExtent, CellPoint, GridRect, ViewContext};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::id::{ItemId, PageId, SectionId};

/// Unknown JSON fields carried through load/save.
pub type ExtraFields = BTreeMap<String, Value>;

/// Semantic item type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Box,
    Circle,
    Triangle,
    Rectangle,
    Button,
    Text,
    InputField,
}

impl ItemType {
    pub const ALL: [Self; 7] = [
        Self::Box,
        Self::Circle,
        Self::Triangle,
        Self::Rectangle,
        Self::Button,
        Self::Text,
        Self::InputField,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Box => "box",
            Self::Circle => "circle",
            Self::Triangle => "triangle",
            Self::Rectangle => "rectangle",
            Self::Button => "button",
            Self::Text => "text",
            Self::InputField => "input_field",
        }
    }

    /// Only containers get a (initially empty) child list.
    #[must_use]
    pub const fn carries_children(self) -> bool {
        matches!(self, Self::Box)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-left cell of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: u32,
    pub y: u32,
}

impl GridPosition {
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Visual properties. Orthogonal to geometry; kept verbatim across every
/// geometry mutation.
///
/// Numeric-or-string values stay as raw JSON so `4`, `4.0` and `"4px"` all
/// survive a round trip unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<Value>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Placement and appearance of an item in one viewing context.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ItemStyle {
    pub position: GridPosition,
    pub width: u32,
    pub height: u32,
    #[serde(flatten)]
    pub visual: VisualProps,
}

impl ItemStyle {
    /// Style with the given placement and no visual properties.
    #[must_use]
    pub fn from_rect(rect: GridRect) -> Self {
        Self {
            position: GridPosition::new(rect.x, rect.y),
            width: rect.width,
            height: rect.height,
            visual: VisualProps::default(),
        }
    }

    #[must_use]
    pub const fn rect(&self) -> GridRect {
        GridRect::new(self.position.x, self.position.y, self.width, self.height)
    }

    #[must_use]
    pub fn origin(&self) -> CellPoint {
        self.rect().origin()
    }

    #[must_use]
    pub fn extent(&self) -> CellExtent {
        self.rect().extent()
    }

    /// Copy with position and extent replaced; visual properties kept.
    #[must_use]
    pub fn with_rect(&self, rect: GridRect) -> Self {
        Self {
            position: GridPosition::new(rect.x, rect.y),
            width: rect.width,
            height: rect.height,
            visual: self.visual.clone(),
        }
    }
}

/// One [`ItemStyle`] per viewing context.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DualStyle {
    pub desktop: ItemStyle,
    pub mobile: ItemStyle,
}

impl DualStyle {
    #[must_use]
    pub const fn get(&self, context: ViewContext) -> &ItemStyle {
        match context {
            ViewContext::Desktop => &self.desktop,
            ViewContext::Mobile => &self.mobile,
        }
    }

    /// Copy with the style of `context` replaced. The other context is
    /// carried over untouched.
    #[must_use]
    pub fn with(&self, context: ViewContext, style: ItemStyle) -> Self {
        match context {
            ViewContext::Desktop => Self {
                desktop: style,
                mobile: self.mobile.clone(),
            },
            ViewContext::Mobile => Self {
                desktop: self.desktop.clone(),
                mobile: style,
            },
        }
    }
}

/// A placed layout element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<ItemType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub style: DualStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Item>>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Item {
    /// Call `f` on this item and then on every nested child, depth first.
    pub fn visit<'a>(&'a self, f: &mut dyn FnMut(&'a Item)) {
        f(self);
        if let Some(children) = &self.children {
            for child in children {
                child.visit(f);
            }
        }
    }
}

/// A horizontal band of the page with its own row count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: SectionId,
    pub height: u32,
    pub background_color: String,
    #[serde(default)]
    pub items: Vec<Arc<Item>>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Section {
    /// Empty section with the given height and background.
    #[must_use]
    pub fn new(id: SectionId, height: u32, background_color: impl Into<String>) -> Self {
        Self {
            id,
            height,
            background_color: background_color.into(),
            items: Vec::new(),
            extra: ExtraFields::new(),
        }
    }

    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&Arc<Item>> {
        self.items.iter().find(|item| &item.id == id)
    }
}

/// The persisted root document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: PageId,
    pub sections: Vec<Arc<Section>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Page {
    #[must_use]
    pub fn section(&self, id: &SectionId) -> Option<&Arc<Section>> {
        self.sections.iter().find(|section| &section.id == id)
    }

    /// Total number of items, nested children included.
    #[must_use]
    pub fn item_count(&self) -> usize {
        let mut count = 0;
        for section in &self.sections {
            for item in &section.items {
                item.visit(&mut |_| count += 1);
            }
        }
        count
    }

    #[must_use]
    pub fn has_section_id(&self, raw: &str) -> bool {
        self.sections.iter().any(|section| section.id.as_str() == raw)
    }

    /// Whether any item, nested children included, carries `raw` as its id.
    #[must_use]
    pub fn has_item_id(&self, raw: &str) -> bool {
        let mut found = false;
        for section in &self.sections {
            for item in &section.items {
                item.visit(&mut |nested| found |= nested.id.as_str() == raw);
            }
        }
        found
    }
}

/// An ISO-8601 timestamp kept as its original text.
///
/// Stored verbatim so a loaded document writes back byte-identical
/// timestamps; [`Timestamp::now`] produces UTC with millisecond precision and
/// a `Z` suffix.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    #[must_use]
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    #[must_use]
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self(at.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    /// Wrap raw text without checking it; see [`Timestamp::parse`].
    #[must_use]
    pub fn new_unchecked(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse as RFC 3339, normalized to UTC.
    pub fn parse(&self) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(&self.0).map(|at| at.with_timezone(&Utc))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
