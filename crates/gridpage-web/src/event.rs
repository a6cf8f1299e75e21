#![forbid(unsafe_code)]

//! DOM events as the host reports them.
//!
//! With the `event-json` feature, [`parse_dom_event`] decodes the JSON a JS
//! host posts for each listener callback, e.g.
//!
//! ```json
//! { "type": "section_drag_over", "section": "section-1",
//!   "client": { "x": 410, "y": 233 },
//!   "container": { "x": 160, "y": 129, "width": 1144, "height": 784 } }
//! ```

use gridpage_core::{PixelPoint, PixelRect};
use gridpage_layout::{ItemId, ItemType, SectionId};
use gridpage_runtime::ResizeHandle;

use crate::dom::DomNodeId;

/// One DOM listener callback. Client coordinates are viewport-relative;
/// `container` is the grid container's bounding client rect.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "event-json", derive(serde::Deserialize))]
#[cfg_attr(feature = "event-json", serde(tag = "type", rename_all = "snake_case"))]
pub enum DomEvent {
    ViewportResized {
        width: f64,
    },
    /// Reference cell measured; `width: null` when it is not laid out.
    CellMeasured {
        width: Option<f64>,
    },
    PaletteDragStart {
        item_type: ItemType,
    },
    PaletteDragEnd,
    PaletteClick {
        item_type: ItemType,
    },
    SectionDragOver {
        section: SectionId,
        client: PixelPoint,
        container: PixelRect,
    },
    SectionDragLeave {
        section: SectionId,
        target: DomNodeId,
        current_target: DomNodeId,
    },
    SectionDrop {
        section: SectionId,
        client: PixelPoint,
        container: PixelRect,
    },
    /// Drop that landed outside every section.
    DocumentDrop,
    ItemPointerDown {
        section: SectionId,
        item: ItemId,
        handle: Option<ResizeHandle>,
        client: PixelPoint,
        container: PixelRect,
    },
    SectionHandlePointerDown {
        section: SectionId,
        client: PixelPoint,
    },
    DocumentPointerMove {
        client: PixelPoint,
    },
    DocumentPointerUp {
        client: PixelPoint,
    },
    PointerCancel,
    Blur,
    VisibilityHidden,
    Unmount,
}

/// Errors from decoding host event JSON.
#[cfg(feature = "event-json")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomEventParseError {
    /// Malformed JSON or an unknown event shape.
    Json(String),
}

#[cfg(feature = "event-json")]
impl core::fmt::Display for DomEventParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "DOM event parse error: {msg}"),
        }
    }
}

#[cfg(feature = "event-json")]
impl std::error::Error for DomEventParseError {}

/// Decode one host-encoded DOM event.
#[cfg(feature = "event-json")]
pub fn parse_dom_event(json: &str) -> Result<DomEvent, DomEventParseError> {
    serde_json::from_str(json).map_err(|e| DomEventParseError::Json(e.to_string()))
}
