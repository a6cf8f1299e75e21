#![forbid(unsafe_code)]

//! DOM-shaped primitives the host hands to the adapter.

use gridpage_core::{PixelPoint, PixelRect};

/// Host-assigned identity of a DOM node, used to compare an event's
/// `target` with its `currentTarget`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "event-json", derive(serde::Deserialize))]
#[cfg_attr(feature = "event-json", serde(transparent))]
pub struct DomNodeId(pub u64);

/// Listener control the host must carry out.
///
/// Section resize and item gestures track the pointer on the document, not
/// on the element that started them, so the pointer can leave the element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    /// Register document-level `pointermove` / `pointerup` listeners.
    AttachDocumentListeners,
    /// Remove them again.
    DetachDocumentListeners,
}

/// Client coordinates relative to a container's bounding client rect.
#[must_use]
pub fn to_container(client: PixelPoint, container: PixelRect) -> PixelPoint {
    client.offset_from(container.origin())
}

/// A leave event marks a true boundary exit only when it was raised by the
/// listening element itself, not bubbled up from a descendant.
#[must_use]
pub fn is_boundary_leave(target: DomNodeId, current_target: DomNodeId) -> bool {
    target == current_target
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_relative_coordinates() {
        let rect = PixelRect::new(120.0, 300.5, 1000.0, 800.0);
        assert_eq!(
            to_container(PixelPoint::new(130.0, 310.5), rect),
            PixelPoint::new(10.0, 10.0)
        );
        assert_eq!(
            to_container(PixelPoint::new(100.0, 0.0), rect),
            PixelPoint::new(-20.0, -300.5)
        );
    }

    #[test]
    fn bubbled_leave_is_not_a_boundary_exit() {
        assert!(is_boundary_leave(DomNodeId(4), DomNodeId(4)));
        assert!(!is_boundary_leave(DomNodeId(9), DomNodeId(4)));
    }
}
