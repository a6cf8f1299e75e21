#![forbid(unsafe_code)]

//! Which section, if any, currently renders its grid overlay.

use gridpage_layout::SectionId;
use tracing::trace;

/// Grid-overlay signal. At most one section shows its grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridVisibility {
    visible: Option<SectionId>,
}

impl GridVisibility {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the grid of `section`, hiding any other.
    pub fn show(&mut self, section: &SectionId) {
        if self.visible.as_ref() != Some(section) {
            trace!(%section, "grid shown");
            self.visible = Some(section.clone());
        }
    }

    pub fn hide(&mut self) {
        if let Some(section) = self.visible.take() {
            trace!(%section, "grid hidden");
        }
    }

    /// Show or hide by flag. Hiding a section that is not the visible one
    /// leaves the current overlay alone.
    pub fn toggle(&mut self, section: &SectionId, visible: bool) {
        if visible {
            self.show(section);
        } else if self.is_visible(section) {
            self.hide();
        }
    }

    #[must_use]
    pub fn is_visible(&self, section: &SectionId) -> bool {
        self.visible.as_ref() == Some(section)
    }

    #[must_use]
    pub fn visible_section(&self) -> Option<&SectionId> {
        self.visible.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_section_shows_its_grid() {
        let a = SectionId::new("a");
        let b = SectionId::new("b");
        let mut vis = GridVisibility::new();
        vis.show(&a);
        vis.show(&b);
        assert!(!vis.is_visible(&a));
        assert!(vis.is_visible(&b));
        vis.hide();
        assert_eq!(vis.visible_section(), None);
    }

    #[test]
    fn toggle_off_for_other_section_is_ignored() {
        let a = SectionId::new("a");
        let b = SectionId::new("b");
        let mut vis = GridVisibility::new();
        vis.toggle(&a, true);
        vis.toggle(&b, false);
        assert!(vis.is_visible(&a));
        vis.toggle(&a, false);
        assert!(!vis.is_visible(&a));
    }
}
