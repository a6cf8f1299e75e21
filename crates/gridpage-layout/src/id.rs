#![forbid(unsafe_code)]

//! Page, section and item identifiers plus deterministic allocation.
//!
//! Identifiers are opaque strings on the wire so documents written by other
//! producers (UUIDs, slugs) load unchanged. Freshly allocated ids follow a
//! `<kind>-<n>` pattern; the allocator is seeded past every matching id in a
//! loaded page so new ids never collide with existing ones.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::Page;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[must_use]
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }
    };
}

string_id!(
    /// Identifier of a persisted page document.
    PageId
);
string_id!(
    /// Identifier of a section, unique within its page.
    SectionId
);
string_id!(
    /// Identifier of an item, unique within its page.
    ItemId
);

const PAGE_PREFIX: &str = "page-";
const SECTION_PREFIX: &str = "section-";
const ITEM_PREFIX: &str = "item-";

/// One `<prefix>N` sequence.
///
/// `next` becomes `None` once `u64::MAX` has been handed out or observed;
/// from then on ids spill to `<prefix><u64::MAX>-<k>` and are checked
/// against the ids already in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Counter {
    next: Option<u64>,
    spill: u64,
}

impl Counter {
    const fn new() -> Self {
        Self {
            next: Some(1),
            spill: 0,
        }
    }

    fn take(&mut self, prefix: &str, in_use: impl Fn(&str) -> bool) -> String {
        if let Some(n) = self.next {
            self.next = n.checked_add(1);
            return format!("{prefix}{n}");
        }
        loop {
            self.spill = self.spill.wrapping_add(1);
            let id = format!("{prefix}{}-{}", u64::MAX, self.spill);
            if !in_use(&id) {
                return id;
            }
        }
    }

    fn observe(&mut self, prefix: &str, raw: &str) {
        let Some(suffix) = raw.strip_prefix(prefix) else {
            return;
        };
        if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
            return;
        }
        let (Ok(n), Some(next)) = (suffix.parse::<u64>(), self.next) else {
            return;
        };
        if n >= next {
            self.next = n.checked_add(1);
        }
    }
}

/// Monotonic allocator for page, section and item ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdAllocator {
    page: Counter,
    section: Counter,
    item: Counter,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self {
            page: Counter::new(),
            section: Counter::new(),
            item: Counter::new(),
        }
    }
}

impl IdAllocator {
    /// Allocator seeded past every `page-N`, `section-N` and `item-N` id
    /// (including nested children) in `page`.
    #[must_use]
    pub fn seeded_from(page: &Page) -> Self {
        let mut ids = Self::default();
        ids.page.observe(PAGE_PREFIX, page.id.as_str());
        for section in &page.sections {
            ids.section.observe(SECTION_PREFIX, section.id.as_str());
            for item in &section.items {
                item.visit(&mut |nested| ids.item.observe(ITEM_PREFIX, nested.id.as_str()));
            }
        }
        ids
    }

    pub fn next_page_id(&mut self) -> PageId {
        PageId(self.page.take(PAGE_PREFIX, |_| false))
    }

    /// A section id not used in `page`.
    pub fn next_section_id(&mut self, page: &Page) -> SectionId {
        SectionId(self.section.take(SECTION_PREFIX, |id| page.has_section_id(id)))
    }

    /// An item id not used anywhere in `page`.
    pub fn next_item_id(&mut self, page: &Page) -> ItemId {
        ItemId(self.item.take(ITEM_PREFIX, |id| page.has_item_id(id)))
    }
}
