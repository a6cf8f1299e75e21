#![forbid(unsafe_code)]

//! JSON codec, validation and load-time repair for page documents.
//!
//! # Failure Modes
//!
//! - Malformed JSON or a shape mismatch: [`DocumentError::Json`].
//! - Two sections (or two items anywhere in the page, children included)
//!   sharing an id: [`DocumentError::DuplicateSectionId`] /
//!   [`DocumentError::DuplicateItemId`].
//! - `createdAt` / `updatedAt` not RFC 3339: [`DocumentError::InvalidTimestamp`].
//!
//! Recoverable defects are repaired instead of rejected, see [`repair`]:
//! an empty section list gains one default section and section heights
//! below the minimum are raised to it. Items outside their grid are left
//! where they are and logged.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use gridpage_core::GridConfig;
use tracing::warn;

use crate::id::{IdAllocator, ItemId, SectionId};
use crate::model::{Page, Section, Timestamp};
use crate::tree::{LayoutRules, PageTree};

/// Errors from decoding or validating a page document.
#[derive(Debug)]
pub enum DocumentError {
    /// JSON syntax or shape error.
    Json(serde_json::Error),
    /// A section id occurs more than once.
    DuplicateSectionId { id: SectionId },
    /// An item id occurs more than once.
    DuplicateItemId { id: ItemId },
    /// A timestamp field is not an RFC 3339 date-time.
    InvalidTimestamp { field: &'static str, value: String },
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(e) => write!(f, "page JSON error: {e}"),
            Self::DuplicateSectionId { id } => write!(f, "duplicate section id {id}"),
            Self::DuplicateItemId { id } => write!(f, "duplicate item id {id}"),
            Self::InvalidTimestamp { field, value } => {
                write!(f, "{field} is not an RFC 3339 timestamp: {value:?}")
            }
        }
    }
}

impl std::error::Error for DocumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DocumentError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// A change made to a loaded document so it satisfies the model invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Repair {
    /// The page had no sections; a default one was appended.
    AddedDefaultSection { section: SectionId },
    /// A section was shorter than the minimum row count.
    RaisedSectionHeight { section: SectionId, from: u32, to: u32 },
}

impl Page {
    /// Decode and validate. No repair is applied.
    pub fn from_json_str(s: &str) -> Result<Self, DocumentError> {
        let page: Self = serde_json::from_str(s)?;
        page.validate()?;
        Ok(page)
    }

    pub fn to_json_string(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_string_pretty(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check id uniqueness and timestamp syntax.
    pub fn validate(&self) -> Result<(), DocumentError> {
        check_timestamp("createdAt", &self.created_at)?;
        check_timestamp("updatedAt", &self.updated_at)?;

        let mut sections = BTreeSet::new();
        let mut items = BTreeSet::new();
        for section in &self.sections {
            if !sections.insert(&section.id) {
                return Err(DocumentError::DuplicateSectionId {
                    id: section.id.clone(),
                });
            }
            for item in &section.items {
                let mut duplicate = None;
                item.visit(&mut |nested| {
                    if duplicate.is_none() && !items.insert(&nested.id) {
                        duplicate = Some(nested.id.clone());
                    }
                });
                if let Some(id) = duplicate {
                    return Err(DocumentError::DuplicateItemId { id });
                }
            }
        }
        Ok(())
    }
}

fn check_timestamp(field: &'static str, ts: &Timestamp) -> Result<(), DocumentError> {
    ts.parse().map(|_| ()).map_err(|_| DocumentError::InvalidTimestamp {
        field,
        value: ts.as_str().to_owned(),
    })
}

/// Bring a decoded page up to the model invariants.
#[must_use]
pub fn repair(mut page: Page, grid: &GridConfig) -> (Page, Vec<Repair>) {
    let mut repairs = Vec::new();

    for section in &mut page.sections {
        if section.height < grid.min_section_rows {
            let from = section.height;
            Arc::make_mut(section).height = grid.min_section_rows;
            warn!(section = %section.id, from, to = grid.min_section_rows, "section height below minimum raised");
            repairs.push(Repair::RaisedSectionHeight {
                section: section.id.clone(),
                from,
                to: grid.min_section_rows,
            });
        }
    }

    if page.sections.is_empty() {
        let id = IdAllocator::seeded_from(&page).next_section_id(&page);
        page.sections.push(Arc::new(Section::new(
            id.clone(),
            grid.default_section_rows,
            grid.default_section_background.clone(),
        )));
        warn!(page = %page.id, section = %id, "page had no sections; default section added");
        repairs.push(Repair::AddedDefaultSection { section: id });
    }

    (page, repairs)
}

impl PageTree {
    /// Decode, validate and repair a stored document into a tree.
    ///
    /// Items that do not fit their section are logged at `warn` and kept.
    pub fn load_json(s: &str, rules: Arc<LayoutRules>) -> Result<(Self, Vec<Repair>), DocumentError> {
        let page = Page::from_json_str(s)?;
        let (page, repairs) = repair(page, &rules.grid);
        let tree = Self::from_page(page, rules);
        for violation in tree.bounds_report() {
            warn!(
                section = %violation.section,
                item = %violation.item,
                context = %violation.context,
                rect = ?violation.rect,
                columns = violation.columns,
                rows = violation.rows,
                "item outside its grid"
            );
        }
        Ok((tree, repairs))
    }

    /// The page stamped for saving: `updatedAt` set to `at`, id and
    /// `createdAt` kept.
    #[must_use]
    pub fn saved_at(&self, at: Timestamp) -> Page {
        self.with_updated_at(at).into_page()
    }
}
