#![forbid(unsafe_code)]

//! Page stores: where a saved page lives between sessions.
//!
//! A store holds at most one page, the way the browser build keeps a single
//! `gridPage` entry. [`MemoryPageStore`] keeps the serialized text in memory;
//! [`FilePageStore`] writes it to one JSON file, replacing it atomically via
//! a sibling temp file and a rename.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::document::DocumentError;
use crate::model::Page;

/// Errors from reading or writing a [`PageStore`].
#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
    Document(DocumentError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "page store I/O error: {e}"),
            Self::Document(e) => write!(f, "page store document error: {e}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Document(e) => Some(e),
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<DocumentError> for StoreError {
    fn from(err: DocumentError) -> Self {
        Self::Document(err)
    }
}

/// A single-slot page store.
pub trait PageStore {
    /// The stored document text, or `None` if nothing was saved yet.
    fn load_raw(&self) -> Result<Option<String>, StoreError>;

    /// Replace the stored document text.
    fn save_raw(&mut self, json: &str) -> Result<(), StoreError>;

    /// Decode and validate the stored page.
    fn load(&self) -> Result<Option<Page>, StoreError> {
        match self.load_raw()? {
            Some(json) => Ok(Some(Page::from_json_str(&json)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, page: &Page) -> Result<(), StoreError> {
        let json = page.to_json_string()?;
        self.save_raw(&json)
    }
}

/// In-memory store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryPageStore {
    slot: Option<String>,
}

impl MemoryPageStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with document text.
    #[must_use]
    pub fn with_raw(json: impl Into<String>) -> Self {
        Self {
            slot: Some(json.into()),
        }
    }

    #[must_use]
    pub fn raw(&self) -> Option<&str> {
        self.slot.as_deref()
    }
}

impl PageStore for MemoryPageStore {
    fn load_raw(&self) -> Result<Option<String>, StoreError> {
        Ok(self.slot.clone())
    }

    fn save_raw(&mut self, json: &str) -> Result<(), StoreError> {
        self.slot = Some(json.to_owned());
        Ok(())
    }
}

/// Store backed by one JSON file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePageStore {
    path: PathBuf,
}

impl FilePageStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl PageStore for FilePageStore {
    fn load_raw(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(json) => {
                debug!(path = %self.path.display(), bytes = json.len(), "page loaded");
                Ok(Some(json))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn save_raw(&mut self, json: &str) -> Result<(), StoreError> {
        let tmp = self.temp_path();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), bytes = json.len(), "page saved");
        Ok(())
    }
}
