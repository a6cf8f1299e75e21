#![forbid(unsafe_code)]

//! Per-type default extents used when an item is created from the palette.
//!
//! ```toml
//! [button]
//! desktop = { width = 3, height = 2 }
//! mobile = { width = 2, height = 1 }
//! ```
//!
//! Types absent from the table (the plain shapes) cannot be created from the
//! palette; lookups for them return `None`.

use std::path::Path;

use gridpage_core::{CellExtent, ConfigError, ViewContext};
use serde::{Deserialize, Serialize};

use crate::model::ItemType;

/// Width and height in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSize {
    pub width: u32,
    pub height: u32,
}

impl CellSize {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn extent(self) -> CellExtent {
        CellExtent::new(i64::from(self.width), i64::from(self.height))
    }
}

/// Default extent per viewing context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtentPair {
    pub desktop: CellSize,
    pub mobile: CellSize,
}

impl ExtentPair {
    #[must_use]
    pub const fn new(desktop: CellSize, mobile: CellSize) -> Self {
        Self { desktop, mobile }
    }

    #[must_use]
    pub const fn get(&self, context: ViewContext) -> CellSize {
        match context {
            ViewContext::Desktop => self.desktop,
            ViewContext::Mobile => self.mobile,
        }
    }
}

/// The palette's default extent table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemDefaults {
    #[serde(rename = "box")]
    pub box_item: ExtentPair,
    pub button: ExtentPair,
    pub text: ExtentPair,
    pub input_field: ExtentPair,
}

impl Default for ItemDefaults {
    fn default() -> Self {
        Self {
            box_item: ExtentPair::new(CellSize::new(2, 2), CellSize::new(2, 2)),
            button: ExtentPair::new(CellSize::new(3, 2), CellSize::new(2, 1)),
            text: ExtentPair::new(CellSize::new(2, 1), CellSize::new(2, 1)),
            input_field: ExtentPair::new(CellSize::new(4, 11), CellSize::new(4, 11)),
        }
    }
}

impl ItemDefaults {
    /// Default extents for `item_type`, or `None` for types the palette
    /// does not offer.
    #[must_use]
    pub const fn get(&self, item_type: ItemType) -> Option<ExtentPair> {
        match item_type {
            ItemType::Box => Some(self.box_item),
            ItemType::Button => Some(self.button),
            ItemType::Text => Some(self.text),
            ItemType::InputField => Some(self.input_field),
            ItemType::Circle | ItemType::Triangle | ItemType::Rectangle => None,
        }
    }

    #[must_use]
    pub fn extent(&self, item_type: ItemType, context: ViewContext) -> Option<CellExtent> {
        self.get(item_type).map(|pair| pair.get(context).extent())
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let table: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        table.checked()
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let table: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        table.checked()
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Every extent must be at least one cell on each axis.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let rows = [
            ("box", self.box_item),
            ("button", self.button),
            ("text", self.text),
            ("input_field", self.input_field),
        ];
        for (name, pair) in rows {
            for context in ViewContext::ALL {
                let size = pair.get(context);
                if size.width == 0 || size.height == 0 {
                    errors.push(format!(
                        "{name}.{context} extent must be at least 1x1, got {}x{}",
                        size.width, size.height
                    ));
                }
            }
        }
        errors
    }

    fn checked(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            tracing::warn!(count = errors.len(), "item defaults rejected");
            Err(ConfigError::Validation(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_table() {
        let d = ItemDefaults::default();
        assert_eq!(
            d.extent(ItemType::Box, ViewContext::Desktop),
            Some(CellExtent::new(2, 2))
        );
        assert_eq!(
            d.extent(ItemType::Button, ViewContext::Desktop),
            Some(CellExtent::new(3, 2))
        );
        assert_eq!(
            d.extent(ItemType::Button, ViewContext::Mobile),
            Some(CellExtent::new(2, 1))
        );
        assert_eq!(
            d.extent(ItemType::Text, ViewContext::Mobile),
            Some(CellExtent::new(2, 1))
        );
        assert_eq!(
            d.extent(ItemType::InputField, ViewContext::Mobile),
            Some(CellExtent::new(4, 11))
        );
        assert!(d.validate().is_empty());
    }

    #[test]
    fn shapes_have_no_palette_default() {
        let d = ItemDefaults::default();
        assert_eq!(d.get(ItemType::Circle), None);
        assert_eq!(d.get(ItemType::Triangle), None);
        assert_eq!(d.get(ItemType::Rectangle), None);
    }

    #[test]
    fn partial_toml_overrides_one_type() {
        let d = ItemDefaults::from_toml_str(
            "[button]\ndesktop = { width = 4, height = 2 }\nmobile = { width = 2, height = 2 }\n",
        )
        .unwrap();
        assert_eq!(d.button.desktop, CellSize::new(4, 2));
        assert_eq!(d.box_item, ItemDefaults::default().box_item);
    }

    #[test]
    fn json_uses_box_key() {
        let json = serde_json::to_value(ItemDefaults::default()).unwrap();
        assert_eq!(json["box"]["desktop"]["width"], 2);
        assert_eq!(json["input_field"]["mobile"]["height"], 11);
    }

    #[test]
    fn zero_extent_is_rejected() {
        let err = ItemDefaults::from_json_str(
            r#"{"text": {"desktop": {"width": 0, "height": 1}, "mobile": {"width": 2, "height": 1}}}"#,
        )
        .unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].starts_with("text.desktop"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("defaults.toml");
        std::fs::write(&path, "[text]\ndesktop = { width = 6, height = 1 }\nmobile = { width = 3, height = 1 }\n").unwrap();
        let d = ItemDefaults::from_toml_file(&path).unwrap();
        assert_eq!(d.text.desktop, CellSize::new(6, 1));
    }
}
