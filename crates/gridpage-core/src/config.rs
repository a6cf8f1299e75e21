#![forbid(unsafe_code)]

//! Grid configuration as data.
//!
//! Captures every grid constant as a single [`GridConfig`] that can be loaded
//! from TOML or JSON at startup.
//!
//! # Loading
//!
//! ```toml
//! # gridpage.toml
//! gap_px = 8.0
//! cell_aspect_ratio = 1.6
//! mobile_breakpoint_px = 768.0
//! mobile_columns = 12
//! desktop_columns = 24
//! ```
//!
//! ```rust,ignore
//! let config = GridConfig::from_toml_file("gridpage.toml")?;
//! let config = GridConfig::from_json_str(json)?;
//! ```
//!
//! # Defaults
//!
//! Every field defaults to the constants in the crate root, so
//! `GridConfig::default()` reproduces the built-in grid exactly.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    CELL_ASPECT_RATIO, DEFAULT_SECTION_BACKGROUND, DEFAULT_SECTION_ROWS, DESKTOP_COLUMNS, GAP_PX,
    MIN_SECTION_ROWS, MOBILE_BREAKPOINT_PX, MOBILE_COLUMNS,
};

/// Tunable grid parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Inter-cell gap in CSS pixels.
    pub gap_px: f64,
    /// Cell width divided by cell height.
    pub cell_aspect_ratio: f64,
    /// Viewports narrower than this are mobile.
    pub mobile_breakpoint_px: f64,
    /// Column count below the breakpoint.
    pub mobile_columns: u32,
    /// Column count at or above the breakpoint.
    pub desktop_columns: u32,
    /// Floor for section heights, in rows.
    pub min_section_rows: u32,
    /// Height of a new section, in rows.
    pub default_section_rows: u32,
    /// Background of a new section (any CSS color).
    pub default_section_background: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            gap_px: GAP_PX,
            cell_aspect_ratio: CELL_ASPECT_RATIO,
            mobile_breakpoint_px: MOBILE_BREAKPOINT_PX,
            mobile_columns: MOBILE_COLUMNS,
            desktop_columns: DESKTOP_COLUMNS,
            min_section_rows: MIN_SECTION_ROWS,
            default_section_rows: DEFAULT_SECTION_ROWS,
            default_section_background: DEFAULT_SECTION_BACKGROUND.to_owned(),
        }
    }
}

impl GridConfig {
    /// Load from a TOML string and validate.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.checked()
    }

    /// Load from a TOML file on disk and validate.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        crate::debug!(path = %path.display(), "loading grid config (toml)");
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string and validate.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.checked()
    }

    /// Load from a JSON file on disk and validate.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        crate::debug!(path = %path.display(), "loading grid config (json)");
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(ConfigError::TomlSerialize)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.gap_px.is_finite() || self.gap_px < 0.0 {
            errors.push(format!("gap_px must be finite and >= 0, got {}", self.gap_px));
        }
        if !self.cell_aspect_ratio.is_finite() || self.cell_aspect_ratio <= 0.0 {
            errors.push(format!(
                "cell_aspect_ratio must be finite and > 0, got {}",
                self.cell_aspect_ratio
            ));
        }
        if !self.mobile_breakpoint_px.is_finite() || self.mobile_breakpoint_px < 0.0 {
            errors.push(format!(
                "mobile_breakpoint_px must be finite and >= 0, got {}",
                self.mobile_breakpoint_px
            ));
        }
        if self.mobile_columns == 0 {
            errors.push("mobile_columns must be > 0".into());
        }
        if self.desktop_columns == 0 {
            errors.push("desktop_columns must be > 0".into());
        }
        if self.min_section_rows == 0 {
            errors.push("min_section_rows must be > 0".into());
        }
        if self.default_section_rows < self.min_section_rows {
            errors.push(format!(
                "default_section_rows ({}) must be >= min_section_rows ({})",
                self.default_section_rows, self.min_section_rows
            ));
        }
        if self.default_section_background.trim().is_empty() {
            errors.push("default_section_background must not be empty".into());
        }

        errors
    }

    fn checked(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            crate::warn!(count = errors.len(), "grid config rejected");
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Errors from loading a [`GridConfig`] (or any other gridpage table config).
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// TOML serialization error.
    TomlSerialize(toml::ser::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::TomlSerialize(e) => write!(f, "TOML serialize error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::TomlSerialize(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let c = GridConfig::default();
        assert_eq!(c.gap_px, 8.0);
        assert_eq!(c.cell_aspect_ratio, 1.6);
        assert_eq!(c.mobile_breakpoint_px, 768.0);
        assert_eq!(c.mobile_columns, 12);
        assert_eq!(c.desktop_columns, 24);
        assert_eq!(c.min_section_rows, 12);
        assert_eq!(c.default_section_rows, 24);
        assert_eq!(c.default_section_background, "#ffffff");
        assert!(c.validate().is_empty());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = GridConfig::from_toml_str("gap_px = 4.0\ndesktop_columns = 16\n").unwrap();
        assert_eq!(c.gap_px, 4.0);
        assert_eq!(c.desktop_columns, 16);
        assert_eq!(c.mobile_columns, 12);
    }

    #[test]
    fn json_round_trip() {
        let c = GridConfig {
            min_section_rows: 8,
            default_section_rows: 16,
            ..GridConfig::default()
        };
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(GridConfig::from_json_str(&json).unwrap(), c);
    }

    #[test]
    fn toml_round_trip() {
        let c = GridConfig::default();
        let toml = c.to_toml_string().unwrap();
        assert_eq!(GridConfig::from_toml_str(&toml).unwrap(), c);
    }

    #[test]
    fn invalid_values_are_listed() {
        let c = GridConfig {
            gap_px: -1.0,
            cell_aspect_ratio: 0.0,
            mobile_columns: 0,
            default_section_rows: 4,
            ..GridConfig::default()
        };
        let errors = c.validate();
        assert_eq!(errors.len(), 4);
        assert!(errors[0].contains("gap_px"));
    }

    #[test]
    fn loader_rejects_invalid_config() {
        let err = GridConfig::from_json_str(r#"{"desktop_columns": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref e) if e.len() == 1));
        assert!(err.to_string().contains("desktop_columns"));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = GridConfig::from_toml_str("gap_px = [").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = GridConfig::from_toml_file("/nonexistent/gridpage.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gridpage.json");
        std::fs::write(&path, r#"{"mobile_breakpoint_px": 600.0}"#).unwrap();
        let c = GridConfig::from_json_file(&path).unwrap();
        assert_eq!(c.mobile_breakpoint_px, 600.0);
    }
}
