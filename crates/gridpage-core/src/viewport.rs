#![forbid(unsafe_code)]

//! Viewport classification: responsive column count and device context.
//!
//! A viewport narrower than the breakpoint is mobile with the mobile column
//! count; everything else is desktop. Classification is pure and re-run on
//! every resize notification.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::GridConfig;

/// Which of an item's two placements is being viewed or edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewContext {
    #[default]
    Desktop,
    Mobile,
}

impl ViewContext {
    /// Both contexts, desktop first.
    pub const ALL: [Self; 2] = [Self::Desktop, Self::Mobile];

    /// The context that is not `self`.
    #[inline]
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Desktop => Self::Mobile,
            Self::Mobile => Self::Desktop,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Mobile => "mobile",
        }
    }
}

impl fmt::Display for ViewContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying a viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportClass {
    pub columns: u32,
    pub is_mobile: bool,
}

impl ViewportClass {
    /// The item placement context this viewport edits.
    #[inline]
    #[must_use]
    pub const fn context(&self) -> ViewContext {
        if self.is_mobile {
            ViewContext::Mobile
        } else {
            ViewContext::Desktop
        }
    }
}

impl Default for ViewportClass {
    /// Before the first measurement the grid assumes mobile.
    fn default() -> Self {
        Self {
            columns: crate::MOBILE_COLUMNS,
            is_mobile: true,
        }
    }
}

/// Classify a viewport width with the default breakpoint and column counts.
///
/// `width < 768` ⇒ 12 columns, mobile; otherwise 24 columns, desktop.
#[must_use]
pub fn classify_viewport(width_px: f64) -> ViewportClass {
    GridConfig::default().classify(width_px)
}

impl GridConfig {
    /// Classify a viewport width against this configuration.
    ///
    /// Non-finite widths classify as desktop, matching a plain `<` test.
    #[must_use]
    pub fn classify(&self, width_px: f64) -> ViewportClass {
        if width_px < self.mobile_breakpoint_px {
            ViewportClass {
                columns: self.mobile_columns,
                is_mobile: true,
            }
        } else {
            ViewportClass {
                columns: self.desktop_columns,
                is_mobile: false,
            }
        }
    }

    /// Column count of the given placement context.
    #[inline]
    #[must_use]
    pub const fn columns_for(&self, context: ViewContext) -> u32 {
        match context {
            ViewContext::Desktop => self.desktop_columns,
            ViewContext::Mobile => self.mobile_columns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_viewport_is_mobile() {
        let class = classify_viewport(375.0);
        assert_eq!(class.columns, 12);
        assert!(class.is_mobile);
        assert_eq!(class.context(), ViewContext::Mobile);
    }

    #[test]
    fn breakpoint_itself_is_desktop() {
        let class = classify_viewport(768.0);
        assert_eq!(class.columns, 24);
        assert!(!class.is_mobile);
        assert_eq!(class.context(), ViewContext::Desktop);
    }

    #[test]
    fn just_below_breakpoint_is_mobile() {
        assert!(classify_viewport(767.9).is_mobile);
    }

    #[test]
    fn zero_width_is_mobile() {
        assert_eq!(classify_viewport(0.0).columns, 12);
    }

    #[test]
    fn nan_width_is_desktop() {
        assert_eq!(classify_viewport(f64::NAN).columns, 24);
    }

    #[test]
    fn custom_breakpoint_is_honoured() {
        let config = GridConfig {
            mobile_breakpoint_px: 1024.0,
            ..GridConfig::default()
        };
        assert!(config.classify(900.0).is_mobile);
        assert!(!config.classify(1024.0).is_mobile);
    }

    #[test]
    fn columns_for_each_context() {
        let config = GridConfig::default();
        assert_eq!(config.columns_for(ViewContext::Desktop), 24);
        assert_eq!(config.columns_for(ViewContext::Mobile), 12);
    }

    #[test]
    fn other_context_flips() {
        assert_eq!(ViewContext::Desktop.other(), ViewContext::Mobile);
        assert_eq!(ViewContext::Mobile.other(), ViewContext::Desktop);
    }

    #[test]
    fn context_serializes_lowercase() {
        let json = serde_json::to_string(&ViewContext::Mobile).unwrap();
        assert_eq!(json, "\"mobile\"");
    }
}
