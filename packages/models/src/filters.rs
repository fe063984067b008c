//! Filter widget configuration.
//!
//! The dashboard's sidebar is driven by a list of filter configs. Each
//! widget shape is a variant of [`FilterKind`], discriminated by an explicit
//! `kind` tag so the presentation layer can match exhaustively.

use serde::{Deserialize, Serialize};

use crate::GenericProperties;

/// One selectable category in a checkbox filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// The property value this category matches.
    pub value: serde_json::Value,
    /// Display text.
    pub text: String,
}

/// The widget-specific part of a filter config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FilterKind {
    /// A boolean on/off toggle.
    Switch {
        /// Initial toggle state.
        default: bool,
    },
    /// A multi-select category list.
    Checkbox {
        /// Initially selected category values.
        default: Vec<serde_json::Value>,
        /// All selectable categories.
        categories: Vec<Category>,
        /// Number of layout columns.
        ncol: u32,
    },
    /// A numeric range slider.
    Slider {
        /// Initial `[low, high]` range; `None` means derive from the data.
        #[serde(skip_serializing_if = "Option::is_none", default)]
        default: Option<[f64; 2]>,
        /// Whether to render a histogram behind the slider.
        show_histogram: bool,
        /// Whether range limits come from the loaded data.
        auto_limits: bool,
        /// Whether records missing this property are filtered out.
        exclude_missing: bool,
    },
}

/// Configuration for one sidebar filter widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// The property name the filter applies to.
    pub name: String,
    /// Display label.
    pub label: String,
    /// The widget shape and its parameters.
    #[serde(flatten)]
    pub kind: FilterKind,
}

/// Columns excluded from download payloads, with per-column formatting
/// overrides keyed by property name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Property names dropped before export.
    pub exclude: Vec<String>,
    /// Literal replacement values applied per column before export.
    #[serde(default)]
    pub overrides: GenericProperties,
}
