//! Evaluator configuration types
//!
//! The evaluator needs very little configuration: how property names are resolved
//! against nested events and whether skipped rules are reported. Everything else
//! (which filters belong to which segment, where events come from) is the caller's
//! business.

use serde::{Deserialize, Serialize};

/// Configuration for [`FilterEvaluator`](crate::FilterEvaluator)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// Resolve property names as paths into nested objects and arrays
    #[serde(default = "default_true")]
    pub nested_paths: bool,

    /// Separator between path segments (default: '.')
    #[serde(default = "default_separator")]
    pub path_separator: char,

    /// Emit a warning whenever a filter with an unknown condition is skipped
    #[serde(default = "default_true")]
    pub warn_on_unknown_condition: bool,
}

fn default_true() -> bool {
    true
}

fn default_separator() -> char {
    '.'
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            nested_paths: true,
            path_separator: default_separator(),
            warn_on_unknown_condition: true,
        }
    }
}

impl EvaluatorConfig {
    /// Create a new evaluator configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: enable or disable nested path lookup
    pub fn with_nested_paths(mut self, enabled: bool) -> Self {
        self.nested_paths = enabled;
        self
    }

    /// Builder method: set the path separator
    pub fn with_path_separator(mut self, separator: char) -> Self {
        self.path_separator = separator;
        self
    }

    /// Builder method: enable or disable unknown-condition warnings
    pub fn with_unknown_condition_warnings(mut self, enabled: bool) -> Self {
        self.warn_on_unknown_condition = enabled;
        self
    }
}
