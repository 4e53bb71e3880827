//! Shared toolbar configuration.
//!
//! Configuration is read from TOML:
//!
//! ```toml
//! [toolbar]
//! controls = ["bold", "italic", "underline", "strike"]
//!
//! [activation]
//! collapsed_selection_activates = true
//! ```
//!
//! Every section and key is optional; missing values take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use shared_toolbar_core::logging::targets;

use crate::document::{Format, SelectionChange};
use crate::error::{ConfigurationError, Error, Result};

/// Top-level configuration for a [`SharedToolbar`](crate::SharedToolbar).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SharedToolbarConfig {
    /// Toolbar controls.
    pub toolbar: ToolbarConfig,
    /// When a selection signal makes its document active.
    pub activation: ActivationPolicy,
}

impl SharedToolbarConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::config_io(path, e))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(target: targets::CONFIG, path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Check settings that TOML alone cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.toolbar.controls.is_empty() {
            return Err(ConfigurationError::NoControls.into());
        }
        Ok(())
    }
}

/// Which controls the format toolbar shows, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolbarConfig {
    /// Formats with a toolbar control.
    pub controls: Vec<Format>,
}

impl Default for ToolbarConfig {
    fn default() -> Self {
        Self {
            controls: Format::ALL.to_vec(),
        }
    }
}

/// Decides whether a selection signal demonstrates focus.
///
/// Only user-initiated selections with a range ever activate a document.
/// Programmatic and silent changes, and lost selections, never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ActivationPolicy {
    /// Whether a caret (zero-length selection) counts as focus.
    pub collapsed_selection_activates: bool,
}

impl Default for ActivationPolicy {
    fn default() -> Self {
        Self {
            collapsed_selection_activates: true,
        }
    }
}

impl ActivationPolicy {
    /// Whether `change` should make its document active.
    pub fn activates(&self, change: &SelectionChange) -> bool {
        if !change.source.is_user() {
            return false;
        }
        match change.range {
            Some(range) => self.collapsed_selection_activates || !range.is_collapsed(),
            None => false,
        }
    }
}
