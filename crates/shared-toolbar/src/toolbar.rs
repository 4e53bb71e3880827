//! Toolbar abstraction driven by the shared toolbar coordinator.
//!
//! A [`Toolbar`] is bound to exactly one document at a time and repaints its
//! controls from a selection range. The coordinator is the only code that
//! changes the binding; hosts get read access through
//! [`SharedToolbar::with_toolbar`](crate::SharedToolbar::with_toolbar).
//!
//! [`FormatToolbar`] is the character-format toolbar used by the demos and
//! tests: one checkable control per configured [`Format`], checked when every
//! selected character carries that format.

use crate::config::ToolbarConfig;
use crate::document::{Document, DocumentHandle, Format, Range};
use crate::error::{ConfigurationError, Result};

/// A toolbar that reflects the selection of its bound document.
pub trait Toolbar: Send + 'static {
    /// The document this toolbar currently reflects and acts on.
    fn bound_document(&self) -> Option<&DocumentHandle>;

    /// Bind the toolbar to `document`.
    fn set_bound_document(&mut self, document: DocumentHandle);

    /// Repaint controls for `range` of the bound document.
    ///
    /// `None` means the bound document has no selection; controls show their
    /// unselected state.
    fn update(&mut self, range: Option<Range>);
}

/// A single checkable toolbar control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolbarControl {
    format: Format,
    active: bool,
}

impl ToolbarControl {
    /// The format this control reflects and toggles.
    pub fn format(&self) -> Format {
        self.format
    }

    /// Whether the control is currently checked.
    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Character format toolbar (bold, italic, underline, strike).
#[derive(Debug)]
pub struct FormatToolbar {
    controls: Vec<ToolbarControl>,
    bound: Option<DocumentHandle>,
    last_range: Option<Range>,
    update_count: u64,
}

impl FormatToolbar {
    /// Create a toolbar with one control per format, in the given order.
    ///
    /// Repeated formats are kept once.
    pub fn new(formats: impl IntoIterator<Item = Format>) -> Self {
        let mut controls: Vec<ToolbarControl> = Vec::new();
        for format in formats {
            if !controls.iter().any(|control| control.format == format) {
                controls.push(ToolbarControl {
                    format,
                    active: false,
                });
            }
        }
        Self {
            controls,
            bound: None,
            last_range: None,
            update_count: 0,
        }
    }

    /// Create a toolbar from configuration.
    pub fn from_config(config: &ToolbarConfig) -> Result<Self> {
        if config.controls.is_empty() {
            return Err(ConfigurationError::NoControls.into());
        }
        Ok(Self::new(config.controls.iter().copied()))
    }

    /// All controls, in toolbar order.
    pub fn controls(&self) -> &[ToolbarControl] {
        &self.controls
    }

    /// Whether the toolbar has a control for `format`.
    pub fn has_control(&self, format: Format) -> bool {
        self.controls.iter().any(|control| control.format == format)
    }

    /// Whether the control for `format` is checked.
    pub fn is_active(&self, format: Format) -> bool {
        self.controls
            .iter()
            .any(|control| control.format == format && control.active)
    }

    /// The range passed to the last repaint.
    pub fn last_range(&self) -> Option<Range> {
        self.last_range
    }

    /// Number of repaints so far.
    pub fn update_count(&self) -> u64 {
        self.update_count
    }
}

impl Default for FormatToolbar {
    fn default() -> Self {
        Self::new(Format::ALL)
    }
}

impl Toolbar for FormatToolbar {
    fn bound_document(&self) -> Option<&DocumentHandle> {
        self.bound.as_ref()
    }

    fn set_bound_document(&mut self, document: DocumentHandle) {
        self.bound = Some(document);
    }

    fn update(&mut self, range: Option<Range>) {
        self.update_count += 1;
        self.last_range = range;

        let format = match (&self.bound, range) {
            (Some(document), Some(range)) => Some(document.format(range)),
            _ => None,
        };
        for control in &mut self.controls {
            control.active = format.is_some_and(|format| format.has(control.format));
        }
    }
}
