//! Document abstraction consumed by the shared toolbar.
//!
//! A [`Document`] is an editable surface that announces selection moves and
//! content edits through two signals:
//!
//! - `selection_changed`: carries the new range, the previous range and the
//!   [`Source`] of the change
//! - `editor_changed`: the composite signal, fired for content edits *and*
//!   selection moves
//!
//! The coordinator never owns documents. It holds [`DocumentHandle`]s, which
//! compare by identity so that two documents with identical content are still
//! different documents.
//!
//! # Signal Order
//!
//! Implementations must emit `editor_changed` before `selection_changed` for
//! a selection move. A document that becomes active because of a user
//! selection then receives exactly one toolbar update for that interaction.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shared_toolbar_core::Signal;

/// A selection range in character offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Range {
    /// Offset of the first selected character.
    pub index: usize,
    /// Number of selected characters. Zero for a caret.
    pub length: usize,
}

impl Range {
    /// Create a range.
    pub fn new(index: usize, length: usize) -> Self {
        Self { index, length }
    }

    /// Create a collapsed range (a caret) at `index`.
    pub fn caret(index: usize) -> Self {
        Self { index, length: 0 }
    }

    /// Offset one past the last selected character.
    ///
    /// Saturates at `usize::MAX`.
    pub fn end(&self) -> usize {
        self.index.saturating_add(self.length)
    }

    /// Whether this range selects no characters.
    pub fn is_collapsed(&self) -> bool {
        self.length == 0
    }

    /// Clamp this range to a document of `len` characters.
    pub fn clamp(&self, len: usize) -> Self {
        let index = self.index.min(len);
        Self::new(index, self.length.min(len - index))
    }
}

/// Who initiated a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// A direct user interaction (click, keyboard, toolbar button).
    User,
    /// A programmatic change made through the document API.
    Api,
    /// A programmatic change that observers should not react to.
    Silent,
}

impl Source {
    /// Whether the change came from the user.
    pub fn is_user(self) -> bool {
        self == Source::User
    }
}

/// Payload of a document's `selection_changed` signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChange {
    /// The new selection, `None` when the document lost its selection.
    pub range: Option<Range>,
    /// The selection before the change.
    pub old_range: Option<Range>,
    /// Who moved the selection.
    pub source: Source,
}

/// A content edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextDelta {
    /// Text was inserted at `index`.
    Insert { index: usize, text: String },
    /// `length` characters were removed at `index`.
    Delete { index: usize, length: usize },
    /// A character format was switched on or off over `range`.
    Format {
        range: Range,
        format: Format,
        enabled: bool,
    },
}

/// Payload of a document's composite `editor_changed` signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorChange {
    /// The content changed.
    Text { delta: TextDelta, source: Source },
    /// The selection moved.
    Selection(SelectionChange),
}

impl EditorChange {
    /// Who initiated the change.
    pub fn source(&self) -> Source {
        match self {
            Self::Text { source, .. } => *source,
            Self::Selection(change) => change.source,
        }
    }
}

/// A character format a toolbar control can reflect and toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Bold,
    Italic,
    Underline,
    Strike,
}

impl Format {
    /// Every format, in toolbar order.
    pub const ALL: [Format; 4] = [Format::Bold, Format::Italic, Format::Underline, Format::Strike];

    /// The configuration name of this format.
    pub fn name(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
            Self::Strike => "strike",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Character-level formatting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CharFormat {
    /// Whether the text is bold.
    pub bold: bool,
    /// Whether the text is italic.
    pub italic: bool,
    /// Whether the text has underline.
    pub underline: bool,
    /// Whether the text has strikethrough.
    pub strike: bool,
}

impl CharFormat {
    /// Create a new default (unstyled) format.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `format` is switched on.
    pub fn has(&self, format: Format) -> bool {
        match format {
            Format::Bold => self.bold,
            Format::Italic => self.italic,
            Format::Underline => self.underline,
            Format::Strike => self.strike,
        }
    }

    /// Switch `format` on or off.
    pub fn set(&mut self, format: Format, enabled: bool) {
        match format {
            Format::Bold => self.bold = enabled,
            Format::Italic => self.italic = enabled,
            Format::Underline => self.underline = enabled,
            Format::Strike => self.strike = enabled,
        }
    }

    /// Builder method to switch `format` on or off.
    pub fn with(mut self, format: Format, enabled: bool) -> Self {
        self.set(format, enabled);
        self
    }

    /// Formats present in both `self` and `other`.
    pub fn intersect(&self, other: &CharFormat) -> CharFormat {
        CharFormat {
            bold: self.bold && other.bold,
            italic: self.italic && other.italic,
            underline: self.underline && other.underline,
            strike: self.strike && other.strike,
        }
    }

    /// Check if this format has any styling applied.
    pub fn is_styled(&self) -> bool {
        self.bold || self.italic || self.underline || self.strike
    }
}

/// An editable content surface a shared toolbar can be bound to.
pub trait Document: Send + Sync + 'static {
    /// Human readable name, used in logs and error messages.
    fn name(&self) -> &str;

    /// Signal fired when the selection moves.
    fn selection_changed(&self) -> &Signal<SelectionChange>;

    /// Composite signal fired for content edits and selection moves.
    fn editor_changed(&self) -> &Signal<EditorChange>;

    /// The current selection, `None` when the document has no selection.
    fn selection(&self) -> Option<Range>;

    /// Formats common to every character of `range`.
    ///
    /// For a caret this is the format that typing at the caret would use.
    fn format(&self, range: Range) -> CharFormat;

    /// Switch `format` on or off over `range`.
    fn format_text(&self, range: Range, format: Format, enabled: bool, source: Source);
}

/// A shared reference to a [`Document`], compared by identity.
#[derive(Clone)]
pub struct DocumentHandle(Arc<dyn Document>);

impl DocumentHandle {
    /// Wrap a shared document.
    pub fn new<D: Document>(document: Arc<D>) -> Self {
        Self(document)
    }

    /// Whether both handles refer to the same document.
    pub fn ptr_eq(&self, other: &DocumentHandle) -> bool {
        self.addr() == other.addr()
    }

    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.0) as *const ()
    }
}

impl<D: Document> From<Arc<D>> for DocumentHandle {
    fn from(document: Arc<D>) -> Self {
        Self::new(document)
    }
}

impl Deref for DocumentHandle {
    type Target = dyn Document;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl PartialEq for DocumentHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for DocumentHandle {}

impl Hash for DocumentHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl fmt::Debug for DocumentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DocumentHandle")
            .field(&self.name())
            .field(&self.addr())
            .finish()
    }
}

static_assertions::assert_impl_all!(DocumentHandle: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_clamp() {
        assert_eq!(Range::new(2, 10).clamp(5), Range::new(2, 3));
        assert_eq!(Range::new(8, 2).clamp(5), Range::caret(5));
        assert!(Range::caret(3).is_collapsed());
        assert_eq!(Range::new(1, 4).end(), 5);
        assert_eq!(Range::new(usize::MAX, 1).end(), usize::MAX);
        assert_eq!(Range::new(3, usize::MAX).clamp(5), Range::new(3, 2));
    }

    #[test]
    fn test_char_format_intersect() {
        let a = CharFormat::new().with(Format::Bold, true).with(Format::Italic, true);
        let b = CharFormat::new().with(Format::Bold, true);

        let common = a.intersect(&b);
        assert!(common.has(Format::Bold));
        assert!(!common.has(Format::Italic));
        assert!(!CharFormat::new().is_styled());
    }

    #[test]
    fn test_editor_change_source() {
        let change = EditorChange::Text {
            delta: TextDelta::Delete { index: 0, length: 1 },
            source: Source::Api,
        };
        assert_eq!(change.source(), Source::Api);
        assert!(!change.source().is_user());
    }
}
