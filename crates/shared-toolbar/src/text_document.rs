//! In-memory rich text document.
//!
//! [`TextDocument`] is a small [`Document`] implementation: plain characters
//! with per-character [`CharFormat`] and a single selection. Hosts with their
//! own editor implement [`Document`] directly; this type backs demos and tests.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use shared_toolbar::{Document, Range, Source, TextDocument};
//!
//! let doc = Arc::new(TextDocument::with_text("notes", "Hello"));
//! doc.set_selection(Some(Range::new(0, 5)), Source::User);
//! assert_eq!(doc.selection(), Some(Range::new(0, 5)));
//! ```

use parking_lot::RwLock;
use shared_toolbar_core::Signal;
use shared_toolbar_core::logging::targets;

use crate::document::{
    CharFormat, Document, EditorChange, Format, Range, SelectionChange, Source, TextDelta,
};

struct TextState {
    chars: Vec<char>,
    formats: Vec<CharFormat>,
    selection: Option<Range>,
}

impl TextState {
    fn format_at_caret(&self, index: usize) -> CharFormat {
        // Typing continues the format of the character before the caret.
        if index > 0 {
            self.formats.get(index - 1).copied().unwrap_or_default()
        } else {
            self.formats.first().copied().unwrap_or_default()
        }
    }
}

/// An in-memory editable document.
pub struct TextDocument {
    name: String,
    state: RwLock<TextState>,
    selection_changed: Signal<SelectionChange>,
    editor_changed: Signal<EditorChange>,
}

impl TextDocument {
    /// Create an empty document.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_text(name, "")
    }

    /// Create a document with unformatted initial text.
    pub fn with_text(name: impl Into<String>, text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let formats = vec![CharFormat::default(); chars.len()];
        Self {
            name: name.into(),
            state: RwLock::new(TextState {
                chars,
                formats,
                selection: None,
            }),
            selection_changed: Signal::new(),
            editor_changed: Signal::new(),
        }
    }

    /// The document text.
    pub fn text(&self) -> String {
        self.state.read().chars.iter().collect()
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.state.read().chars.len()
    }

    /// Whether the document has no text.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Move the selection.
    ///
    /// The range is clamped to the document. Nothing is emitted when the
    /// selection does not change or when `source` is [`Source::Silent`].
    pub fn set_selection(&self, range: Option<Range>, source: Source) {
        let change = {
            let mut state = self.state.write();
            let len = state.chars.len();
            let range = range.map(|r| r.clamp(len));
            if state.selection == range {
                return;
            }
            let old_range = std::mem::replace(&mut state.selection, range);
            SelectionChange {
                range,
                old_range,
                source,
            }
        };

        tracing::trace!(
            target: targets::DOCUMENT,
            document = %self.name,
            range = ?change.range,
            source = ?source,
            "selection changed"
        );
        self.emit_selection(change);
    }

    /// Drop the selection, as when the document loses focus.
    pub fn blur(&self, source: Source) {
        self.set_selection(None, source);
    }

    /// Insert unformatted-by-default text at `index`.
    ///
    /// Inserted characters take the format at the insertion point. A selection
    /// at or after `index` shifts right.
    pub fn insert_text(&self, index: usize, text: &str, source: Source) {
        if text.is_empty() {
            return;
        }
        let index = {
            let mut state = self.state.write();
            let index = index.min(state.chars.len());
            let format = state.format_at_caret(index);
            let inserted: Vec<char> = text.chars().collect();
            let count = inserted.len();

            state.chars.splice(index..index, inserted);
            state
                .formats
                .splice(index..index, std::iter::repeat_n(format, count));

            if let Some(selection) = state.selection.as_mut() {
                if selection.index >= index {
                    selection.index += count;
                } else if selection.end() > index {
                    selection.length += count;
                }
            }
            index
        };

        self.emit_text(
            TextDelta::Insert {
                index,
                text: text.to_string(),
            },
            source,
        );
    }

    /// Remove `length` characters at `index`.
    pub fn delete_text(&self, index: usize, length: usize, source: Source) {
        let range = {
            let mut state = self.state.write();
            let range = Range::new(index, length).clamp(state.chars.len());
            if range.is_collapsed() {
                return;
            }
            state.chars.drain(range.index..range.end());
            state.formats.drain(range.index..range.end());

            if let Some(selection) = state.selection.as_mut() {
                let start = shift_for_delete(selection.index, range);
                let end = shift_for_delete(selection.end(), range);
                *selection = Range::new(start, end - start);
            }
            range
        };

        self.emit_text(
            TextDelta::Delete {
                index: range.index,
                length: range.length,
            },
            source,
        );
    }

    fn emit_selection(&self, change: SelectionChange) {
        if change.source == Source::Silent {
            return;
        }
        self.editor_changed
            .emit(EditorChange::Selection(change.clone()));
        self.selection_changed.emit(change);
    }

    fn emit_text(&self, delta: TextDelta, source: Source) {
        if source == Source::Silent {
            return;
        }
        self.editor_changed.emit(EditorChange::Text { delta, source });
    }
}

fn shift_for_delete(offset: usize, deleted: Range) -> usize {
    if offset <= deleted.index {
        offset
    } else if offset >= deleted.end() {
        offset - deleted.length
    } else {
        deleted.index
    }
}

impl Document for TextDocument {
    fn name(&self) -> &str {
        &self.name
    }

    fn selection_changed(&self) -> &Signal<SelectionChange> {
        &self.selection_changed
    }

    fn editor_changed(&self) -> &Signal<EditorChange> {
        &self.editor_changed
    }

    fn selection(&self) -> Option<Range> {
        self.state.read().selection
    }

    fn format(&self, range: Range) -> CharFormat {
        let state = self.state.read();
        let range = range.clamp(state.chars.len());
        if range.is_collapsed() {
            return state.format_at_caret(range.index);
        }
        state.formats[range.index..range.end()]
            .iter()
            .copied()
            .reduce(|common, format| common.intersect(&format))
            .unwrap_or_default()
    }

    fn format_text(&self, range: Range, format: Format, enabled: bool, source: Source) {
        let range = {
            let mut state = self.state.write();
            let range = range.clamp(state.chars.len());
            if range.is_collapsed() {
                return;
            }
            for char_format in &mut state.formats[range.index..range.end()] {
                char_format.set(format, enabled);
            }
            range
        };

        self.emit_text(
            TextDelta::Format {
                range,
                format,
                enabled,
            },
            source,
        );
    }
}

impl std::fmt::Debug for TextDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("TextDocument")
            .field("name", &self.name)
            .field("len", &state.chars.len())
            .field("selection", &state.selection)
            .finish()
    }
}
