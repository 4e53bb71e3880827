//! The shared toolbar coordinator.

use std::sync::Arc;

use shared_toolbar_core::logging::targets;

use crate::config::{ActivationPolicy, SharedToolbarConfig};
use crate::document::{Document, DocumentHandle, Format, Source};
use crate::error::Result;
use crate::rebinder::ToolbarRebinder;
use crate::toolbar::{FormatToolbar, Toolbar};
use crate::tracker::{ActiveDocumentTracker, validate_documents};

/// One toolbar shared by several documents.
///
/// The toolbar follows whichever document the user last selected in, or the
/// document passed to [`set_active_document`](Self::set_active_document).
/// Each coordinator keeps its own active document; several coordinators can
/// share documents without affecting each other's bindings.
///
/// Dropping the coordinator disconnects everything it connected.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use shared_toolbar::{
///     Document, DocumentHandle, FormatToolbar, Range, SharedToolbar, Source, TextDocument,
///     Toolbar,
/// };
///
/// let intro = Arc::new(TextDocument::with_text("intro", "Hello"));
/// let body = Arc::new(TextDocument::with_text("body", "World"));
/// let documents = vec![DocumentHandle::new(intro), DocumentHandle::new(body.clone())];
///
/// let shared = SharedToolbar::new(documents, FormatToolbar::default())?;
/// body.set_selection(Some(Range::new(0, 5)), Source::User);
///
/// assert_eq!(shared.active_document().name(), "body");
/// shared.with_toolbar(|toolbar| {
///     assert_eq!(toolbar.bound_document().map(|d| d.name()), Some("body"));
/// });
/// # Ok::<(), shared_toolbar::Error>(())
/// ```
pub struct SharedToolbar<T: Toolbar> {
    tracker: ActiveDocumentTracker,
    rebinder: Arc<ToolbarRebinder<T>>,
}

impl<T: Toolbar> SharedToolbar<T> {
    /// Share `toolbar` between `documents` with the default activation policy.
    ///
    /// The first document is active and the toolbar is synchronized from it.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfiguration`](crate::Error::InvalidConfiguration)
    /// when `documents` is empty or repeats a document.
    pub fn new(documents: Vec<DocumentHandle>, toolbar: T) -> Result<Self> {
        Self::with_policy(documents, toolbar, ActivationPolicy::default())
    }

    /// Share `toolbar` between `documents` using the activation settings
    /// from `config`.
    ///
    /// The `[toolbar]` section describes a [`FormatToolbar`] and is not read
    /// here; build the toolbar with [`FormatToolbar::from_config`] to apply it.
    pub fn with_config(
        documents: Vec<DocumentHandle>,
        toolbar: T,
        config: &SharedToolbarConfig,
    ) -> Result<Self> {
        Self::with_policy(documents, toolbar, config.activation)
    }

    /// Share `toolbar` between `documents` with an explicit activation policy.
    pub fn with_policy(
        documents: Vec<DocumentHandle>,
        toolbar: T,
        policy: ActivationPolicy,
    ) -> Result<Self> {
        validate_documents(&documents)?;

        let rebinder = Arc::new(ToolbarRebinder::new(toolbar, documents[0].clone()));
        let on_activate = {
            let rebinder = rebinder.clone();
            move |document: &DocumentHandle| rebinder.rebind(document.clone())
        };
        let tracker = ActiveDocumentTracker::new(documents, policy, on_activate)?;

        Ok(Self { tracker, rebinder })
    }

    /// Make `document` active without a user selection.
    ///
    /// Returns `Ok(true)` if the toolbar was rebound and `Ok(false)` if
    /// `document` was already active.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfiguration`](crate::Error::InvalidConfiguration) if
    /// `document` is not one of this toolbar's documents.
    pub fn set_active_document(&self, document: &DocumentHandle) -> Result<bool> {
        self.tracker.activate(document)
    }

    /// The active document.
    pub fn active_document(&self) -> DocumentHandle {
        self.tracker.active()
    }

    /// Position of the active document among [`documents`](Self::documents).
    pub fn active_index(&self) -> usize {
        self.tracker.active_index()
    }

    /// The documents sharing this toolbar, in configuration order.
    pub fn documents(&self) -> &[DocumentHandle] {
        self.tracker.documents()
    }

    /// Whether the toolbar's change handler is connected to `document`.
    pub fn is_bound_to(&self, document: &DocumentHandle) -> bool {
        self.rebinder.is_bound_to(document)
    }

    /// Repaint the toolbar from the active document.
    pub fn sync(&self) {
        self.rebinder.sync();
    }

    /// Read access to the toolbar.
    ///
    /// Do not change documents from `f`; the toolbar lock is held.
    pub fn with_toolbar<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.rebinder.with_toolbar(f)
    }
}

impl SharedToolbar<FormatToolbar> {
    /// Toggle `format` over the active document's selection, as a toolbar
    /// button press would.
    ///
    /// Returns `false` without changing anything when the toolbar has no
    /// control for `format` or the active document has no non-empty selection.
    pub fn toggle_format(&self, format: Format) -> bool {
        let document = self.rebinder.active();
        let Some(range) = document.selection().filter(|range| !range.is_collapsed()) else {
            return false;
        };
        let Some(enabled) = self.with_toolbar(|toolbar| {
            toolbar
                .has_control(format)
                .then(|| !toolbar.is_active(format))
        }) else {
            return false;
        };

        tracing::debug!(
            target: targets::REBINDER,
            document = document.name(),
            %format,
            enabled,
            "toolbar format action"
        );
        document.format_text(range, format, enabled, Source::User);
        true
    }
}

impl<T: Toolbar + std::fmt::Debug> std::fmt::Debug for SharedToolbar<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedToolbar")
            .field("tracker", &self.tracker)
            .field("rebinder", &self.rebinder)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolbarConfig;
    use crate::document::Range;
    use crate::text_document::TextDocument;

    #[derive(Debug, Default)]
    struct PlainToolbar {
        bound: Option<DocumentHandle>,
    }

    impl Toolbar for PlainToolbar {
        fn bound_document(&self) -> Option<&DocumentHandle> {
            self.bound.as_ref()
        }

        fn set_bound_document(&mut self, document: DocumentHandle) {
            self.bound = Some(document);
        }

        fn update(&mut self, _range: Option<Range>) {}
    }

    #[test]
    fn test_with_config_ignores_toolbar_section_for_other_toolbars() {
        let a = Arc::new(TextDocument::with_text("a", "alpha"));
        let b = Arc::new(TextDocument::with_text("b", "beta"));
        let documents = vec![DocumentHandle::new(a), DocumentHandle::new(b.clone())];
        let config = SharedToolbarConfig {
            toolbar: ToolbarConfig {
                controls: Vec::new(),
            },
            activation: ActivationPolicy {
                collapsed_selection_activates: false,
            },
        };

        let shared =
            SharedToolbar::with_config(documents.clone(), PlainToolbar::default(), &config).unwrap();

        // The activation section still applies.
        b.set_selection(Some(Range::caret(1)), Source::User);
        assert_eq!(shared.active_document(), documents[0]);
        b.set_selection(Some(Range::new(0, 2)), Source::User);
        assert_eq!(shared.active_document(), documents[1]);
    }
}
