//! Toolbar rebinding.
//!
//! [`ToolbarRebinder`] owns the shared toolbar and one long-lived change
//! handler. The handler is connected to the composite `editor_changed` signal
//! of exactly one document, the active one, and repaints the toolbar from
//! that document's current selection whenever it fires.
//!
//! [`ToolbarRebinder::rebind`] moves handler and toolbar binding together:
//!
//! 1. connect the handler to the new document
//! 2. record the new document as active
//! 3. bind the toolbar to the new document
//! 4. repaint the toolbar from the new document's selection
//! 5. disconnect the handler from the previously active document
//!
//! The steps run under one lock, so nobody observes the handler on none of
//! the documents or on a document other than the toolbar's. If the toolbar or
//! the document panics during steps 3 or 4, steps 1 and 2 are undone before
//! the panic continues, leaving the previous binding in place.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use shared_toolbar_core::logging::{span_names, targets};
use shared_toolbar_core::{ConnectionId, Slot};

use crate::document::{Document, DocumentHandle, EditorChange};
use crate::toolbar::Toolbar;

/// The handler connected to the active document's composite signal.
pub type ChangeHandler = Slot<EditorChange>;

/// The active document and the handler's connection on it.
struct ActiveBinding {
    document: DocumentHandle,
    connection: ConnectionId,
}

/// Keeps a toolbar and its change handler bound to the active document.
pub struct ToolbarRebinder<T: Toolbar> {
    toolbar: Arc<Mutex<T>>,
    active: Arc<RwLock<DocumentHandle>>,
    handler: ChangeHandler,
    binding: Mutex<ActiveBinding>,
}

impl<T: Toolbar> ToolbarRebinder<T> {
    /// Bind `toolbar` to `document` and synchronize it once.
    pub fn new(mut toolbar: T, document: DocumentHandle) -> Self {
        toolbar.set_bound_document(document.clone());
        let toolbar = Arc::new(Mutex::new(toolbar));
        let active = Arc::new(RwLock::new(document.clone()));
        let handler = change_handler(Arc::downgrade(&toolbar), Arc::downgrade(&active));

        let connection = document.editor_changed().connect_shared(handler.clone());
        tracing::debug!(target: targets::REBINDER, document = document.name(), "toolbar bound");

        let rebinder = Self {
            toolbar,
            active,
            handler,
            binding: Mutex::new(ActiveBinding {
                document,
                connection,
            }),
        };
        rebinder.sync();
        rebinder
    }

    /// Move the toolbar and its change handler to `document`.
    ///
    /// Rebinding to the document that is already bound reconnects the handler
    /// on the same document and synchronizes once more.
    ///
    /// # Panics
    ///
    /// Panics raised by the toolbar or the document while binding or
    /// synchronizing are propagated after the rebind is rolled back: the
    /// handler stays connected to the previous document only, and the toolbar
    /// and active document point at the previous document again.
    pub fn rebind(&self, document: DocumentHandle) {
        let _span =
            tracing::debug_span!(target: targets::REBINDER, span_names::REBIND, to = document.name())
                .entered();
        let mut binding = self.binding.lock();
        let previous = binding.document.clone();

        // Connect first so a failure below never leaves the handler unregistered.
        let connection = document.editor_changed().connect_shared(self.handler.clone());
        *self.active.write() = document.clone();

        let applied = panic::catch_unwind(AssertUnwindSafe(|| {
            let mut toolbar = self.toolbar.lock();
            toolbar.set_bound_document(document.clone());
            toolbar.update(document.selection());
        }));
        if let Err(payload) = applied {
            tracing::warn!(
                target: targets::REBINDER,
                from = previous.name(),
                to = document.name(),
                "toolbar rebind failed, restoring previous binding"
            );
            document.editor_changed().disconnect(connection);
            *self.active.write() = previous.clone();
            let mut toolbar = self.toolbar.lock();
            if !toolbar
                .bound_document()
                .is_some_and(|bound| bound.ptr_eq(&previous))
            {
                toolbar.set_bound_document(previous.clone());
            }
            drop(toolbar);
            drop(binding);
            panic::resume_unwind(payload);
        }

        if let Err(err) = previous.editor_changed().try_disconnect(binding.connection) {
            tracing::warn!(
                target: targets::REBINDER,
                document = previous.name(),
                %err,
                "change handler was not connected to the previously active document"
            );
        }

        tracing::debug!(
            target: targets::REBINDER,
            from = previous.name(),
            to = document.name(),
            "toolbar rebound"
        );
        *binding = ActiveBinding {
            document,
            connection,
        };
    }

    /// Repaint the toolbar from the active document's current selection.
    ///
    /// This is the same work the change handler does when it fires.
    pub fn sync(&self) {
        sync_toolbar(&self.toolbar, &self.active);
    }

    /// The document the toolbar is bound to.
    pub fn active(&self) -> DocumentHandle {
        self.binding.lock().document.clone()
    }

    /// Whether the change handler is connected to `document`.
    pub fn is_bound_to(&self, document: &DocumentHandle) -> bool {
        let binding = self.binding.lock();
        binding.document.ptr_eq(document)
            && document.editor_changed().is_connected(binding.connection)
    }

    /// The shared change handler.
    pub fn handler(&self) -> &ChangeHandler {
        &self.handler
    }

    /// Read access to the toolbar.
    ///
    /// Do not emit document signals from `f`; the toolbar lock is held.
    pub fn with_toolbar<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.toolbar.lock())
    }
}

impl<T: Toolbar> Drop for ToolbarRebinder<T> {
    fn drop(&mut self) {
        let binding = self.binding.get_mut();
        binding.document.editor_changed().disconnect(binding.connection);
        tracing::debug!(
            target: targets::REBINDER,
            document = binding.document.name(),
            "toolbar unbound"
        );
    }
}

impl<T: Toolbar + std::fmt::Debug> std::fmt::Debug for ToolbarRebinder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolbarRebinder")
            .field("active", &self.binding.lock().document)
            .field("toolbar", &*self.toolbar.lock())
            .finish()
    }
}

/// Build the change handler.
///
/// It looks up the active document at call time instead of capturing one, and
/// holds only weak references so a document never keeps a dropped rebinder
/// alive.
fn change_handler<T: Toolbar>(
    toolbar: Weak<Mutex<T>>,
    active: Weak<RwLock<DocumentHandle>>,
) -> ChangeHandler {
    Arc::new(move |_change: &EditorChange| {
        let (Some(toolbar), Some(active)) = (toolbar.upgrade(), active.upgrade()) else {
            return;
        };
        sync_toolbar(&toolbar, &active);
    })
}

fn sync_toolbar<T: Toolbar>(toolbar: &Mutex<T>, active: &RwLock<DocumentHandle>) {
    let document = active.read().clone();
    let range = document.selection();
    tracing::trace!(
        target: targets::REBINDER,
        document = document.name(),
        range = ?range,
        "updating toolbar"
    );
    toolbar.lock().update(range);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, Range, Source};
    use crate::text_document::TextDocument;

    #[derive(Default)]
    struct CountingToolbar {
        bound: Option<DocumentHandle>,
        updates: Vec<Option<Range>>,
    }

    impl Toolbar for CountingToolbar {
        fn bound_document(&self) -> Option<&DocumentHandle> {
            self.bound.as_ref()
        }

        fn set_bound_document(&mut self, document: DocumentHandle) {
            self.bound = Some(document);
        }

        fn update(&mut self, range: Option<Range>) {
            self.updates.push(range);
        }
    }

    fn doc(name: &str) -> (Arc<TextDocument>, DocumentHandle) {
        let doc = Arc::new(TextDocument::with_text(name, "0123456789"));
        let handle = DocumentHandle::new(doc.clone());
        (doc, handle)
    }

    #[test]
    fn test_new_binds_and_syncs() {
        let (d1, h1) = doc("d1");
        d1.set_selection(Some(Range::new(1, 2)), Source::Api);

        let rebinder = ToolbarRebinder::new(CountingToolbar::default(), h1.clone());

        assert!(rebinder.is_bound_to(&h1));
        assert_eq!(d1.editor_changed().connection_count(), 1);
        rebinder.with_toolbar(|t| {
            assert_eq!(t.bound_document(), Some(&h1));
            assert_eq!(t.updates, vec![Some(Range::new(1, 2))]);
        });
    }

    #[test]
    fn test_rebind_moves_handler() {
        let (d1, h1) = doc("d1");
        let (d2, h2) = doc("d2");
        d2.set_selection(Some(Range::new(3, 4)), Source::Api);
        let rebinder = ToolbarRebinder::new(CountingToolbar::default(), h1.clone());

        rebinder.rebind(h2.clone());

        assert_eq!(d1.editor_changed().connection_count(), 0);
        assert_eq!(d2.editor_changed().connection_count(), 1);
        assert!(rebinder.is_bound_to(&h2));
        assert!(!rebinder.is_bound_to(&h1));
        assert_eq!(rebinder.active(), h2);
        rebinder.with_toolbar(|t| {
            assert_eq!(t.bound_document(), Some(&h2));
            assert_eq!(t.updates.last(), Some(&Some(Range::new(3, 4))));
        });

        // The old document no longer drives the toolbar.
        d1.insert_text(0, "x", Source::User);
        rebinder.with_toolbar(|t| assert_eq!(t.updates.len(), 2));
    }

    #[test]
    fn test_rebind_same_document_is_safe() {
        let (d1, h1) = doc("d1");
        let rebinder = ToolbarRebinder::new(CountingToolbar::default(), h1.clone());

        rebinder.rebind(h1.clone());

        assert_eq!(d1.editor_changed().connection_count(), 1);
        assert!(rebinder.is_bound_to(&h1));
        rebinder.with_toolbar(|t| assert_eq!(t.updates.len(), 2));
    }

    #[test]
    fn test_handler_is_reused_across_rebinds() {
        let (_d1, h1) = doc("d1");
        let (_d2, h2) = doc("d2");
        let rebinder = ToolbarRebinder::new(CountingToolbar::default(), h1.clone());
        let before = rebinder.handler().clone();

        rebinder.rebind(h2);
        rebinder.rebind(h1);

        assert!(Arc::ptr_eq(&before, rebinder.handler()));
    }

    /// Panics when asked to bind or repaint `refused`.
    struct RefusingToolbar {
        refused: DocumentHandle,
        fail_on_update: bool,
        bound: Option<DocumentHandle>,
        updates: usize,
    }

    impl RefusingToolbar {
        fn new(refused: &DocumentHandle, fail_on_update: bool) -> Self {
            Self {
                refused: refused.clone(),
                fail_on_update,
                bound: None,
                updates: 0,
            }
        }
    }

    impl Toolbar for RefusingToolbar {
        fn bound_document(&self) -> Option<&DocumentHandle> {
            self.bound.as_ref()
        }

        fn set_bound_document(&mut self, document: DocumentHandle) {
            if !self.fail_on_update && document.ptr_eq(&self.refused) {
                panic!("cannot bind {}", document.name());
            }
            self.bound = Some(document);
        }

        fn update(&mut self, _range: Option<Range>) {
            if let Some(bound) = &self.bound
                && self.fail_on_update
                && bound.ptr_eq(&self.refused)
            {
                panic!("cannot repaint {}", bound.name());
            }
            self.updates += 1;
        }
    }

    fn assert_rebind_rolled_back(fail_on_update: bool) {
        let (d1, h1) = doc("d1");
        let (d2, h2) = doc("d2");
        let rebinder = ToolbarRebinder::new(RefusingToolbar::new(&h2, fail_on_update), h1.clone());

        let result = std::panic::catch_unwind(AssertUnwindSafe(|| rebinder.rebind(h2.clone())));

        assert!(result.is_err());
        assert_eq!(rebinder.active(), h1);
        assert!(rebinder.is_bound_to(&h1));
        assert_eq!(d1.editor_changed().connection_count(), 1);
        assert_eq!(d2.editor_changed().connection_count(), 0);
        rebinder.with_toolbar(|t| assert_eq!(t.bound_document(), Some(&h1)));

        // The previous document still drives the toolbar.
        let before = rebinder.with_toolbar(|t| t.updates);
        d1.insert_text(0, "x", Source::User);
        rebinder.with_toolbar(|t| assert_eq!(t.updates, before + 1));
    }

    #[test]
    fn test_failed_bind_keeps_previous_binding() {
        assert_rebind_rolled_back(false);
    }

    #[test]
    fn test_failed_repaint_keeps_previous_binding() {
        assert_rebind_rolled_back(true);
    }

    #[test]
    fn test_drop_disconnects_handler() {
        let (d1, h1) = doc("d1");
        let (d2, h2) = doc("d2");
        let rebinder = ToolbarRebinder::new(CountingToolbar::default(), h1);
        rebinder.rebind(h2);

        drop(rebinder);

        assert_eq!(d1.editor_changed().connection_count(), 0);
        assert_eq!(d2.editor_changed().connection_count(), 0);
    }
}
