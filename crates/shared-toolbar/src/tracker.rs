//! Active document tracking.
//!
//! [`ActiveDocumentTracker`] watches the selection signal of every candidate
//! document and decides which one is active. A user selection with a range
//! (see [`ActivationPolicy`]) on a document other than the active one moves
//! the active pointer and invokes the activation callback. Everything else,
//! including repeated selections in the active document, is a no-op.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use shared_toolbar_core::ConnectionId;
use shared_toolbar_core::logging::targets;

use crate::config::ActivationPolicy;
use crate::document::{Document, DocumentHandle, SelectionChange};
use crate::error::{ConfigurationError, Result};

type ActivateFn = Box<dyn Fn(&DocumentHandle) + Send + Sync>;

/// Check that `documents` is non-empty and free of repeated handles.
pub(crate) fn validate_documents(documents: &[DocumentHandle]) -> Result<()> {
    if documents.is_empty() {
        return Err(ConfigurationError::EmptyDocumentSet.into());
    }
    let mut seen: HashMap<&DocumentHandle, usize> = HashMap::with_capacity(documents.len());
    for (position, document) in documents.iter().enumerate() {
        if let Some(&first) = seen.get(document) {
            return Err(ConfigurationError::DuplicateDocument {
                first,
                second: position,
            }
            .into());
        }
        seen.insert(document, position);
    }
    Ok(())
}

struct TrackerState {
    documents: Vec<DocumentHandle>,
    active: Mutex<DocumentHandle>,
    policy: ActivationPolicy,
    on_activate: ActivateFn,
}

impl TrackerState {
    fn on_selection_change(&self, position: usize, change: &SelectionChange) {
        let document = &self.documents[position];
        if !self.policy.activates(change) {
            tracing::trace!(
                target: targets::TRACKER,
                document = document.name(),
                source = ?change.source,
                range = ?change.range,
                "selection does not demonstrate focus"
            );
            return;
        }
        self.activate(document);
    }

    /// The active lock is held across the callback and the pointer moves only
    /// once the callback returns, so a panicking callback leaves the previous
    /// document active. The callback must not activate.
    fn activate(&self, document: &DocumentHandle) -> bool {
        let mut active = self.active.lock();
        if active.ptr_eq(document) {
            tracing::trace!(target: targets::TRACKER, document = document.name(), "already active");
            return false;
        }

        tracing::debug!(
            target: targets::TRACKER,
            from = active.name(),
            to = document.name(),
            "active document changed"
        );
        (self.on_activate)(document);
        *active = document.clone();
        true
    }
}

/// Decides which document among a fixed set is active.
pub struct ActiveDocumentTracker {
    state: Arc<TrackerState>,
    subscriptions: Vec<ConnectionId>,
}

impl ActiveDocumentTracker {
    /// Start tracking `documents`. The first document is active.
    ///
    /// `on_activate` runs each time another document becomes active; it does
    /// not run for the initial document.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::EmptyDocumentSet`] for no documents and
    /// [`ConfigurationError::DuplicateDocument`] when a handle repeats.
    pub fn new<F>(
        documents: Vec<DocumentHandle>,
        policy: ActivationPolicy,
        on_activate: F,
    ) -> Result<Self>
    where
        F: Fn(&DocumentHandle) + Send + Sync + 'static,
    {
        validate_documents(&documents)?;

        let state = Arc::new(TrackerState {
            active: Mutex::new(documents[0].clone()),
            documents,
            policy,
            on_activate: Box::new(on_activate),
        });

        let subscriptions = state
            .documents
            .iter()
            .enumerate()
            .map(|(position, document)| {
                let weak: Weak<TrackerState> = Arc::downgrade(&state);
                document.selection_changed().connect(move |change| {
                    if let Some(state) = weak.upgrade() {
                        state.on_selection_change(position, change);
                    }
                })
            })
            .collect();

        tracing::debug!(
            target: targets::TRACKER,
            documents = state.documents.len(),
            active = state.documents[0].name(),
            "tracking documents"
        );

        Ok(Self {
            state,
            subscriptions,
        })
    }

    /// Make `document` active.
    ///
    /// Returns `Ok(true)` when the active document changed and `Ok(false)`
    /// when `document` was already active.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::UnknownDocument`] if `document` is not one of the
    /// tracked documents.
    pub fn activate(&self, document: &DocumentHandle) -> Result<bool> {
        if !self.contains(document) {
            return Err(ConfigurationError::UnknownDocument {
                name: document.name().to_string(),
            }
            .into());
        }
        Ok(self.state.activate(document))
    }

    /// The active document.
    pub fn active(&self) -> DocumentHandle {
        self.state.active.lock().clone()
    }

    /// Position of the active document in the configured set.
    pub fn active_index(&self) -> usize {
        let active = self.state.active.lock();
        self.state
            .documents
            .iter()
            .position(|document| document.ptr_eq(&active))
            .unwrap_or_default()
    }

    /// The tracked documents, in configuration order.
    pub fn documents(&self) -> &[DocumentHandle] {
        &self.state.documents
    }

    /// Whether `document` is one of the tracked documents.
    pub fn contains(&self, document: &DocumentHandle) -> bool {
        self.state.documents.iter().any(|d| d.ptr_eq(document))
    }

    /// The activation policy in use.
    pub fn policy(&self) -> ActivationPolicy {
        self.state.policy
    }
}

impl Drop for ActiveDocumentTracker {
    fn drop(&mut self) {
        for (document, id) in self.state.documents.iter().zip(&self.subscriptions) {
            document.selection_changed().disconnect(*id);
        }
    }
}

impl std::fmt::Debug for ActiveDocumentTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveDocumentTracker")
            .field("documents", &self.state.documents)
            .field("active", &*self.state.active.lock())
            .field("policy", &self.state.policy)
            .finish()
    }
}
