//! One toolbar shared by several editable documents.
//!
//! A page with several editors often wants a single formatting toolbar. This
//! crate keeps such a toolbar bound to whichever document the user is working
//! in:
//!
//! - **Active document tracking**: a user selection in a document makes it
//!   active; programmatic selections and lost selections do not
//! - **Rebinding**: the toolbar's change handler moves from the previously
//!   active document to the new one, so it is never connected twice or not at
//!   all
//! - **Synchronization**: the toolbar repaints immediately after a rebind, and
//!   again on every content or selection change in the active document
//!
//! Documents and toolbars are consumed through the [`Document`] and
//! [`Toolbar`] traits. [`TextDocument`] and [`FormatToolbar`] are small
//! implementations for demos and tests.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use shared_toolbar::{
//!     Document, DocumentHandle, Format, FormatToolbar, Range, SharedToolbar, Source,
//!     TextDocument,
//! };
//!
//! let title = Arc::new(TextDocument::with_text("title", "Quarterly report"));
//! let body = Arc::new(TextDocument::with_text("body", "Revenue grew."));
//! let shared = SharedToolbar::new(
//!     vec![DocumentHandle::new(title.clone()), DocumentHandle::new(body.clone())],
//!     FormatToolbar::default(),
//! )?;
//!
//! // The user selects a word in the body: the toolbar follows.
//! body.set_selection(Some(Range::new(0, 7)), Source::User);
//! assert_eq!(shared.active_document().name(), "body");
//!
//! // Toolbar actions apply to the body.
//! assert!(shared.toggle_format(Format::Bold));
//! assert!(body.format(Range::new(0, 7)).bold);
//! assert!(shared.with_toolbar(|toolbar| toolbar.is_active(Format::Bold)));
//! # Ok::<(), shared_toolbar::Error>(())
//! ```
//!
//! # Configuration
//!
//! [`SharedToolbarConfig`] is read from TOML and selects the toolbar controls
//! and the [`ActivationPolicy`].

mod config;
mod document;
mod error;
mod rebinder;
mod shared;
mod text_document;
mod toolbar;
mod tracker;

pub use config::{ActivationPolicy, SharedToolbarConfig, ToolbarConfig};
pub use document::{
    CharFormat, Document, DocumentHandle, EditorChange, Format, Range, SelectionChange, Source,
    TextDelta,
};
pub use error::{ConfigurationError, Error, Result};
pub use rebinder::{ChangeHandler, ToolbarRebinder};
pub use shared::SharedToolbar;
pub use text_document::TextDocument;
pub use toolbar::{FormatToolbar, Toolbar, ToolbarControl};
pub use tracker::ActiveDocumentTracker;

pub use shared_toolbar_core::logging;
pub use shared_toolbar_core::{ConnectionId, Signal, SignalError, Slot};
