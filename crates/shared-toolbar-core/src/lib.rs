//! Core systems for shared toolbars.
//!
//! This crate provides the foundational pieces the `shared-toolbar` crate is
//! built on:
//!
//! - **Signal/Slot System**: Type-safe, synchronous observer connections with
//!   explicit connect/disconnect by [`ConnectionId`]
//! - **Logging**: `tracing` targets and span names for filtering
//! - **Errors**: Signal error types
//!
//! # Signal/Slot Example
//!
//! ```
//! use shared_toolbar_core::Signal;
//!
//! // Create a signal that notifies when a value changes
//! let value_changed = Signal::<i32>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! // Emit the signal
//! value_changed.emit(42);
//!
//! // Disconnect when done
//! value_changed.disconnect(conn_id);
//! ```

mod error;
pub mod logging;
pub mod signal;

pub use error::{Result, SignalError};
pub use signal::{ConnectionId, Signal, Slot};
