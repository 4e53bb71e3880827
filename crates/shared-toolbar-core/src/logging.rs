//! Logging facilities for shared toolbars.
//!
//! The workspace uses the `tracing` crate for instrumentation. Libraries never
//! install a subscriber; to see logs, install one in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("shared_toolbar=debug")
//!         .init();
//! }
//! ```
//!
//! Activation decisions are logged at `debug`, ignored selection signals and
//! signal traffic at `trace`, and inconsistencies at `warn`.

/// Span names used throughout the workspace for tracing.
pub mod span_names {
    /// Rebind span.
    pub const REBIND: &str = "shared_toolbar::rebind";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "shared_toolbar_core::signal";
    /// Active document tracking target.
    pub const TRACKER: &str = "shared_toolbar::tracker";
    /// Toolbar rebinding target.
    pub const REBINDER: &str = "shared_toolbar::rebinder";
    /// Document model target.
    pub const DOCUMENT: &str = "shared_toolbar::document";
    /// Configuration loading target.
    pub const CONFIG: &str = "shared_toolbar::config";
}
