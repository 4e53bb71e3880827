//! Error types for shared toolbars.

use std::path::PathBuf;

/// Result type alias for shared toolbar operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or driving a shared toolbar.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The documents or toolbar settings cannot form a shared toolbar.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigurationError),

    /// Configuration text is not valid TOML for [`SharedToolbarConfig`](crate::SharedToolbarConfig).
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration file could not be read.
    #[error("Failed to read configuration '{path}': {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create an I/O error for a configuration file.
    pub fn config_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigIo {
            path: path.into(),
            source,
        }
    }

    /// Whether this is an [`Error::InvalidConfiguration`].
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, Self::InvalidConfiguration(_))
    }
}

/// Why a configuration was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    /// A shared toolbar was given no documents.
    #[error("a shared toolbar needs at least one document")]
    EmptyDocumentSet,

    /// The same document appears twice in the document set.
    #[error("document at position {second} repeats the document at position {first}")]
    DuplicateDocument { first: usize, second: usize },

    /// A document outside the configured set was asked to become active.
    #[error("document '{name}' is not one of the configured documents")]
    UnknownDocument { name: String },

    /// The toolbar configuration lists no controls.
    #[error("toolbar configuration lists no controls")]
    NoControls,
}
