//! Error types for hierac-core
//!
//! Every Hierac crate reports failures through this taxonomy, either
//! directly or wrapped in its own error enum.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for hierac-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in hierac-core
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A named entity does not exist in the graph.
    ///
    /// Recoverable: callers that follow the "empty result" convention fold
    /// this into an empty answer at the operation boundary.
    #[error("{kind} not found: {name}")]
    NotFound {
        /// Kind of entity that was looked up (e.g. "Administrator")
        kind: String,
        /// Name that failed to resolve
        name: String,
    },

    /// A caller passed a malformed argument (e.g. an empty name).
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// What was wrong with the argument
        message: String,
    },

    /// The backing graph store could not serve the request.
    #[error("Graph store unavailable: {message}")]
    StoreUnavailable {
        /// Description of the store failure
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// I/O error with the path that caused it
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Parse error (fixture files, configuration documents)
    #[error("Parse error: {message}")]
    Parse {
        /// What failed to parse
        message: String,
    },
}

impl Error {
    /// Creates a `NotFound` error for an entity kind and name.
    pub fn not_found(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Error::NotFound {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Creates an `InvalidArgument` error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a `StoreUnavailable` error.
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Error::StoreUnavailable {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Wraps an I/O error together with the offending path.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Error::Parse {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a `NotFound` error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Returns whether a caller may reasonably recover from this error.
    ///
    /// Only unknown names are recoverable. Malformed arguments are
    /// programmer errors, and store failures are not retried because a
    /// resolution keeps no partial progress worth preserving.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::NotFound { .. } => true,
            Error::InvalidArgument { .. } => false,
            Error::StoreUnavailable { .. } => false,
            Error::Config { .. } => false,
            Error::Io { .. } => false,
            Error::Parse { .. } => false,
        }
    }
}
