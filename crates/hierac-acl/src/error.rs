//! Error types for hierac-acl
//!
//! Resolution failures are mostly graph failures, so the core taxonomy is
//! wrapped as-is. The two additions are specific to resources: a resource
//! name that matches both an employee and an account, and a lookup that a
//! precomputed [`ResourceIndex`](crate::index::ResourceIndex) cannot answer.

use thiserror::Error;

/// Result type alias for hierac-acl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving access
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A graph, configuration, or argument error.
    #[error(transparent)]
    Core(#[from] hierac_core::Error),

    /// A resource name matches both an employee and an account.
    #[error("Ambiguous resource name: {name} is both an Employee and an Account")]
    AmbiguousResource {
        /// The ambiguous name
        name: String,
    },

    /// A resource is absent from a precomputed index.
    #[error("Resource not indexed: {name}")]
    IndexMiss {
        /// The resource that was looked up
        name: String,
    },
}

impl Error {
    /// Creates a `NotFound` error for an entity kind and name.
    pub fn not_found(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Error::Core(hierac_core::Error::not_found(kind, name))
    }

    /// Creates an `AmbiguousResource` error.
    pub fn ambiguous_resource(name: impl Into<String>) -> Self {
        Error::AmbiguousResource { name: name.into() }
    }

    /// Creates an `IndexMiss` error.
    pub fn index_miss(name: impl Into<String>) -> Self {
        Error::IndexMiss { name: name.into() }
    }

    /// Returns `true` if this is a `NotFound` error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Core(e) if e.is_not_found())
    }

    /// Returns whether a caller may reasonably recover from this error.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Core(e) => e.is_recoverable(),
            Error::AmbiguousResource { .. } => false,
            Error::IndexMiss { .. } => true,
        }
    }
}

// ============================================================================
// Boundary folding
// ============================================================================

/// Folds `NotFound` into an empty answer at an operation boundary.
///
/// An unknown administrator, company, or resource can see nothing and is
/// seen by nobody. Every other error passes through untouched.
pub trait OrEmpty<T> {
    /// Replace a `NotFound` error with the empty value.
    fn or_empty(self) -> Result<T>;
}

impl<T> OrEmpty<Vec<T>> for Result<Vec<T>> {
    fn or_empty(self) -> Result<Vec<T>> {
        match self {
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            other => other,
        }
    }
}

impl OrEmpty<bool> for Result<bool> {
    fn or_empty(self) -> Result<bool> {
        match self {
            Err(e) if e.is_not_found() => Ok(false),
            other => other,
        }
    }
}
