//! Error types for the Alembic Xform writer.

use thiserror::Error;

/// Failures reported by a property store.
///
/// Stores are append-only, so none of these are retried: once a write
/// fails the owning schema must be considered unreliable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A property with this name already exists in the compound
    #[error("Property already exists: {0}")]
    DuplicateProperty(String),

    /// Property handle or name does not resolve
    #[error("Property not found: {0}")]
    PropertyNotFound(String),

    /// Sample written through the wrong kind of property
    #[error("Type mismatch on {name}: expected {expected}, got {actual}")]
    TypeMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    /// Sample byte length does not match the declared data type
    #[error("Sample size mismatch on {name}: expected {expected} bytes, got {actual}")]
    SampleSize {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// Repeat requested on a property that has no samples yet
    #[error("No previous sample to repeat on {0}")]
    NoPreviousSample(String),

    /// Child operations requested on a non-compound property
    #[error("Property is not a compound: {0}")]
    NotCompound(String),

    /// Property references a time sampling the archive does not know
    #[error("Unknown time sampling index {index} on {name} (count: {count})")]
    UnknownTimeSampling { name: String, index: u32, count: usize },
}

/// Main error type for Alembic write operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A later sample's shape differs from the frozen prototype
    #[error("Invalid sample topology: expected {expected}, got {actual}")]
    TopologyMismatch { expected: String, actual: String },

    /// Operation requires state that has not been established yet
    #[error("Uninitialized schema state: {0}")]
    Uninitialized(String),

    /// Wrapped property store failure
    #[error("Property store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration value rejected at construction
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a topology mismatch error.
    pub fn topology(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::TopologyMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an uninitialized-state error.
    pub fn uninitialized(msg: impl Into<String>) -> Self {
        Self::Uninitialized(msg.into())
    }

    /// True for failures that originate in the property store.
    pub fn is_store_error(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

/// Result type alias for Alembic operations.
pub type Result<T> = std::result::Result<T, Error>;
