//! Error types for cognita-core

use thiserror::Error;

/// Error type for core domain and storage operations
#[derive(Debug, Error)]
pub enum CoreError {
    /// A document, its text, a unit or a state is missing
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of entity that was looked up ("document", "unit", ...)
        entity: &'static str,
        /// Identifier that was looked up
        id: String,
    },

    /// Persistent store failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Caller supplied something the core refuses to handle
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization or deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Build a `NotFound` error for the given entity kind and id
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Whether this error means the requested entity does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for core operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;
