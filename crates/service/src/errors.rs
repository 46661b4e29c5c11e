use thiserror::Error;

use models::errors::ModelError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid argument: `{param}` must not be empty")]
    InvalidArgument { param: &'static str },
    #[error("operation not supported by this store: {operation}")]
    NotSupported { operation: &'static str },
    #[error("an entity with id `{id}` is already stored")]
    Duplicate { id: String },
    #[error("durability error: {0}")]
    Durability(String),
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

impl StoreError {
    pub fn not_supported(operation: &'static str) -> Self {
        Self::NotSupported { operation }
    }

    pub fn durability(path: &std::path::Path, action: &str, err: impl std::fmt::Display) -> Self {
        Self::Durability(format!("{action} {}: {err}", path.display()))
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            StoreError::InvalidArgument { .. } => 2001,
            StoreError::NotSupported { .. } => 2002,
            StoreError::Duplicate { .. } => 2003,
            StoreError::Durability(_) => 2100,
            StoreError::Model(ModelError::InvalidArgument(_)) => 2001,
            StoreError::Model(ModelError::Codec(_)) => 2200,
        }
    }

    /// Whether the caller must treat this as unrecoverable in the current deployment.
    pub fn is_fatal(&self) -> bool {
        matches!(self, StoreError::NotSupported { .. } | StoreError::Durability(_))
    }
}

/// Reject an empty lookup key before any work is done.
pub(crate) fn require_key(value: &str, param: &'static str) -> Result<(), StoreError> {
    if value.is_empty() {
        return Err(StoreError::InvalidArgument { param });
    }
    Ok(())
}
