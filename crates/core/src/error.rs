//! Error types for facade queries.
//!
//! Lookups that find no host record report `NotFound`, malformed caller input
//! reports `InvalidInput`, and a raw reference code missing from the
//! classification table reports `UnexpectedReferenceType`. The last one points
//! at a mapping gap in this crate rather than at the caller.

use thiserror::Error;

/// Error type for database facade operations.
#[derive(Debug, Error)]
pub enum DisasmError {
    /// The host engine has no record for the requested entity.
    #[error("{0}")]
    NotFound(String),

    /// A caller-supplied discriminant is structurally wrong.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The host reported a cross-reference code absent from the known mapping.
    #[error("Unexpected reference type: {0}")]
    UnexpectedReferenceType(u8),

    /// Failed to read a snapshot document from disk.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse snapshot YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Snapshot content is well-formed but inconsistent.
    #[error("Invalid snapshot: {0}")]
    Snapshot(String),
}

impl DisasmError {
    pub fn not_found(message: impl Into<String>) -> Self {
        DisasmError::NotFound(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        DisasmError::InvalidInput(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DisasmError::NotFound(_))
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, DisasmError::InvalidInput(_))
    }
}

/// Convenience result type for facade operations.
pub type DisasmResult<T> = Result<T, DisasmError>;
