//! Error types for schema and descriptor handling.

use thiserror::Error;

/// Structured error types for schema operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The binary descriptor could not be decoded.
    #[error("invalid schema descriptor: {reason}")]
    InvalidDescriptor { reason: String },

    /// The descriptor's format version is not understood by this build.
    #[error("unsupported schema descriptor version {version}")]
    UnsupportedVersion { version: u8 },
}

impl SchemaError {
    /// Check if this error is a descriptor decoding failure.
    pub fn is_descriptor_error(&self) -> bool {
        matches!(
            self,
            SchemaError::InvalidDescriptor { .. } | SchemaError::UnsupportedVersion { .. }
        )
    }
}

impl From<SchemaError> for crate::Error {
    fn from(err: SchemaError) -> Self {
        crate::Error::Schema(err)
    }
}
