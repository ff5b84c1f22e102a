//! Error types for the translation layer.

use thiserror::Error;

use crate::engine::{Kind, LeafKind};

/// Structured error types for lens reads and writes.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LensError {
    /// The value codec was invoked against a position that holds no value:
    /// a container, or a null leaf.
    #[error("not a value type: {kind} position holds no readable or writable value")]
    NotAValueType { kind: Kind },

    /// A scalar could not be encoded into the leaf kind at the target.
    #[error("cannot write {value} value into a {leaf} leaf")]
    ValueMismatch { leaf: LeafKind, value: &'static str },

    /// The input value has no document representation at all.
    #[error("unwritable value: {reason}")]
    UnwritableValue { reason: String },
}

impl LensError {
    /// Check if this error is a value/type mismatch.
    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            LensError::NotAValueType { .. }
                | LensError::ValueMismatch { .. }
                | LensError::UnwritableValue { .. }
        )
    }
}

impl From<LensError> for crate::Error {
    fn from(err: LensError) -> Self {
        crate::Error::Lens(err)
    }
}
