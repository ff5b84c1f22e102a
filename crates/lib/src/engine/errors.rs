//! Error types for engine traversal and leaf access.

use thiserror::Error;

use crate::engine::Kind;
use crate::path::Step;

/// Structured error types for cursor and document operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EngineError {
    /// The selector kind does not match the current position kind.
    #[error("unsupported traversal: cannot step by {step} at a {kind} position")]
    UnsupportedTraversal { kind: Kind, step: Step },

    /// A record was stepped by a field name its shape does not declare.
    #[error("unknown record field '{field}'")]
    UnknownField { field: String },

    /// A typed leaf operation was invoked against the wrong leaf kind.
    #[error("kind mismatch: expected {expected}, found {actual}")]
    KindMismatch {
        expected: &'static str,
        actual: Kind,
    },
}

impl EngineError {
    /// Check if this error is related to traversal.
    pub fn is_traversal(&self) -> bool {
        matches!(
            self,
            EngineError::UnsupportedTraversal { .. } | EngineError::UnknownField { .. }
        )
    }

    /// Check if this error is a leaf kind mismatch.
    pub fn is_kind_mismatch(&self) -> bool {
        matches!(self, EngineError::KindMismatch { .. })
    }
}

impl From<EngineError> for crate::Error {
    fn from(err: EngineError) -> Self {
        crate::Error::Engine(err)
    }
}
