//! The replicated engine contract.
//!
//! The translation layer never touches engine state directly; it consumes the
//! engine through three traits:
//!
//! - [`Document`] - owns root-position creation and atomic delta application
//! - [`Cursor`] - an opaque, steppable position within one document
//! - [`CausalDelta`] - a mergeable unit of pending change
//!
//! The [`memory`] module provides the in-process reference implementation,
//! the way a pluggable storage layer ships an in-memory default.

pub mod errors;
pub mod memory;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::lens::Lens;
use crate::path::Step;

pub use errors::EngineError;

/// The primitive type held by a register leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegKind {
    /// Boolean register.
    Bool,
    /// Unsigned 64-bit integer register.
    U64,
    /// Signed 64-bit integer register.
    I64,
    /// String register.
    Str,
}

/// Classification of a leaf position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafKind {
    /// Structurally present but value-less.
    Null,
    /// Enable-wins boolean flag.
    Flag,
    /// Multi-value register of one primitive type.
    Reg(RegKind),
}

/// Classification of a position by its live container kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Fixed-shape record with named fields.
    Record,
    /// Ordered, integer-indexed sequence.
    Sequence,
    /// String-keyed map.
    Map,
    /// Terminal value container.
    Leaf(LeafKind),
}

impl Kind {
    /// Returns the leaf classification, if this is a leaf position.
    pub fn leaf(&self) -> Option<LeafKind> {
        match self {
            Kind::Leaf(leaf) => Some(*leaf),
            _ => None,
        }
    }
}

impl fmt::Display for RegKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegKind::Bool => write!(f, "bool"),
            RegKind::U64 => write!(f, "u64"),
            RegKind::I64 => write!(f, "i64"),
            RegKind::Str => write!(f, "str"),
        }
    }
}

impl fmt::Display for LeafKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeafKind::Null => write!(f, "null"),
            LeafKind::Flag => write!(f, "flag"),
            LeafKind::Reg(reg) => write!(f, "Reg<{reg}>"),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Record => write!(f, "record"),
            Kind::Sequence => write!(f, "sequence"),
            Kind::Map => write!(f, "map"),
            Kind::Leaf(leaf) => write!(f, "{leaf}"),
        }
    }
}

/// A mergeable description of a pending state change.
///
/// `join` is required to be associative and commutative: the order in which
/// the elementary deltas of one logical write are folded must not change the
/// result of applying the fold.
pub trait CausalDelta: Sized {
    /// Merges two deltas into one.
    #[must_use]
    fn join(self, other: Self) -> Self;
}

/// An opaque, steppable position within one document.
///
/// Cursors are cheap to clone and are not concurrency-safe: an operation that
/// steps a position must first obtain its own clone. The typed steps mutate
/// the cursor in place and fail with a traversal error when the selector does
/// not match the current kind; [`Cursor::step`] picks the typed step from the
/// live kind, which lets one generic traversal routine serve all container
/// kinds.
pub trait Cursor: Clone {
    /// The delta type produced by this cursor's write operations.
    type Delta: CausalDelta;

    /// Classifies the current position.
    fn kind(&self) -> Kind;

    /// Steps into a named field of a record.
    fn field(&mut self, name: &str) -> crate::Result<()>;

    /// Steps to an index of a sequence.
    fn index(&mut self, index: usize) -> crate::Result<()>;

    /// Steps to a string key of a map.
    fn key(&mut self, key: &str) -> crate::Result<()>;

    /// Lists the visible selectors at the current position: field names of a
    /// record, live keys of a map, `0..len` indices of a sequence. Empty at a
    /// leaf.
    fn keys(&self) -> Vec<Step>;

    /// Whether the flag at this position is enabled.
    fn flag_enabled(&self) -> crate::Result<bool>;

    /// All concurrently-held values of a boolean register, in deterministic
    /// order.
    fn reg_bools(&self) -> crate::Result<Vec<bool>>;

    /// All concurrently-held values of an unsigned integer register.
    fn reg_u64s(&self) -> crate::Result<Vec<u64>>;

    /// All concurrently-held values of a signed integer register.
    fn reg_i64s(&self) -> crate::Result<Vec<i64>>;

    /// All concurrently-held values of a string register.
    fn reg_strs(&self) -> crate::Result<Vec<String>>;

    /// Enables the flag at this position.
    fn flag_enable(&self) -> crate::Result<Self::Delta>;

    /// Disables the flag at this position.
    fn flag_disable(&self) -> crate::Result<Self::Delta>;

    /// Assigns a boolean register.
    fn reg_assign_bool(&self, value: bool) -> crate::Result<Self::Delta>;

    /// Assigns an unsigned integer register.
    fn reg_assign_u64(&self, value: u64) -> crate::Result<Self::Delta>;

    /// Assigns a signed integer register.
    fn reg_assign_i64(&self, value: i64) -> crate::Result<Self::Delta>;

    /// Assigns a string register.
    fn reg_assign_str(&self, value: &str) -> crate::Result<Self::Delta>;

    /// Removes the sequence element this cursor points at.
    fn remove_index(&self) -> crate::Result<Self::Delta>;

    /// Removes the map entry this cursor points at.
    fn remove_key(&self) -> crate::Result<Self::Delta>;

    /// Steps by any selector, choosing the typed step from the current kind.
    ///
    /// Named steps serve record fields and map keys interchangeably; index
    /// steps only serve sequences.
    fn step(&mut self, step: &Step) -> crate::Result<()> {
        match (self.kind(), step) {
            (Kind::Sequence, Step::Index(index)) => self.index(*index),
            (Kind::Record, Step::Field(name) | Step::Key(name)) => self.field(name),
            (Kind::Map, Step::Key(key) | Step::Field(key)) => self.key(key),
            (kind, step) => Err(EngineError::UnsupportedTraversal {
                kind,
                step: step.clone(),
            }
            .into()),
        }
    }
}

/// A replicated document: the sole owner of shared state.
///
/// Implementations must be shareable across threads; `apply_causal` is the
/// only mutation entry point, and each application merges one whole delta
/// atomically.
pub trait Document: Send + Sync {
    /// The delta type accepted by this document.
    type Delta: CausalDelta;
    /// The cursor type navigating this document.
    type Cursor: Cursor<Delta = Self::Delta>;

    /// Creates a cursor at the root of the document.
    fn create_cursor(&self) -> Self::Cursor;

    /// Atomically merges a delta into the shared state.
    fn apply_causal(&self, delta: Self::Delta) -> crate::Result<()>;
}

/// Extension trait providing the dynamic-handle factory on any document.
pub trait DocumentExt: Document + Sized {
    /// Returns a handle through which the document reads and writes like an
    /// ordinary nested object.
    fn lens(&self) -> Lens<'_, Self> {
        Lens::new(self)
    }
}

impl<D: Document> DocumentExt for D {}
