//! Document shapes and their binary descriptor encoding.
//!
//! A [`Schema`] fixes the shape of a replicated document up front: which
//! positions are fixed-shape records, ordered sequences, or keyed maps, and
//! which leaf containers (an enable-wins flag or a typed register) sit at
//! the bottom. Engines are constructed from an opaque binary descriptor; this
//! module owns that descriptor's versioned encoding.

pub mod errors;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::engine::{Kind, LeafKind, RegKind};
use crate::path::Step;

pub use errors::SchemaError;

/// Current binary descriptor format version.
pub const DESCRIPTOR_VERSION: u8 = 0;

/// The shape of one position in a document.
///
/// Containers nest arbitrarily; leaves terminate a branch. `Null` marks a
/// position that exists structurally but holds no readable or writable value.
///
/// # Examples
///
/// ```
/// use doclens::Schema;
///
/// let todoapp = Schema::record([
///     ("title", Schema::str_reg()),
///     ("tasks", Schema::sequence(Schema::record([
///         ("title", Schema::str_reg()),
///         ("complete", Schema::flag()),
///     ]))),
/// ]);
///
/// let descriptor = todoapp.to_descriptor().unwrap();
/// assert_eq!(Schema::from_descriptor(&descriptor).unwrap(), todoapp);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Schema {
    /// Structurally present, value-less position.
    Null,
    /// Replicated boolean with enable-wins semantics.
    Flag,
    /// Replicated register holding values of one primitive type.
    Reg(RegKind),
    /// Fixed-shape record with named fields in declaration order.
    Record(IndexMap<String, Schema>),
    /// Ordered sequence of uniformly-shaped elements.
    Sequence(Box<Schema>),
    /// Keyed map with string keys and uniformly-shaped values.
    Map(Box<Schema>),
}

impl Schema {
    /// Builds a record schema from named fields, preserving order.
    pub fn record<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Schema)>,
        K: Into<String>,
    {
        Schema::Record(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Builds a sequence schema over the given element shape.
    pub fn sequence(element: Schema) -> Self {
        Schema::Sequence(Box::new(element))
    }

    /// Builds a map schema over the given value shape.
    pub fn map(value: Schema) -> Self {
        Schema::Map(Box::new(value))
    }

    /// A flag leaf.
    pub fn flag() -> Self {
        Schema::Flag
    }

    /// A boolean register leaf.
    pub fn bool_reg() -> Self {
        Schema::Reg(RegKind::Bool)
    }

    /// An unsigned integer register leaf.
    pub fn u64_reg() -> Self {
        Schema::Reg(RegKind::U64)
    }

    /// A signed integer register leaf.
    pub fn i64_reg() -> Self {
        Schema::Reg(RegKind::I64)
    }

    /// A string register leaf.
    pub fn str_reg() -> Self {
        Schema::Reg(RegKind::Str)
    }

    /// Classifies this shape as a position kind.
    pub fn kind(&self) -> Kind {
        match self {
            Schema::Null => Kind::Leaf(LeafKind::Null),
            Schema::Flag => Kind::Leaf(LeafKind::Flag),
            Schema::Reg(reg) => Kind::Leaf(LeafKind::Reg(*reg)),
            Schema::Record(_) => Kind::Record,
            Schema::Sequence(_) => Kind::Sequence,
            Schema::Map(_) => Kind::Map,
        }
    }

    /// Returns the child shape one step below this one, if any.
    ///
    /// Record fields resolve by name; every sequence index shares the element
    /// shape and every map key shares the value shape.
    pub fn child(&self, step: &Step) -> Option<&Schema> {
        match (self, step) {
            (Schema::Record(fields), Step::Field(name) | Step::Key(name)) => fields.get(name),
            (Schema::Sequence(element), Step::Index(_)) => Some(element),
            (Schema::Map(value), Step::Key(_) | Step::Field(_)) => Some(value),
            _ => None,
        }
    }

    /// Walks a whole path of steps down the shape tree.
    pub fn descend<'a>(&self, steps: impl IntoIterator<Item = &'a Step>) -> Option<&Schema> {
        let mut node = self;
        for step in steps {
            node = node.child(step)?;
        }
        Some(node)
    }

    /// Encodes this shape as a versioned binary descriptor.
    pub fn to_descriptor(&self) -> crate::Result<Vec<u8>> {
        let envelope = Envelope {
            version: DESCRIPTOR_VERSION,
            root: self.clone(),
        };
        postcard::to_stdvec(&envelope).map_err(|e| {
            SchemaError::InvalidDescriptor {
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Decodes a binary descriptor produced by [`Schema::to_descriptor`].
    pub fn from_descriptor(bytes: &[u8]) -> crate::Result<Self> {
        let envelope: Envelope = postcard::from_bytes(bytes).map_err(|e| {
            crate::Error::from(SchemaError::InvalidDescriptor {
                reason: e.to_string(),
            })
        })?;
        if envelope.version != DESCRIPTOR_VERSION {
            return Err(SchemaError::UnsupportedVersion {
                version: envelope.version,
            }
            .into());
        }
        Ok(envelope.root)
    }
}

/// Wire envelope: the version byte is checked before the shape is trusted.
#[derive(Serialize, Deserialize)]
struct Envelope {
    version: u8,
    root: Schema,
}
