//! In-memory reference engine.
//!
//! This module provides an in-process implementation of the [`Document`]
//! contract, suitable for testing, development, or single-process use where
//! replication is handled externally. State lives in a schema-typed tree
//! behind an `RwLock`; every mutation arrives as one whole [`Causal`] delta.

mod cursor;
mod delta;
mod state;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tracing::debug;
use uuid::Uuid;

use crate::engine::Document;
use crate::schema::Schema;
use state::Node;

pub use cursor::MemoryCursor;
pub use delta::{Causal, Dot};

/// State shared between a document and its cursors.
#[derive(Debug)]
pub(crate) struct Shared {
    pub(crate) schema: Schema,
    pub(crate) replica: Uuid,
    pub(crate) counter: AtomicU64,
    pub(crate) state: RwLock<Node>,
}

impl Shared {
    pub(crate) fn next_dot(&self) -> Dot {
        Dot::new(self.replica, self.counter.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

/// An in-memory replicated document.
///
/// Constructed once from a binary schema descriptor (or directly from a
/// [`Schema`]) and then shared by reference; there is no process-wide
/// singleton.
///
/// # Examples
///
/// ```
/// use doclens::engine::DocumentExt;
/// use doclens::engine::memory::InMemory;
/// use doclens::{Schema, path};
///
/// let schema = Schema::record([("title", Schema::str_reg())]);
/// let doc = InMemory::new(&schema.to_descriptor().unwrap()).unwrap();
///
/// let lens = doc.lens();
/// lens.set(path!("title"), "Groceries").unwrap();
/// assert_eq!(lens.get_text(path!("title")).unwrap().as_deref(), Some("Groceries"));
/// ```
#[derive(Debug, Clone)]
pub struct InMemory {
    shared: Arc<Shared>,
}

impl InMemory {
    /// Creates a document from an opaque binary schema descriptor.
    pub fn new(descriptor: &[u8]) -> crate::Result<Self> {
        Ok(Self::with_schema(Schema::from_descriptor(descriptor)?))
    }

    /// Creates a document directly from a schema, with a random replica id.
    pub fn with_schema(schema: Schema) -> Self {
        Self::with_replica(schema, Uuid::new_v4())
    }

    /// Creates a document with a pinned replica id, for deterministic setups.
    pub fn with_replica(schema: Schema, replica: Uuid) -> Self {
        let state = Node::materialize(&schema);
        Self {
            shared: Arc::new(Shared {
                schema,
                replica,
                counter: AtomicU64::new(0),
                state: RwLock::new(state),
            }),
        }
    }

    /// The shape this document was created with.
    pub fn schema(&self) -> &Schema {
        &self.shared.schema
    }

    /// This document's replica id.
    pub fn replica(&self) -> Uuid {
        self.shared.replica
    }
}

impl Document for InMemory {
    type Delta = Causal;
    type Cursor = MemoryCursor;

    fn create_cursor(&self) -> MemoryCursor {
        MemoryCursor::root(self.shared.clone())
    }

    fn apply_causal(&self, delta: Causal) -> crate::Result<()> {
        debug!(
            writes = delta.writes.len(),
            removed = delta.removed.len(),
            expired = delta.expired.len(),
            "applying causal delta"
        );
        let mut state = self.shared.state.write().unwrap();
        state.apply(&self.shared.schema, &delta);
        Ok(())
    }
}
