//!
//! Doclens: read and write a schema-typed, replicated document through
//! ordinary nested-object syntax, while every mutation is committed as one
//! mergeable delta to a conflict-free document engine.
//!
//! ## Core Concepts
//!
//! * **Documents (`engine::Document`)**: the engine boundary. A document owns
//!   the shared replicated state, hands out root cursors, and atomically
//!   merges causal deltas. The in-process reference engine is
//!   `engine::memory::InMemory`, constructed from a binary schema descriptor.
//! * **Cursors (`engine::Cursor`)**: opaque, steppable positions classified
//!   by their live container kind: record, sequence, map, or leaf.
//! * **Paths (`path::PathBuf`)**: explicit step expressions (field, index,
//!   key) built with the [`path!`] macro, replacing dynamic property
//!   interception.
//! * **Lenses (`lens::Lens`)**: transient handles translating `get`/`set`
//!   calls on paths into cursor navigation, leaf codec calls, and one joined
//!   delta per write.
//! * **Values (`value::Value`)**: the native value union, scalars for
//!   leaves plus lists and maps for whole-container writes, bridged to JSON for
//!   literal-style updates.
//!
//! ```
//! use doclens::engine::DocumentExt;
//! use doclens::engine::memory::InMemory;
//! use doclens::{Schema, path};
//! use serde_json::json;
//!
//! let schema = Schema::record([
//!     ("title", Schema::str_reg()),
//!     ("tasks", Schema::sequence(Schema::record([
//!         ("title", Schema::str_reg()),
//!         ("complete", Schema::flag()),
//!     ]))),
//! ]);
//!
//! let doc = InMemory::new(&schema.to_descriptor()?)?;
//! let lens = doc.lens();
//! lens.set(path!("title"), "Groceries")?;
//! lens.set_json(path!("tasks"), json!([{"title": "Buy milk", "complete": false}]))?;
//! assert_eq!(lens.get_bool(path!("tasks", 0, "complete"))?, Some(false));
//! # Ok::<(), doclens::Error>(())
//! ```

pub mod engine;
pub mod lens;
pub mod path;
pub mod schema;
pub mod value;

pub use engine::{CausalDelta, Cursor, Document, DocumentExt, Kind, LeafKind, RegKind};
pub use lens::{Lens, View};
pub use path::{Path, PathBuf, Step};
pub use schema::Schema;
pub use value::Value;

/// Result type used throughout the doclens library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the doclens library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structured engine errors: traversal and leaf-access failures
    #[error(transparent)]
    Engine(engine::EngineError),

    /// Structured schema and descriptor errors
    #[error(transparent)]
    Schema(schema::SchemaError),

    /// Structured translation-layer errors from the lens module
    #[error(transparent)]
    Lens(lens::LensError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Engine(_) => "engine",
            Error::Schema(_) => "schema",
            Error::Lens(_) => "lens",
        }
    }

    /// Check if this error indicates a selector/position kind disagreement.
    pub fn is_traversal_error(&self) -> bool {
        match self {
            Error::Engine(engine_err) => engine_err.is_traversal(),
            _ => false,
        }
    }

    /// Check if this error indicates a value or leaf type mismatch.
    pub fn is_type_error(&self) -> bool {
        match self {
            Error::Engine(engine_err) => engine_err.is_kind_mismatch(),
            Error::Lens(lens_err) => lens_err.is_type_error(),
            _ => false,
        }
    }

    /// Check if this error is schema/descriptor-related.
    pub fn is_schema_error(&self) -> bool {
        matches!(self, Error::Schema(_))
    }
}
