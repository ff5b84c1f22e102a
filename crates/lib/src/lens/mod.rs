//! The translation layer: nested-object access over cursor navigation.
//!
//! A [`Lens`] is a stateless, transient handle bound to a document and an
//! optional starting position. Every read or write clones that position (or
//! takes a fresh root cursor), steps it along a path, and either decodes the
//! leaf it lands on or recurses into the container. All elementary deltas
//! produced by one top-level [`set`](Lens::set) are folded into exactly one
//! atomic unit before anything is applied.

mod codec;
pub mod errors;
mod merge;

use tracing::debug;

use crate::engine::{Cursor, Document, Kind};
use crate::path::{Path, Step};
use crate::value::Value;

pub use errors::LensError;
pub use merge::Merger;

/// A dynamic handle over a document position.
///
/// Handles own no navigation state of their own: each operation works on an
/// exclusive clone of the bound position, so handles can be freely shared and
/// nested reads never interfere.
///
/// # Examples
///
/// ```
/// use doclens::engine::DocumentExt;
/// use doclens::engine::memory::InMemory;
/// use doclens::{Schema, View, path};
/// use serde_json::json;
///
/// let schema = Schema::record([
///     ("title", Schema::str_reg()),
///     ("tasks", Schema::sequence(Schema::record([
///         ("title", Schema::str_reg()),
///         ("complete", Schema::flag()),
///     ]))),
/// ]);
/// let doc = InMemory::with_schema(schema);
/// let lens = doc.lens();
///
/// lens.set(path!("title"), "Groceries")?;
/// lens.set_json(path!("tasks"), json!([{"title": "Buy milk", "complete": false}]))?;
///
/// assert_eq!(lens.get_text(path!("tasks", 0, "title"))?.as_deref(), Some("Buy milk"));
/// assert_eq!(lens.get_bool(path!("tasks", 0, "complete"))?, Some(false));
///
/// // Containers read as fresh handles
/// let View::Nested(tasks) = lens.get(path!("tasks"))? else { panic!() };
/// assert_eq!(tasks.keys().len(), 1);
/// # Ok::<(), doclens::Error>(())
/// ```
pub struct Lens<'a, D: Document> {
    doc: &'a D,
    cursor: Option<D::Cursor>,
}

/// The result of reading a position through a [`Lens`].
pub enum View<'a, D: Document> {
    /// The position holds no value: a null leaf or an empty register.
    Absent,
    /// A decoded leaf value.
    Value(Value),
    /// A container; the handle is bound to a clone of the read position.
    Nested(Lens<'a, D>),
}

impl<'a, D: Document> Clone for Lens<'a, D> {
    fn clone(&self) -> Self {
        Self {
            doc: self.doc,
            cursor: self.cursor.clone(),
        }
    }
}

impl<'a, D: Document> std::fmt::Debug for Lens<'a, D>
where
    D::Cursor: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lens")
            .field("cursor", &self.cursor)
            .finish()
    }
}

impl<'a, D: Document> std::fmt::Debug for View<'a, D>
where
    D::Cursor: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            View::Absent => write!(f, "Absent"),
            View::Value(value) => f.debug_tuple("Value").field(value).finish(),
            View::Nested(lens) => f.debug_tuple("Nested").field(lens).finish(),
        }
    }
}

impl<'a, D: Document> Lens<'a, D> {
    /// Creates a handle at the root of a document.
    pub fn new(doc: &'a D) -> Self {
        Self { doc, cursor: None }
    }

    /// An exclusive working position: a clone of the bound cursor, or a fresh
    /// root cursor.
    fn position(&self) -> D::Cursor {
        match &self.cursor {
            Some(cursor) => cursor.clone(),
            None => self.doc.create_cursor(),
        }
    }

    fn walk(&self, path: &Path) -> crate::Result<D::Cursor> {
        let mut cursor = self.position();
        for step in path.steps() {
            cursor.step(step)?;
        }
        Ok(cursor)
    }

    /// Reads the position at `path`, relative to this handle.
    ///
    /// Leaves decode to values ([`View::Value`], or [`View::Absent`] when the
    /// leaf holds nothing); containers come back as fresh nested handles.
    pub fn get(&self, path: impl AsRef<Path>) -> crate::Result<View<'a, D>> {
        let cursor = self.walk(path.as_ref())?;
        match cursor.kind() {
            Kind::Leaf(_) => Ok(match codec::decode(&cursor)? {
                Some(value) => View::Value(value),
                None => View::Absent,
            }),
            _ => Ok(View::Nested(Lens {
                doc: self.doc,
                cursor: Some(cursor),
            })),
        }
    }

    /// Reads a leaf value, `None` when absent or when the path lands on a
    /// container.
    pub fn get_value(&self, path: impl AsRef<Path>) -> crate::Result<Option<Value>> {
        match self.get(path)? {
            View::Value(value) => Ok(Some(value)),
            _ => Ok(None),
        }
    }

    /// Reads a boolean leaf.
    pub fn get_bool(&self, path: impl AsRef<Path>) -> crate::Result<Option<bool>> {
        Ok(self.get_value(path)?.and_then(|v| v.as_bool()))
    }

    /// Reads an unsigned integer leaf.
    pub fn get_u64(&self, path: impl AsRef<Path>) -> crate::Result<Option<u64>> {
        Ok(self.get_value(path)?.and_then(|v| v.as_u64()))
    }

    /// Reads a signed integer leaf.
    pub fn get_i64(&self, path: impl AsRef<Path>) -> crate::Result<Option<i64>> {
        Ok(self.get_value(path)?.and_then(|v| v.as_i64()))
    }

    /// Reads a text leaf.
    pub fn get_text(&self, path: impl AsRef<Path>) -> crate::Result<Option<String>> {
        Ok(self
            .get_value(path)?
            .and_then(|v| v.as_text().map(str::to_string)))
    }

    /// Reads every concurrently-held value at a leaf, in deterministic order.
    ///
    /// [`get`](Lens::get) projects the same leaf onto the first of these.
    pub fn get_all(&self, path: impl AsRef<Path>) -> crate::Result<Vec<Value>> {
        let cursor = self.walk(path.as_ref())?;
        codec::decode_all(&cursor)
    }

    /// Lists the visible selectors at this handle's own position.
    pub fn keys(&self) -> Vec<Step> {
        self.position().keys()
    }

    /// Snapshots the subtree below this handle as JSON; absent leaves render
    /// as `null`.
    pub fn to_json(&self) -> crate::Result<serde_json::Value> {
        json_at(&self.position())
    }

    /// Writes `value` at `path`, relative to this handle.
    ///
    /// The shape of the value decides the write strategy:
    ///
    /// - **list**: replaces the target sequence: every existing index is
    ///   removed, then every new element is inserted in order;
    /// - **map**: replaces a keyed map (remove all keys, insert all
    ///   entries), or writes record fields without touching siblings,
    ///   depending on the target kind;
    /// - **scalar**: encoded into the target leaf.
    ///
    /// However deep the value nests, all elementary deltas are joined and
    /// applied as one atomic unit. Returns `Ok(false)`, a no-op with nothing
    /// applied, when the write produced no delta at all, such as replacing
    /// an empty sequence with an empty list. Any error aborts the call before
    /// anything is applied.
    pub fn set(&self, path: impl AsRef<Path>, value: impl Into<Value>) -> crate::Result<bool> {
        let path = path.as_ref();
        let value = value.into();
        let cursor = self.walk(path)?;

        let mut merger = Merger::new();
        write_at(&cursor, &value, &mut merger)?;

        debug!(%path, folded = merger.folded(), "write folded into one delta");
        match merger.finish() {
            Some(delta) => {
                self.doc.apply_causal(delta)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Writes a JSON value at `path`; see [`set`](Lens::set).
    pub fn set_json(
        &self,
        path: impl AsRef<Path>,
        value: serde_json::Value,
    ) -> crate::Result<bool> {
        self.set(path, Value::try_from(value)?)
    }
}

impl<'a, D: Document> View<'a, D> {
    /// Returns true if the position held no value.
    pub fn is_absent(&self) -> bool {
        matches!(self, View::Absent)
    }

    /// The decoded leaf value, if any.
    pub fn value(self) -> Option<Value> {
        match self {
            View::Value(value) => Some(value),
            _ => None,
        }
    }

    /// The nested handle, if the position was a container.
    pub fn nested(self) -> Option<Lens<'a, D>> {
        match self {
            View::Nested(lens) => Some(lens),
            _ => None,
        }
    }
}

/// Recursive write dispatch: unwinds arbitrarily nested values into a flat
/// set of elementary deltas, folded into `merger`. Nothing is applied here.
fn write_at<C: Cursor>(
    cursor: &C,
    value: &Value,
    merger: &mut Merger<C::Delta>,
) -> crate::Result<()> {
    match value {
        Value::List(items) => {
            // Replace the whole sequence: removals first, then inserts.
            for step in cursor.keys() {
                let mut here = cursor.clone();
                here.step(&step)?;
                merger.push(here.remove_index()?);
            }
            for (index, item) in items.iter().enumerate() {
                let mut here = cursor.clone();
                here.step(&Step::Index(index))?;
                write_at(&here, item, merger)?;
            }
        }
        Value::Map(entries) => {
            // A keyed map is replaced wholesale; a record keeps its shape and
            // only the named fields are written.
            if cursor.kind() == Kind::Map {
                for step in cursor.keys() {
                    let mut here = cursor.clone();
                    here.step(&step)?;
                    merger.push(here.remove_key()?);
                }
            }
            for (name, item) in entries {
                let mut here = cursor.clone();
                here.step(&Step::Field(name.clone()))?;
                write_at(&here, item, merger)?;
            }
        }
        scalar => merger.push(codec::encode(cursor, scalar)?),
    }
    Ok(())
}

fn json_at<C: Cursor>(cursor: &C) -> crate::Result<serde_json::Value> {
    match cursor.kind() {
        Kind::Leaf(_) => Ok(match codec::decode(cursor)? {
            Some(value) => value.into(),
            None => serde_json::Value::Null,
        }),
        Kind::Sequence => {
            let mut items = Vec::new();
            for step in cursor.keys() {
                let mut here = cursor.clone();
                here.step(&step)?;
                items.push(json_at(&here)?);
            }
            Ok(serde_json::Value::Array(items))
        }
        Kind::Record | Kind::Map => {
            let mut entries = serde_json::Map::new();
            for step in cursor.keys() {
                let name = step.name().unwrap_or_default().to_string();
                let mut here = cursor.clone();
                here.step(&step)?;
                entries.insert(name, json_at(&here)?);
            }
            Ok(serde_json::Value::Object(entries))
        }
    }
}
