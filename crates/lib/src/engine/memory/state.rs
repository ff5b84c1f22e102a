//! The schema-typed state tree and delta application.
//!
//! State mirrors the document shape: records carry every declared field from
//! the start, sequences and maps grow as writes materialize elements, and
//! leaves hold dot-tagged payloads: a dot set for flags, a dot-to-value map
//! for registers.
//!
//! Application is two-phase so that the contents of one delta never depend on
//! the order its elementary parts were produced in: retired dots are purged
//! everywhere first, then structural removals run (descending within each
//! sequence), then writes land in locus order, materializing intermediate
//! nodes from the schema as needed.

use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;

use super::delta::{Atom, Causal, Dot, Op};
use crate::path::{Path, Step};
use crate::schema::Schema;

/// One node of the live state tree.
#[derive(Debug, Clone)]
pub(crate) enum Node {
    Record(IndexMap<String, Node>),
    Sequence(Vec<Node>),
    Map(BTreeMap<String, Node>),
    Flag(BTreeSet<Dot>),
    Reg(BTreeMap<Dot, Atom>),
    Null,
}

impl Node {
    /// Builds the initial state for a shape. Records materialize all fields;
    /// sequences and maps start empty.
    pub(crate) fn materialize(schema: &Schema) -> Node {
        match schema {
            Schema::Null => Node::Null,
            Schema::Flag => Node::Flag(BTreeSet::new()),
            Schema::Reg(_) => Node::Reg(BTreeMap::new()),
            Schema::Record(fields) => Node::Record(
                fields
                    .iter()
                    .map(|(name, shape)| (name.clone(), Node::materialize(shape)))
                    .collect(),
            ),
            Schema::Sequence(_) => Node::Sequence(Vec::new()),
            Schema::Map(_) => Node::Map(BTreeMap::new()),
        }
    }

    fn child(&self, step: &Step) -> Option<&Node> {
        match (self, step) {
            (Node::Record(fields), Step::Field(name) | Step::Key(name)) => fields.get(name),
            (Node::Sequence(items), Step::Index(index)) => items.get(*index),
            (Node::Map(entries), Step::Key(key) | Step::Field(key)) => entries.get(key),
            _ => None,
        }
    }

    /// Walks a path down the live tree. `None` when the path crosses an
    /// element that has not been materialized.
    pub(crate) fn descend(&self, path: &Path) -> Option<&Node> {
        let mut node = self;
        for step in path.steps() {
            node = node.child(step)?;
        }
        Some(node)
    }

    fn descend_mut(&mut self, steps: &[Step]) -> Option<&mut Node> {
        let mut node = self;
        for step in steps {
            node = match (node, step) {
                (Node::Record(fields), Step::Field(name) | Step::Key(name)) => {
                    fields.get_mut(name)?
                }
                (Node::Sequence(items), Step::Index(index)) => items.get_mut(*index)?,
                (Node::Map(entries), Step::Key(key) | Step::Field(key)) => entries.get_mut(key)?,
                _ => return None,
            };
        }
        Some(node)
    }

    /// Walks a path, materializing missing elements from the schema so a
    /// write always has a node to land on.
    fn ensure(&mut self, schema: &Schema, path: &Path) -> Option<&mut Node> {
        let mut node = self;
        let mut shape = schema;
        for step in path.steps() {
            shape = shape.child(step)?;
            node = match (node, step) {
                (Node::Record(fields), Step::Field(name) | Step::Key(name)) => {
                    fields.get_mut(name)?
                }
                (Node::Sequence(items), Step::Index(index)) => {
                    while items.len() <= *index {
                        items.push(Node::materialize(shape));
                    }
                    &mut items[*index]
                }
                (Node::Map(entries), Step::Key(key) | Step::Field(key)) => entries
                    .entry(key.clone())
                    .or_insert_with(|| Node::materialize(shape)),
                _ => return None,
            };
        }
        Some(node)
    }

    /// Drops every occurrence of the given dots from flag and register
    /// stores, recursively.
    fn purge(&mut self, expired: &BTreeSet<Dot>) {
        match self {
            Node::Flag(dots) => dots.retain(|dot| !expired.contains(dot)),
            Node::Reg(values) => values.retain(|dot, _| !expired.contains(dot)),
            Node::Record(fields) => fields.values_mut().for_each(|n| n.purge(expired)),
            Node::Sequence(items) => items.iter_mut().for_each(|n| n.purge(expired)),
            Node::Map(entries) => entries.values_mut().for_each(|n| n.purge(expired)),
            Node::Null => {}
        }
    }

    /// Collects every dot held below this node, for subtree retirement.
    pub(crate) fn collect_dots(&self, into: &mut BTreeSet<Dot>) {
        match self {
            Node::Flag(dots) => into.extend(dots.iter().copied()),
            Node::Reg(values) => into.extend(values.keys().copied()),
            Node::Record(fields) => fields.values().for_each(|n| n.collect_dots(into)),
            Node::Sequence(items) => items.iter().for_each(|n| n.collect_dots(into)),
            Node::Map(entries) => entries.values().for_each(|n| n.collect_dots(into)),
            Node::Null => {}
        }
    }

    fn remove_at(&mut self, path: &Path) {
        let Some((last, parents)) = path.as_slice().split_last() else {
            return;
        };
        let Some(parent) = self.descend_mut(parents) else {
            return;
        };
        match (parent, last) {
            (Node::Sequence(items), Step::Index(index)) => {
                if *index < items.len() {
                    items.remove(*index);
                }
            }
            (Node::Map(entries), Step::Key(key) | Step::Field(key)) => {
                entries.remove(key);
            }
            _ => {}
        }
    }

    /// Merges one whole delta into the tree.
    pub(crate) fn apply(&mut self, schema: &Schema, delta: &Causal) {
        self.purge(&delta.expired);

        // Reverse locus order removes higher sequence indices first, so the
        // indices captured at delta-build time stay valid.
        for path in delta.removed.iter().rev() {
            self.remove_at(path);
        }

        for (path, dot, op) in &delta.writes {
            let Some(node) = self.ensure(schema, path) else {
                continue;
            };
            match (node, op) {
                (Node::Flag(dots), Op::Enable) => {
                    dots.insert(*dot);
                }
                (Node::Reg(values), Op::Assign(atom)) => {
                    values.insert(*dot, atom.clone());
                }
                _ => {}
            }
        }
    }
}
