//! Cursor implementation for the in-memory engine.
//!
//! A cursor is a locus into the document shape plus a handle on the shared
//! state. Steps are validated against the schema as they happen, so a cursor
//! can point at a not-yet-materialized sequence element or map entry: reads
//! there see empty leaves, writes materialize on application.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::trace;

use super::Shared;
use super::delta::{Atom, Causal, Dot, Op};
use super::state::Node;
use crate::engine::{CausalDelta, Cursor, EngineError, Kind, LeafKind, RegKind};
use crate::path::{PathBuf, Step};
use crate::schema::Schema;

/// A steppable position within an [`InMemory`] document.
///
/// [`InMemory`]: super::InMemory
#[derive(Debug, Clone)]
pub struct MemoryCursor {
    shared: Arc<Shared>,
    locus: PathBuf,
}

impl MemoryCursor {
    pub(crate) fn root(shared: Arc<Shared>) -> Self {
        Self {
            shared,
            locus: PathBuf::new(),
        }
    }

    fn shape(&self) -> &Schema {
        self.shared
            .schema
            .descend(self.locus.steps())
            .expect("cursor locus tracks the document shape")
    }

    fn with_node<R>(&self, f: impl FnOnce(Option<&Node>) -> R) -> R {
        let state = self.shared.state.read().unwrap();
        f(state.descend(&self.locus))
    }

    /// Every dot held at or below this position.
    fn visible_dots(&self) -> BTreeSet<Dot> {
        self.with_node(|node| {
            let mut dots = BTreeSet::new();
            if let Some(node) = node {
                node.collect_dots(&mut dots);
            }
            dots
        })
    }

    fn require_flag(&self) -> crate::Result<()> {
        match self.kind() {
            Kind::Leaf(LeafKind::Flag) => Ok(()),
            actual => Err(EngineError::KindMismatch {
                expected: "flag",
                actual,
            }
            .into()),
        }
    }

    fn require_reg(&self, reg: RegKind, expected: &'static str) -> crate::Result<()> {
        match self.kind() {
            Kind::Leaf(LeafKind::Reg(actual)) if actual == reg => Ok(()),
            actual => Err(EngineError::KindMismatch { expected, actual }.into()),
        }
    }

    fn reg_values(&self) -> Vec<Atom> {
        self.with_node(|node| match node {
            Some(Node::Reg(values)) => values.values().cloned().collect(),
            _ => Vec::new(),
        })
    }

    /// An assignment retires the values visible to this replica and adds a
    /// fresh one; concurrent assignments from other replicas survive.
    fn assign(&self, atom: Atom) -> Causal {
        Causal::expire(self.visible_dots()).join(Causal::write(
            self.locus.clone(),
            self.shared.next_dot(),
            Op::Assign(atom),
        ))
    }
}

impl Cursor for MemoryCursor {
    type Delta = Causal;

    fn kind(&self) -> Kind {
        self.shape().kind()
    }

    fn field(&mut self, name: &str) -> crate::Result<()> {
        match self.shape() {
            Schema::Record(fields) if fields.contains_key(name) => {}
            Schema::Record(_) => {
                return Err(EngineError::UnknownField {
                    field: name.to_string(),
                }
                .into());
            }
            _ => {
                return Err(EngineError::UnsupportedTraversal {
                    kind: self.kind(),
                    step: Step::Field(name.to_string()),
                }
                .into());
            }
        }
        self.locus.push(Step::Field(name.to_string()));
        trace!(locus = %self.locus, "stepped into field");
        Ok(())
    }

    fn index(&mut self, index: usize) -> crate::Result<()> {
        if !matches!(self.shape(), Schema::Sequence(_)) {
            return Err(EngineError::UnsupportedTraversal {
                kind: self.kind(),
                step: Step::Index(index),
            }
            .into());
        }
        self.locus.push(Step::Index(index));
        trace!(locus = %self.locus, "stepped to index");
        Ok(())
    }

    fn key(&mut self, key: &str) -> crate::Result<()> {
        if !matches!(self.shape(), Schema::Map(_)) {
            return Err(EngineError::UnsupportedTraversal {
                kind: self.kind(),
                step: Step::Key(key.to_string()),
            }
            .into());
        }
        self.locus.push(Step::Key(key.to_string()));
        trace!(locus = %self.locus, "stepped to key");
        Ok(())
    }

    fn keys(&self) -> Vec<Step> {
        match self.shape() {
            Schema::Record(fields) => fields.keys().map(|n| Step::Field(n.clone())).collect(),
            Schema::Sequence(_) => self.with_node(|node| match node {
                Some(Node::Sequence(items)) => (0..items.len()).map(Step::Index).collect(),
                _ => Vec::new(),
            }),
            Schema::Map(_) => self.with_node(|node| match node {
                Some(Node::Map(entries)) => entries.keys().map(|k| Step::Key(k.clone())).collect(),
                _ => Vec::new(),
            }),
            _ => Vec::new(),
        }
    }

    fn flag_enabled(&self) -> crate::Result<bool> {
        self.require_flag()?;
        Ok(self.with_node(|node| match node {
            Some(Node::Flag(dots)) => !dots.is_empty(),
            _ => false,
        }))
    }

    fn reg_bools(&self) -> crate::Result<Vec<bool>> {
        self.require_reg(RegKind::Bool, "Reg<bool>")?;
        Ok(self
            .reg_values()
            .into_iter()
            .filter_map(|atom| match atom {
                Atom::Bool(b) => Some(b),
                _ => None,
            })
            .collect())
    }

    fn reg_u64s(&self) -> crate::Result<Vec<u64>> {
        self.require_reg(RegKind::U64, "Reg<u64>")?;
        Ok(self
            .reg_values()
            .into_iter()
            .filter_map(|atom| match atom {
                Atom::U64(n) => Some(n),
                _ => None,
            })
            .collect())
    }

    fn reg_i64s(&self) -> crate::Result<Vec<i64>> {
        self.require_reg(RegKind::I64, "Reg<i64>")?;
        Ok(self
            .reg_values()
            .into_iter()
            .filter_map(|atom| match atom {
                Atom::I64(n) => Some(n),
                _ => None,
            })
            .collect())
    }

    fn reg_strs(&self) -> crate::Result<Vec<String>> {
        self.require_reg(RegKind::Str, "Reg<str>")?;
        Ok(self
            .reg_values()
            .into_iter()
            .filter_map(|atom| match atom {
                Atom::Str(s) => Some(s),
                _ => None,
            })
            .collect())
    }

    fn flag_enable(&self) -> crate::Result<Causal> {
        self.require_flag()?;
        Ok(Causal::write(
            self.locus.clone(),
            self.shared.next_dot(),
            Op::Enable,
        ))
    }

    fn flag_disable(&self) -> crate::Result<Causal> {
        self.require_flag()?;
        Ok(Causal::expire(self.visible_dots()))
    }

    fn reg_assign_bool(&self, value: bool) -> crate::Result<Causal> {
        self.require_reg(RegKind::Bool, "Reg<bool>")?;
        Ok(self.assign(Atom::Bool(value)))
    }

    fn reg_assign_u64(&self, value: u64) -> crate::Result<Causal> {
        self.require_reg(RegKind::U64, "Reg<u64>")?;
        Ok(self.assign(Atom::U64(value)))
    }

    fn reg_assign_i64(&self, value: i64) -> crate::Result<Causal> {
        self.require_reg(RegKind::I64, "Reg<i64>")?;
        Ok(self.assign(Atom::I64(value)))
    }

    fn reg_assign_str(&self, value: &str) -> crate::Result<Causal> {
        self.require_reg(RegKind::Str, "Reg<str>")?;
        Ok(self.assign(Atom::Str(value.to_string())))
    }

    fn remove_index(&self) -> crate::Result<Causal> {
        if !matches!(self.locus.last(), Some(Step::Index(_))) {
            return Err(EngineError::KindMismatch {
                expected: "sequence element",
                actual: self.kind(),
            }
            .into());
        }
        Ok(Causal::remove(self.locus.clone(), self.visible_dots()))
    }

    fn remove_key(&self) -> crate::Result<Causal> {
        if !matches!(self.locus.last(), Some(Step::Key(_))) {
            return Err(EngineError::KindMismatch {
                expected: "map entry",
                actual: self.kind(),
            }
            .into());
        }
        Ok(Causal::remove(self.locus.clone(), self.visible_dots()))
    }
}
