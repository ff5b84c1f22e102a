//! Type-directed conversion between native values and leaf containers.
//!
//! Decoding projects a leaf position onto one native value; registers may
//! hold several concurrently-written values after a merge, and the projection
//! takes the first in the cursor's deterministic enumeration order. This is a
//! documented lossy read projection, not a conflict-resolution policy; the
//! full set stays reachable through [`decode_all`].

use super::LensError;
use crate::engine::{Cursor, Kind, LeafKind, RegKind};
use crate::value::Value;

/// Decodes the leaf at the cursor into a native value.
///
/// `None` means the position is absent: a null leaf, or a register that
/// holds no value yet.
pub(crate) fn decode<C: Cursor>(cursor: &C) -> crate::Result<Option<Value>> {
    let leaf = match cursor.kind() {
        Kind::Leaf(leaf) => leaf,
        kind => return Err(LensError::NotAValueType { kind }.into()),
    };
    Ok(match leaf {
        LeafKind::Null => None,
        LeafKind::Flag => Some(Value::Bool(cursor.flag_enabled()?)),
        LeafKind::Reg(RegKind::Bool) => cursor.reg_bools()?.first().copied().map(Value::Bool),
        LeafKind::Reg(RegKind::U64) => cursor.reg_u64s()?.first().copied().map(Value::UInt),
        LeafKind::Reg(RegKind::I64) => cursor.reg_i64s()?.first().copied().map(Value::Int),
        LeafKind::Reg(RegKind::Str) => cursor.reg_strs()?.into_iter().next().map(Value::Text),
    })
}

/// Decodes every concurrently-held value at the leaf.
pub(crate) fn decode_all<C: Cursor>(cursor: &C) -> crate::Result<Vec<Value>> {
    let leaf = match cursor.kind() {
        Kind::Leaf(leaf) => leaf,
        kind => return Err(LensError::NotAValueType { kind }.into()),
    };
    Ok(match leaf {
        LeafKind::Null => Vec::new(),
        LeafKind::Flag => vec![Value::Bool(cursor.flag_enabled()?)],
        LeafKind::Reg(RegKind::Bool) => {
            cursor.reg_bools()?.into_iter().map(Value::Bool).collect()
        }
        LeafKind::Reg(RegKind::U64) => cursor.reg_u64s()?.into_iter().map(Value::UInt).collect(),
        LeafKind::Reg(RegKind::I64) => cursor.reg_i64s()?.into_iter().map(Value::Int).collect(),
        LeafKind::Reg(RegKind::Str) => cursor.reg_strs()?.into_iter().map(Value::Text).collect(),
    })
}

/// Encodes one scalar into the leaf at the cursor, producing a delta.
///
/// Integers cross-coerce between the signed and unsigned register kinds when
/// the value fits; any other mismatch is an error.
pub(crate) fn encode<C: Cursor>(cursor: &C, value: &Value) -> crate::Result<C::Delta> {
    let leaf = match cursor.kind() {
        Kind::Leaf(LeafKind::Null) => {
            return Err(LensError::NotAValueType {
                kind: Kind::Leaf(LeafKind::Null),
            }
            .into());
        }
        Kind::Leaf(leaf) => leaf,
        kind => return Err(LensError::NotAValueType { kind }.into()),
    };
    match (leaf, value) {
        (LeafKind::Flag, Value::Bool(enabled)) => {
            if *enabled {
                cursor.flag_enable()
            } else {
                cursor.flag_disable()
            }
        }
        (LeafKind::Reg(RegKind::Bool), Value::Bool(b)) => cursor.reg_assign_bool(*b),
        (LeafKind::Reg(RegKind::U64), value) => match value.as_u64() {
            Some(v) => cursor.reg_assign_u64(v),
            None => Err(LensError::ValueMismatch {
                leaf,
                value: value.type_name(),
            }
            .into()),
        },
        (LeafKind::Reg(RegKind::I64), value) => match value.as_i64() {
            Some(v) => cursor.reg_assign_i64(v),
            None => Err(LensError::ValueMismatch {
                leaf,
                value: value.type_name(),
            }
            .into()),
        },
        (LeafKind::Reg(RegKind::Str), Value::Text(s)) => cursor.reg_assign_str(s),
        (leaf, value) => Err(LensError::ValueMismatch {
            leaf,
            value: value.type_name(),
        }
        .into()),
    }
}
