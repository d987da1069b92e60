//! RFC 6902 patch applier.
//!
//! The executor hands this adapter a fully-resolved primitive list and a
//! mutable target. The applier itself is non-atomic: it applies in order,
//! stops at the first failure, and leaves every prior mutation in place.
//! Rollback is the executor's concern.

use serde_json::Value;
use thiserror::Error;

use crate::resolve::path::unescape_segment;
use crate::types::{PrimitiveKind, PrimitiveOp};

/// Per-operation diagnostic returned by the applier.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{op} {path:?}: {detail}")]
pub struct PatchError {
    pub op: &'static str,
    pub path: String,
    pub detail: String,
}

impl PatchError {
    fn new(op: PrimitiveKind, path: &str, detail: impl Into<String>) -> Self {
        Self {
            op: op.as_str(),
            path: path.to_string(),
            detail: detail.into(),
        }
    }
}

/// Applies primitive operations in order, mutating the target in place.
/// One diagnostic slot per attempted operation; `None` is success.
pub trait PatchApplier: Send + Sync {
    fn apply(&self, target: &mut Value, ops: &[PrimitiveOp]) -> Vec<Option<PatchError>>;
}

/// Default in-crate applier for `add|replace|remove|test`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Rfc6902Patcher;

impl PatchApplier for Rfc6902Patcher {
    fn apply(&self, target: &mut Value, ops: &[PrimitiveOp]) -> Vec<Option<PatchError>> {
        let mut diags = Vec::with_capacity(ops.len());
        for op in ops {
            match apply_one(target, op) {
                Ok(()) => diags.push(None),
                Err(e) => {
                    diags.push(Some(e));
                    break;
                }
            }
        }
        diags
    }
}

fn apply_one(target: &mut Value, op: &PrimitiveOp) -> Result<(), PatchError> {
    match op.op {
        PrimitiveKind::Add => add(target, &op.path, required_value(op)?),
        PrimitiveKind::Replace => replace(target, &op.path, required_value(op)?),
        PrimitiveKind::Remove => remove(target, &op.path),
        PrimitiveKind::Test => test(target, &op.path, &required_value(op)?),
    }
}

fn required_value(op: &PrimitiveOp) -> Result<Value, PatchError> {
    op.value
        .clone()
        .ok_or_else(|| PatchError::new(op.op, &op.path, "operation carries no value"))
}

/// Split a non-empty pointer into (parent pointer, unescaped last token).
fn split_parent(op: PrimitiveKind, path: &str) -> Result<(&str, String), PatchError> {
    match path.rfind('/') {
        Some(i) => Ok((&path[..i], unescape_segment(&path[i + 1..]))),
        None => Err(PatchError::new(op, path, "pointer must start with '/'")),
    }
}

fn parent_slot<'a>(
    target: &'a mut Value,
    op: PrimitiveKind,
    path: &str,
    parent: &str,
) -> Result<&'a mut Value, PatchError> {
    if parent.is_empty() {
        return Ok(target);
    }
    target
        .pointer_mut(parent)
        .ok_or_else(|| PatchError::new(op, path, "parent path does not exist"))
}

fn array_index(op: PrimitiveKind, path: &str, token: &str, len: usize) -> Result<usize, PatchError> {
    let idx: usize = token
        .parse()
        .map_err(|_| PatchError::new(op, path, format!("invalid array index {token:?}")))?;
    if idx > len {
        return Err(PatchError::new(op, path, format!("index {idx} out of bounds (len {len})")));
    }
    Ok(idx)
}

fn add(target: &mut Value, path: &str, value: Value) -> Result<(), PatchError> {
    if path.is_empty() {
        *target = value;
        return Ok(());
    }
    let (parent, last) = split_parent(PrimitiveKind::Add, path)?;
    match parent_slot(target, PrimitiveKind::Add, path, parent)? {
        Value::Object(map) => {
            map.insert(last, value);
            Ok(())
        }
        Value::Array(items) => {
            if last == "-" {
                items.push(value);
                return Ok(());
            }
            let idx = array_index(PrimitiveKind::Add, path, &last, items.len())?;
            items.insert(idx, value);
            Ok(())
        }
        _ => Err(PatchError::new(PrimitiveKind::Add, path, "parent is not a container")),
    }
}

fn replace(target: &mut Value, path: &str, value: Value) -> Result<(), PatchError> {
    if path.is_empty() {
        *target = value;
        return Ok(());
    }
    match target.pointer_mut(path) {
        Some(slot) => {
            *slot = value;
            Ok(())
        }
        None => Err(PatchError::new(PrimitiveKind::Replace, path, "no value at path")),
    }
}

fn remove(target: &mut Value, path: &str) -> Result<(), PatchError> {
    if path.is_empty() {
        return Err(PatchError::new(PrimitiveKind::Remove, path, "cannot remove the document root"));
    }
    let (parent, last) = split_parent(PrimitiveKind::Remove, path)?;
    match parent_slot(target, PrimitiveKind::Remove, path, parent)? {
        Value::Object(map) => map
            .remove(&last)
            .map(|_| ())
            .ok_or_else(|| PatchError::new(PrimitiveKind::Remove, path, "no value at path")),
        Value::Array(items) => {
            let idx = array_index(PrimitiveKind::Remove, path, &last, items.len())?;
            if idx == items.len() {
                return Err(PatchError::new(PrimitiveKind::Remove, path, "no value at path"));
            }
            items.remove(idx);
            Ok(())
        }
        _ => Err(PatchError::new(PrimitiveKind::Remove, path, "parent is not a container")),
    }
}

fn test(target: &Value, path: &str, expected: &Value) -> Result<(), PatchError> {
    match target.pointer(path) {
        Some(actual) if actual == expected => Ok(()),
        Some(_) => Err(PatchError::new(PrimitiveKind::Test, path, "value mismatch")),
        None => Err(PatchError::new(PrimitiveKind::Test, path, "no value at path")),
    }
}
