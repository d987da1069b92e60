//! Reduction of `set` to primitive `add`/`replace`.
//!
//! Side-effects: parent auto-creation for `set` targets is the only state
//! mutation performed outside the patch applier. It happens after the
//! rollback snapshot is taken, so atomic plans undo it like any other
//! mutation.

use serde_json::{Map, Value};

use crate::resolve::path::{escape_segment, pointer_segments};
use crate::types::{OpKind, PreparedOp, PrimitiveKind, PrimitiveOp, TransformError};

/// Map every prepared operation onto the primitive vocabulary, deciding
/// `add` vs `replace` for each `set` against the current state and creating
/// missing object parents along its pointer.
pub(super) fn reduce(
    prepared: Vec<PreparedOp>,
    state: &mut Value,
) -> Result<Vec<PrimitiveOp>, TransformError> {
    let mut out = Vec::with_capacity(prepared.len());
    for (idx, op) in prepared.into_iter().enumerate() {
        let kind = match op.op {
            OpKind::Add => PrimitiveKind::Add,
            OpKind::Replace => PrimitiveKind::Replace,
            OpKind::Remove => PrimitiveKind::Remove,
            OpKind::Test => PrimitiveKind::Test,
            OpKind::Set => {
                let path = op.path.unwrap_or_default();
                ensure_parents(state, &path, idx)?;
                let kind = if state.pointer(&path).is_some() {
                    PrimitiveKind::Replace
                } else {
                    PrimitiveKind::Add
                };
                out.push(PrimitiveOp {
                    op: kind,
                    path,
                    from: op.from,
                    value: op.value,
                });
                continue;
            }
        };
        out.push(PrimitiveOp {
            op: kind,
            path: op.path.unwrap_or_default(),
            from: op.from,
            value: op.value,
        });
    }
    Ok(out)
}

/// Walk the pointer parent-by-parent. An absent or null parent key becomes
/// an empty object; an existing non-container parent is a hard error naming
/// the offending pointer. Array parents accept in-bounds numeric segments
/// only.
fn ensure_parents(state: &mut Value, path: &str, op_index: usize) -> Result<(), TransformError> {
    let segs = pointer_segments(path);
    let Some((_target, parents)) = segs.split_last() else {
        return Ok(());
    };
    let mut cur = state;
    let mut walked = String::new();
    for seg in parents {
        if !(cur.is_object() || cur.is_array()) {
            return Err(TransformError::ParentNotObject {
                op_index,
                pointer: walked,
            });
        }
        let child_ptr = format!("{walked}/{}", escape_segment(seg));
        cur = match cur {
            Value::Object(map) => {
                let slot = map
                    .entry(seg.as_str())
                    .or_insert_with(|| Value::Object(Map::new()));
                if slot.is_null() {
                    *slot = Value::Object(Map::new());
                }
                slot
            }
            Value::Array(items) => {
                let idx = seg
                    .parse::<usize>()
                    .ok()
                    .filter(|i| *i < items.len())
                    .ok_or_else(|| TransformError::ParentNotObject {
                        op_index,
                        pointer: child_ptr.clone(),
                    })?;
                let slot = &mut items[idx];
                if slot.is_null() {
                    *slot = Value::Object(Map::new());
                }
                slot
            }
            _ => unreachable!("container checked above"),
        };
        walked = child_ptr;
    }
    if !(cur.is_object() || cur.is_array()) {
        return Err(TransformError::ParentNotObject {
            op_index,
            pointer: walked,
        });
    }
    Ok(())
}
