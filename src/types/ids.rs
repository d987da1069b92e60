//! Deterministic plan and operation IDs.
//!
//! IDs are UUIDv5 digests over canonical serializations so that the same
//! plan always maps to the same `plan_id` across processes, and each emitted
//! primitive maps to a stable `op_id` under it.

use serde_json::Value;
use uuid::Uuid;

use super::report::PrimitiveOp;
use crate::constants::NS_TAG;

fn namespace() -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, NS_TAG.as_bytes())
}

/// Stable ID for a plan document.
///
/// `serde_json::Value` objects preserve document key order (variable
/// declaration order is semantic elsewhere in the crate), so the digest is
/// taken over an explicitly key-sorted rendering: byte-identical plans and
/// key-reordered plans agree.
#[must_use]
pub fn plan_id(plan: &Value) -> Uuid {
    Uuid::new_v5(&namespace(), canonicalize(plan).to_string().as_bytes())
}

/// Recursively sort object keys; arrays and scalars are kept as-is.
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), canonicalize(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        scalar => scalar.clone(),
    }
}

/// Stable ID for one primitive operation at its position in the emitted
/// patch, namespaced under the owning plan.
#[must_use]
pub fn op_id(plan_id: &Uuid, op: &PrimitiveOp, idx: usize) -> Uuid {
    let name = format!("{}:{}#{}", op.op.as_str(), op.path, idx);
    Uuid::new_v5(plan_id, name.as_bytes())
}
