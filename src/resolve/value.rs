//! `ValueSpec` resolution.

use serde_json::Value;

use crate::types::Context;

/// Produce a concrete value from a `ValueSpec`.
///
/// A non-array object carrying `valueFrom` resolves the dotted expression
/// against the context (pointer syntax is not supported here); one carrying
/// `literal` yields that payload verbatim. Every other value is a literal in
/// place.
#[must_use]
pub fn resolve_value_spec(spec: &Value, ctx: &Context) -> Value {
    if let Value::Object(map) = spec {
        if let Some(Value::String(expr)) = map.get("valueFrom") {
            return super::lookup_dotted(ctx, expr).cloned().unwrap_or(Value::Null);
        }
        if let Some(literal) = map.get("literal") {
            return literal.clone();
        }
    }
    spec.clone()
}
