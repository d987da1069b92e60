//! Expression resolution against the working context.
//!
//! Two small expression languages coexist and are kept separate on purpose:
//! dotted expressions (interpolation tokens, `valueFrom`) walk the context
//! top-down by identifier, while pointer-form variable `get` dereferences an
//! interpolated RFC 6901 pointer against the same root. They share only the
//! segment walker below. Nullish at any step is not an error; it propagates
//! as `None` and surfaces as an empty string or JSON null downstream.

pub mod path;
pub mod value;
pub mod vars;

pub use path::{interpolate, to_pointer};
pub use value::resolve_value_spec;

use serde_json::Value;

use crate::types::{Context, Operation, PreparedOp};

/// Resolve a dotted expression (`event.groupId`, `vars.id`) from the
/// working-context root.
pub(crate) fn lookup_dotted<'a>(ctx: &'a Context, expr: &str) -> Option<&'a Value> {
    let segs: Vec<&str> = expr.split('.').collect();
    let (&head, rest) = segs.split_first()?;
    if head.is_empty() {
        return None;
    }
    if head == "vars" {
        let (&name, rest) = rest.split_first()?;
        return walk(ctx.vars.get(name)?, rest);
    }
    walk(ctx.root(head)?, rest)
}

/// Dereference a fully-resolved RFC 6901 pointer against the working-context
/// root, i.e. `/state/...`, `/event/...`, `/vars/...`.
pub(crate) fn deref_pointer<'a>(ctx: &'a Context, pointer: &str) -> Option<&'a Value> {
    let segs = path::pointer_segments(pointer);
    let (head, rest) = segs.split_first()?;
    if head == "vars" {
        let (name, rest) = rest.split_first()?;
        return walk(ctx.vars.get(name.as_str())?, rest);
    }
    walk(ctx.root(head)?, rest)
}

fn walk<'a, S: AsRef<str>>(mut cur: &'a Value, segs: &[S]) -> Option<&'a Value> {
    for seg in segs {
        cur = step(cur, seg.as_ref())?;
    }
    Some(cur)
}

/// One traversal step: object key, or numeric array index. Anything else is
/// nullish.
fn step<'a>(cur: &'a Value, seg: &str) -> Option<&'a Value> {
    match cur {
        Value::Object(map) => map.get(seg),
        Value::Array(items) => seg.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Convert a resolved token value to its template-substitution text.
/// Strings verbatim, scalars by display, nullish empty, containers as
/// compact JSON.
pub(crate) fn stringify(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        container => container.to_string(),
    }
}

/// Resolve every operation's `path`/`from` template and `value` spec against
/// the context. `op` is kept as given, including `set`.
#[must_use]
pub fn prepare_ops(ops: &[Operation], ctx: &Context) -> Vec<PreparedOp> {
    ops.iter()
        .map(|op| PreparedOp {
            op: op.op,
            path: op.path.as_deref().map(|t| to_pointer(t, ctx)),
            from: op.from.as_deref().map(|t| to_pointer(t, ctx)),
            value: op.value.as_ref().map(|spec| resolve_value_spec(spec, ctx)),
        })
        .collect()
}
