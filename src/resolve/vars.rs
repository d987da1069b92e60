//! Variable evaluation.

use serde_json::Value;

use crate::types::{Context, VarMap, VariableSpec};

/// Evaluate a variable mapping in declaration order, inserting each result
/// into `ctx.vars` as it lands so later variables can reference earlier ones
/// via `vars.<name>`. Same-name entries overwrite, which is how branch-local
/// variables merge over the top-level set.
pub(crate) fn apply_var_map(vars: &VarMap, ctx: &mut Context) {
    for (name, spec) in vars.iter() {
        let resolved = evaluate_spec(spec, ctx);
        ctx.vars.insert(name.clone(), resolved);
    }
}

/// Evaluate one spec: `value` verbatim, pointer-form `get` (leading `/`)
/// through the path resolver and dereferenced against the whole working
/// context, dotted-form `get` through the dotted walker.
fn evaluate_spec(spec: &VariableSpec, ctx: &Context) -> Value {
    if let Some(v) = &spec.value {
        return v.clone();
    }
    match spec.get.as_deref() {
        Some(expr) if expr.starts_with('/') => {
            let pointer = super::to_pointer(expr, ctx);
            super::deref_pointer(ctx, &pointer).cloned().unwrap_or(Value::Null)
        }
        Some(expr) => super::lookup_dotted(ctx, expr).cloned().unwrap_or(Value::Null),
        None => Value::Null,
    }
}
