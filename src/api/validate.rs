//! Plan validation against the bundled meta-schema.
//!
//! The compiled meta-schema is cached once per engine instance; a substitute
//! predicate engine supplied at construction gets its own compilation on
//! first use, so validation semantics always match the caller's validator.

use serde_json::Value;

use crate::adapters::CompiledPredicate;
use crate::constants;
use crate::logging::{AuditSink, FactsEmitter};
use crate::types::{PlanCheck, TransformError};

pub(super) fn compiled_meta<'a, E: FactsEmitter, A: AuditSink>(
    api: &'a super::Stateloom<E, A>,
) -> Result<&'a dyn CompiledPredicate, TransformError> {
    api.meta
        .get_or_try_init(|| api.predicate.compile(constants::plan_schema()))
        .map(|compiled| compiled.as_ref())
        .map_err(|e| TransformError::SchemaCompile {
            scope: "plan meta-schema".to_string(),
            detail: e.0,
        })
}

pub(super) fn check<E: FactsEmitter, A: AuditSink>(
    api: &super::Stateloom<E, A>,
    plan: &Value,
) -> Result<PlanCheck, TransformError> {
    let meta = compiled_meta(api)?;
    Ok(match meta.evaluate(plan) {
        Ok(()) => PlanCheck {
            valid: true,
            errors: Vec::new(),
        },
        Err(errors) => PlanCheck {
            valid: false,
            errors,
        },
    })
}
