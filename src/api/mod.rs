// Facade for API module; delegates to submodules under src/api/

use once_cell::sync::OnceCell;
use serde_json::Value;

use crate::adapters::{
    CompiledPredicate, DraftValidator, PatchApplier, PredicateEngine, Rfc6902Patcher,
};
use crate::logging::{AuditSink, FactsEmitter};
use crate::types::{Context, PlanCheck, TransformError, TransformReport};

mod builder;
pub mod errors;
mod transform;
mod validate;

pub use builder::ApiBuilder;

/// The transformation engine.
///
/// Stateless across calls apart from the compiled meta-schema, which is
/// cached on first use. One instance may serve many callers concurrently as
/// long as they do not share a `state` object.
pub struct Stateloom<E: FactsEmitter, A: AuditSink> {
    facts: E,
    audit: A,
    predicate: Box<dyn PredicateEngine>,
    patcher: Box<dyn PatchApplier>,
    meta: OnceCell<Box<dyn CompiledPredicate>>,
}

impl<E: FactsEmitter, A: AuditSink> Stateloom<E, A> {
    /// Engine with the default collaborators: draft-2020-12 predicate engine
    /// and the in-crate RFC 6902 applier.
    pub fn new(facts: E, audit: A) -> Self {
        Self {
            facts,
            audit,
            predicate: Box::new(DraftValidator),
            patcher: Box::new(Rfc6902Patcher),
            meta: OnceCell::new(),
        }
    }

    pub fn builder(facts: E, audit: A) -> ApiBuilder<E, A> {
        ApiBuilder::new(facts, audit)
    }

    /// Validate a plan against the bundled meta-schema without executing it.
    /// Invalid plans come back as a `PlanCheck` with diagnostics, not an
    /// error; `Err` here means the meta-schema itself failed to compile on
    /// a substituted predicate engine.
    pub fn validate_plan(&self, plan: &Value) -> Result<PlanCheck, TransformError> {
        validate::check(self, plan)
    }

    /// Execute a plan against the caller's context.
    ///
    /// On success `ctx.state` has been mutated in place and the report
    /// carries the primitive patch that was applied (with `set` already
    /// reduced to `add`/`replace`). On failure of an `atomic` plan the state
    /// is restored from the pre-apply snapshot before the error returns.
    pub fn transform(
        &self,
        plan: &Value,
        ctx: &mut Context,
    ) -> Result<TransformReport, TransformError> {
        transform::run(self, plan, ctx)
    }
}
