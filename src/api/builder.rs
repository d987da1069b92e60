use crate::adapters::{PatchApplier, PredicateEngine};
use crate::logging::{AuditSink, FactsEmitter};

/// Builder for constructing a `Stateloom` with ergonomic chaining.
/// Mirrors `Stateloom::new(...)` but lets callers substitute either
/// collaborator before first use.
pub struct ApiBuilder<E: FactsEmitter, A: AuditSink> {
    facts: E,
    audit: A,
    predicate: Option<Box<dyn PredicateEngine>>,
    patcher: Option<Box<dyn PatchApplier>>,
}

impl<E: FactsEmitter, A: AuditSink> ApiBuilder<E, A> {
    pub fn new(facts: E, audit: A) -> Self {
        Self {
            facts,
            audit,
            predicate: None,
            patcher: None,
        }
    }

    /// Substitute the predicate engine. The instance must be draft-2020-12
    /// capable; the bundled meta-schema is compiled against it on first use.
    #[must_use]
    pub fn with_predicate_engine(mut self, engine: Box<dyn PredicateEngine>) -> Self {
        self.predicate = Some(engine);
        self
    }

    /// Substitute the patch applier.
    #[must_use]
    pub fn with_patch_applier(mut self, patcher: Box<dyn PatchApplier>) -> Self {
        self.patcher = Some(patcher);
        self
    }

    /// Build a `Stateloom` with the configured collaborators.
    ///
    /// Example
    /// ```rust
    /// use stateloom::api::ApiBuilder;
    /// use stateloom::logging::JsonlSink;
    ///
    /// let engine = ApiBuilder::new(JsonlSink::default(), JsonlSink::default()).build();
    /// let check = engine
    ///     .validate_plan(&serde_json::json!({"when": [{"if": true, "then": {"ops": []}}]}))
    ///     .unwrap();
    /// assert!(check.valid);
    /// ```
    pub fn build(self) -> super::Stateloom<E, A> {
        let mut api = super::Stateloom::new(self.facts, self.audit);
        if let Some(engine) = self.predicate {
            api.predicate = engine;
        }
        if let Some(patcher) = self.patcher {
            api.patcher = patcher;
        }
        api
    }
}
