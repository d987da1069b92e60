//! Predicate engine adapter.
//!
//! Wraps the external JSON Schema validator behind a uniform compile/apply
//! surface so the executor never touches the validator's API directly.
//! Plan-embedded schema fragments are opaque input to this adapter.

use jsonschema::{Draft, JSONSchema};
use serde_json::Value;
use thiserror::Error;

use crate::types::Violation;

/// Compilation failure for an embedded schema fragment.
#[derive(Debug, Error)]
#[error("schema compilation failed: {0}")]
pub struct PredicateError(pub String);

/// Turns an arbitrary schema fragment into a callable predicate over the
/// working context.
pub trait PredicateEngine: Send + Sync {
    fn compile(&self, schema: &Value) -> Result<Box<dyn CompiledPredicate>, PredicateError>;
}

/// A compiled predicate. `Err` carries the full diagnostic list, matching
/// all-errors validator semantics.
pub trait CompiledPredicate: Send + Sync {
    fn evaluate(&self, data: &Value) -> Result<(), Vec<Violation>>;
}

/// Default predicate engine: draft 2020-12, non-strict, all errors reported.
#[derive(Clone, Copy, Debug, Default)]
pub struct DraftValidator;

impl PredicateEngine for DraftValidator {
    fn compile(&self, schema: &Value) -> Result<Box<dyn CompiledPredicate>, PredicateError> {
        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft202012)
            .compile(schema)
            .map_err(|e| PredicateError(e.to_string()))?;
        Ok(Box::new(CompiledSchema { compiled }))
    }
}

struct CompiledSchema {
    compiled: JSONSchema,
}

impl CompiledPredicate for CompiledSchema {
    fn evaluate(&self, data: &Value) -> Result<(), Vec<Violation>> {
        match self.compiled.validate(data) {
            Ok(()) => Ok(()),
            Err(errors) => Err(errors
                .map(|e| Violation {
                    path: e.instance_path.to_string(),
                    message: e.to_string(),
                })
                .collect()),
        }
    }
}
