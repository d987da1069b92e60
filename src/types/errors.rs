//! Error types used across Stateloom.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// One schema-validation diagnostic: where in the instance, and what.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// JSON Pointer into the offending instance.
    pub path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Which preconditions block rejected the context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreconditionScope {
    Plan,
    Branch,
}

impl PreconditionScope {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PreconditionScope::Plan => "plan",
            PreconditionScope::Branch => "branch",
        }
    }
}

impl fmt::Display for PreconditionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single exceptional outcome of a `transform` call.
///
/// Exactly one of these propagates per failed call; the payload names the
/// offending stage or operation so callers can distinguish kinds without
/// string matching.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The plan was rejected by the bundled meta-schema. Raised before any
    /// context access.
    #[error("plan rejected by meta-schema ({} violation(s))", .errors.len())]
    InvalidPlan { errors: Vec<Violation> },

    /// An embedded schema fragment could not be compiled by the predicate
    /// engine.
    #[error("schema for {scope} failed to compile: {detail}")]
    SchemaCompile { scope: String, detail: String },

    /// A top-level or branch `preconditions` predicate returned false.
    /// No state mutation has occurred.
    #[error("{scope} preconditions not satisfied ({} violation(s))", .errors.len())]
    PreconditionFailed {
        scope: PreconditionScope,
        errors: Vec<Violation>,
    },

    /// A `set` operation's pointer traverses a non-container value on the
    /// parent chain. Raised before the patch applier runs that operation.
    #[error("set op #{op_index}: parent at {pointer:?} is not a container")]
    ParentNotObject { op_index: usize, pointer: String },

    /// The patch applier reported a failure on a primitive operation.
    #[error("op #{op_index} ({op} {path:?}) failed: {detail}")]
    OpFailed {
        op_index: usize,
        op: &'static str,
        path: String,
        detail: String,
        /// Whether the state was restored from the snapshot (`atomic` plans).
        rolled_back: bool,
    },
}
