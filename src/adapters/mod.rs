//! Pluggable collaborators: the predicate engine and the patch applier.
//!
//! Both ship with in-crate defaults and can be substituted at engine
//! construction via the builder.

pub mod patch;
pub mod predicate;

pub use patch::{PatchApplier, PatchError, Rfc6902Patcher};
pub use predicate::{CompiledPredicate, DraftValidator, PredicateEngine, PredicateError};
