//! Core data model: plans, contexts, reports, errors, and IDs.

pub mod context;
pub mod errors;
pub mod ids;
pub mod plan;
pub mod report;

pub use context::Context;
pub use errors::{PreconditionScope, TransformError, Violation};
pub use plan::{Action, Branch, OpKind, Operation, Plan, TestKind, VarMap, VariableSpec};
pub use report::{PlanCheck, PreparedOp, PrimitiveKind, PrimitiveOp, TransformReport};
