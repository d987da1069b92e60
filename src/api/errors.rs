//! Stable machine-readable error identifiers for emitted facts.
//!
//! Facts carry `error_id`/`exit_code` pairs so downstream log consumers can
//! key on failures without parsing display strings.

use crate::types::TransformError;

#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorId {
    E_PLAN_INVALID,
    E_PRECONDITION,
    E_SCHEMA_COMPILE,
    E_PARENT_KIND,
    E_OP_FAILED,
    E_GENERIC,
}

#[must_use]
pub const fn id_str(id: ErrorId) -> &'static str {
    match id {
        ErrorId::E_PLAN_INVALID => "E_PLAN_INVALID",
        ErrorId::E_PRECONDITION => "E_PRECONDITION",
        ErrorId::E_SCHEMA_COMPILE => "E_SCHEMA_COMPILE",
        ErrorId::E_PARENT_KIND => "E_PARENT_KIND",
        ErrorId::E_OP_FAILED => "E_OP_FAILED",
        ErrorId::E_GENERIC => "E_GENERIC",
    }
}

#[must_use]
pub const fn exit_code_for(id: ErrorId) -> i32 {
    match id {
        ErrorId::E_PLAN_INVALID => 10,
        ErrorId::E_PRECONDITION => 20,
        ErrorId::E_SCHEMA_COMPILE => 30,
        ErrorId::E_PARENT_KIND => 40,
        ErrorId::E_OP_FAILED => 50,
        ErrorId::E_GENERIC => 1,
    }
}

#[must_use]
pub fn error_id_for(err: &TransformError) -> ErrorId {
    match err {
        TransformError::InvalidPlan { .. } => ErrorId::E_PLAN_INVALID,
        TransformError::PreconditionFailed { .. } => ErrorId::E_PRECONDITION,
        TransformError::SchemaCompile { .. } => ErrorId::E_SCHEMA_COMPILE,
        TransformError::ParentNotObject { .. } => ErrorId::E_PARENT_KIND,
        TransformError::OpFailed { .. } => ErrorId::E_OP_FAILED,
    }
}
