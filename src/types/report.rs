//! Reports returned by the public API.

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use super::plan::OpKind;

/// Outcome of standalone plan validation.
#[must_use]
#[derive(Clone, Debug, Default)]
pub struct PlanCheck {
    pub valid: bool,
    pub errors: Vec<super::errors::Violation>,
}

/// An operation with its path template and value spec fully resolved against
/// the working context, but with `set` not yet reduced.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedOp {
    pub op: OpKind,
    pub path: Option<String>,
    pub from: Option<String>,
    pub value: Option<Value>,
}

/// RFC 6902 operation vocabulary accepted by the patch applier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Add,
    Replace,
    Remove,
    Test,
}

impl PrimitiveKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PrimitiveKind::Add => "add",
            PrimitiveKind::Replace => "replace",
            PrimitiveKind::Remove => "remove",
            PrimitiveKind::Test => "test",
        }
    }
}

/// One primitive patch operation, ready for the applier. Serializes to the
/// familiar RFC 6902 shape for audit logs and replay.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PrimitiveOp {
    pub op: PrimitiveKind,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Successful outcome of a `transform` call. The mutated state lives in the
/// caller's `Context`; `ops` is the primitive patch that was applied, with
/// `set` already reduced to `add`/`replace`.
#[must_use]
#[derive(Clone, Debug)]
pub struct TransformReport {
    pub plan_uuid: Uuid,
    /// Index of the branch whose action ran, or `None` when no branch
    /// matched and the call was a no-op.
    pub branch: Option<usize>,
    pub ops: Vec<PrimitiveOp>,
    pub duration_ms: u64,
}
