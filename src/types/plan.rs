//! Typed model of the Transform Plan vocabulary.
//!
//! Plans arrive as raw JSON and are checked against the bundled meta-schema
//! before being decoded into these types, so the structural invariants here
//! (closed objects, op-conditional field requirements) are already enforced
//! by the time a `Plan` exists.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A validated, immutable transform plan.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Plan {
    /// All-or-nothing application: on any failure the state is restored
    /// from the pre-apply snapshot.
    #[serde(default)]
    pub atomic: bool,
    #[serde(default)]
    pub description: Option<String>,
    /// Top-level variables, evaluated in declaration order before branch
    /// selection.
    #[serde(default)]
    pub variables: Option<VarMap>,
    /// Schema fragment gating the whole plan.
    #[serde(default)]
    pub preconditions: Option<Value>,
    /// Ordered branch list; the first branch whose `if` matches (or whose
    /// `else` arm exists when it does not) supplies the action to run.
    pub when: Vec<Branch>,
}

/// One conditional branch of a plan's `when` sequence.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Branch {
    /// Predicate schema applied to the working context.
    #[serde(rename = "if")]
    pub cond: Value,
    pub then: Action,
    #[serde(default, rename = "else")]
    pub otherwise: Option<Action>,
}

/// The executable body of a branch arm.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Action {
    #[serde(default)]
    pub preconditions: Option<Value>,
    /// Branch-local variables; merge over the top-level set for this branch.
    #[serde(default)]
    pub variables: Option<VarMap>,
    pub ops: Vec<Operation>,
}

/// A single plan operation. `set` is the convenience form that the executor
/// reduces to primitive `add`/`replace` before application.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Operation {
    pub op: OpKind,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    /// Value spec; `Some(Value::Null)` when the plan spells out an explicit
    /// JSON null, `None` when the field is absent.
    #[serde(default, deserialize_with = "some_value")]
    pub value: Option<Value>,
    #[serde(default, rename = "testKind")]
    pub test_kind: Option<TestKind>,
}

/// Operation vocabulary admitted by the meta-schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    Add,
    Replace,
    Remove,
    Test,
    Set,
}

impl OpKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            OpKind::Add => "add",
            OpKind::Replace => "replace",
            OpKind::Remove => "remove",
            OpKind::Test => "test",
            OpKind::Set => "set",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Informational comparison hint on `test` operations. The applier's `test`
/// is always deep structural equality regardless of this hint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TestKind {
    Equality,
    DeepEqual,
}

/// One variable specification: exactly one of `get`/`value` is present
/// (the meta-schema rejects any other combination).
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariableSpec {
    #[serde(default)]
    pub get: Option<String>,
    #[serde(default, deserialize_with = "some_value")]
    pub value: Option<Value>,
}

/// A variable mapping that preserves document order. Declaration order is
/// semantic: later variables may reference earlier ones.
///
/// Plans reach this type both from text and through `serde_json::Value`;
/// the crate enables serde_json's `preserve_order` feature so the order
/// seen here is the document's, not an alphabetized one.
#[derive(Clone, Debug, Default)]
pub struct VarMap(pub Vec<(String, VariableSpec)>);

impl VarMap {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, VariableSpec)> {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for VarMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct VarMapVisitor;

        impl<'de> Visitor<'de> for VarMapVisitor {
            type Value = VarMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of variable specifications")
            }

            fn visit_map<M>(self, mut access: M) -> Result<VarMap, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, spec)) = access.next_entry::<String, VariableSpec>()? {
                    entries.push((name, spec));
                }
                Ok(VarMap(entries))
            }
        }

        deserializer.deserialize_map(VarMapVisitor)
    }
}

/// Deserialize into `Some` even for an explicit JSON null, so that
/// `{"value": null}` and a missing `value` stay distinguishable.
fn some_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
