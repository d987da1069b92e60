//! The caller-owned working context.

use serde_json::{Map, Value};

/// Working context for a single `transform` call.
///
/// The engine reads `event`, reads and writes `state` (in place on success,
/// restored from a snapshot on atomic rollback), and owns the `vars` mapping
/// for the duration of the call. `extras` carries any additional root-level
/// names the caller wants visible to expressions and predicates.
#[derive(Clone, Debug, Default)]
pub struct Context {
    pub event: Value,
    pub state: Value,
    pub vars: Map<String, Value>,
    pub extras: Map<String, Value>,
}

impl Context {
    #[must_use]
    pub fn new(event: Value, state: Value) -> Self {
        Self {
            event,
            state,
            vars: Map::new(),
            extras: Map::new(),
        }
    }

    /// Assemble the working document `{event, state, vars, ...extras}` that
    /// predicates evaluate against. Reserved names shadow extras.
    #[must_use]
    pub fn as_document(&self) -> Value {
        let mut doc = Map::with_capacity(3 + self.extras.len());
        for (k, v) in &self.extras {
            doc.insert(k.clone(), v.clone());
        }
        doc.insert("event".to_string(), self.event.clone());
        doc.insert("state".to_string(), self.state.clone());
        doc.insert("vars".to_string(), Value::Object(self.vars.clone()));
        Value::Object(doc)
    }

    /// Route a root-level name to the matching context member.
    /// `vars` has no standalone `Value` representation, so it is handled by
    /// the resolvers directly.
    #[must_use]
    pub(crate) fn root(&self, name: &str) -> Option<&Value> {
        match name {
            "event" => Some(&self.event),
            "state" => Some(&self.state),
            "vars" => None,
            other => self.extras.get(other),
        }
    }
}
