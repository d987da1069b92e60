//! Shared test helpers for the stateloom crate integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use log::Level;
use serde_json::Value;

use stateloom::logging::{AuditSink, FactsEmitter};
use stateloom::Stateloom;

/// A simple in-memory emitter to capture facts during tests.
#[derive(Clone, Default, Debug)]
pub struct TestEmitter {
    pub events: Arc<Mutex<Vec<(String, String, String, Value)>>>,
}

impl FactsEmitter for TestEmitter {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value) {
        self.events
            .lock()
            .unwrap()
            .push((subsystem.into(), event.into(), decision.into(), fields));
    }
}

impl AuditSink for TestEmitter {
    fn log(&self, _level: Level, _msg: &str) {}
}

/// Engine wired to a capturing emitter; returns both for assertions.
pub fn capturing_engine() -> (Stateloom<TestEmitter, TestEmitter>, TestEmitter) {
    let facts = TestEmitter::default();
    let engine = Stateloom::new(facts.clone(), facts.clone());
    (engine, facts)
}

/// The inverse-index toggle plan used across scenarios: `set` both index
/// directions on add, `remove` both on anything else.
pub fn toggle_plan() -> Value {
    serde_json::json!({
        "description": "maintain group/item inverse indexes",
        "when": [{
            "if": {
                "properties": {
                    "event": {
                        "properties": {"add": {"const": true}},
                        "required": ["add"]
                    }
                }
            },
            "then": {"ops": [
                {"op": "set", "path": "/index/byGroup/{event.groupId}", "value": {"valueFrom": "event.itemId"}},
                {"op": "set", "path": "/index/byItem/{event.itemId}", "value": {"valueFrom": "event.groupId"}}
            ]},
            "else": {"ops": [
                {"op": "remove", "path": "/index/byGroup/{event.groupId}"},
                {"op": "remove", "path": "/index/byItem/{event.itemId}"}
            ]}
        }]
    })
}
