//! Emitter traits for structured facts and human-oriented audit lines.

use log::Level;
use serde_json::Value;

/// Receives one structured fact per pipeline event. Implementations decide
/// where the JSON goes; the engine never writes files itself.
pub trait FactsEmitter: std::fmt::Debug {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value);
}

/// Receives leveled, human-readable audit lines bracketing each call.
pub trait AuditSink {
    fn log(&self, level: Level, msg: &str);
}

/// No-op sink, suitable for tests and embedders that only want the report.
#[derive(Default, Debug, Copy, Clone)]
pub struct JsonlSink;

impl FactsEmitter for JsonlSink {
    fn emit(&self, _subsystem: &str, _event: &str, _decision: &str, _fields: Value) {}
}

impl AuditSink for JsonlSink {
    fn log(&self, _level: Level, _msg: &str) {}
}
