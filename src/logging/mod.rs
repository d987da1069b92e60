//! Structured facts and audit logging.

pub(crate) mod audit;
pub mod facts;
pub mod redact;

pub use facts::{AuditSink, FactsEmitter, JsonlSink};
pub use redact::{now_iso, redact_event, TS_ZERO};
