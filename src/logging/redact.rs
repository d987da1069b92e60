//! Timestamp and volatility redaction for deterministic fact comparison.

use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

pub const TS_ZERO: &str = "1970-01-01T00:00:00Z";

pub fn now_iso() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| TS_ZERO.to_string())
}

/// Normalize a fact for comparison: zero the timestamp and drop the fields
/// that vary from run to run.
pub fn redact_event(mut v: Value) -> Value {
    if let Some(obj) = v.as_object_mut() {
        obj.insert("ts".into(), Value::String(TS_ZERO.to_string()));
        obj.remove("duration_ms");
        obj.remove("run_id");
        obj.remove("event_id");
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn redact_zeroes_ts_and_strips_volatile_fields() {
        let input = json!({
            "ts": "2026-01-01T12:00:00Z",
            "duration_ms": 12,
            "run_id": "r",
            "event_id": "e",
            "stage": "apply.result"
        });
        let out = redact_event(input);
        assert_eq!(out.get("ts").and_then(|v| v.as_str()), Some(TS_ZERO));
        assert!(out.get("duration_ms").is_none());
        assert!(out.get("run_id").is_none());
        assert!(out.get("event_id").is_none());
        assert_eq!(out.get("stage").and_then(|v| v.as_str()), Some("apply.result"));
    }
}
