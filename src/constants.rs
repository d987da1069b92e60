//! Shared crate-wide constants for Stateloom.
//!
//! Centralizes magic values and the bundled plan meta-schema used across
//! modules. Adjusting these here will propagate through the crate.

use once_cell::sync::Lazy;
use serde_json::Value;

/// The Transform Plan meta-schema (draft 2020-12), shipped verbatim so that
/// callers can validate plans independently of this crate.
pub const PLAN_SCHEMA_JSON: &str = include_str!("../schema/plan.schema.json");

static PLAN_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(PLAN_SCHEMA_JSON).expect("bundled plan meta-schema is valid JSON")
});

/// Parsed form of [`PLAN_SCHEMA_JSON`], decoded once per process.
#[must_use]
pub fn plan_schema() -> &'static Value {
    &PLAN_SCHEMA
}

/// UUIDv5 namespace tag for deterministic plan/operation IDs.
pub const NS_TAG: &str = "https://stateloom.dev/stateloom";

/// Schema version stamped on every emitted fact envelope.
pub const FACTS_SCHEMA_VERSION: i64 = 1;
