//! End-to-end toggle scenarios: `set`-driven index maintenance and the
//! `remove` arm, plus plan purity across repeated runs.

mod common;

use serde_json::json;
use stateloom::types::{Context, PrimitiveKind};

#[test]
fn toggle_add_builds_both_indexes() {
    let (engine, _) = common::capturing_engine();
    let plan = common::toggle_plan();
    let mut ctx = Context::new(
        json!({"add": true, "groupId": "G1", "itemId": "I1"}),
        json!({"index": {}}),
    );

    let report = engine.transform(&plan, &mut ctx).expect("transform");

    assert_eq!(
        ctx.state,
        json!({"index": {"byGroup": {"G1": "I1"}, "byItem": {"I1": "G1"}}})
    );
    assert_eq!(report.branch, Some(0));
    // Both sets reduced to adds: the targets did not exist.
    assert_eq!(report.ops.len(), 2);
    assert!(report.ops.iter().all(|op| op.op == PrimitiveKind::Add));
    assert_eq!(report.ops[0].path, "/index/byGroup/G1");
    assert_eq!(report.ops[1].path, "/index/byItem/I1");
}

#[test]
fn toggle_remove_clears_both_indexes() {
    let (engine, _) = common::capturing_engine();
    let plan = common::toggle_plan();
    let mut ctx = Context::new(
        json!({"add": false, "groupId": "G1", "itemId": "I1"}),
        json!({"index": {"byGroup": {"G1": "I1"}, "byItem": {"I1": "G1"}}}),
    );

    let report = engine.transform(&plan, &mut ctx).expect("transform");

    assert_eq!(ctx.state, json!({"index": {"byGroup": {}, "byItem": {}}}));
    assert!(report.ops.iter().all(|op| op.op == PrimitiveKind::Remove));
}

#[test]
fn toggle_set_replaces_existing_entries() {
    let (engine, _) = common::capturing_engine();
    let plan = common::toggle_plan();
    let mut ctx = Context::new(
        json!({"add": true, "groupId": "G1", "itemId": "I2"}),
        json!({"index": {"byGroup": {"G1": "I1"}, "byItem": {}}}),
    );

    let report = engine.transform(&plan, &mut ctx).expect("transform");

    assert_eq!(report.ops[0].op, PrimitiveKind::Replace);
    assert_eq!(report.ops[1].op, PrimitiveKind::Add);
    assert_eq!(
        ctx.state,
        json!({"index": {"byGroup": {"G1": "I2"}, "byItem": {"I2": "G1"}}})
    );
}

#[test]
fn repeated_runs_on_fresh_contexts_are_identical() {
    let (engine, _) = common::capturing_engine();
    let plan = common::toggle_plan();
    let event = json!({"add": true, "groupId": "G1", "itemId": "I1"});
    let state = json!({"index": {}});

    let mut first = Context::new(event.clone(), state.clone());
    let mut second = Context::new(event, state);
    let a = engine.transform(&plan, &mut first).expect("first run");
    let b = engine.transform(&plan, &mut second).expect("second run");

    assert_eq!(first.state, second.state);
    assert_eq!(a.ops, b.ops);
    assert_eq!(a.plan_uuid, b.plan_uuid);
}
