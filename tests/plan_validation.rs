//! Meta-schema acceptance and rejection cases via `validate_plan`, plus the
//! `InvalidPlan` path through `transform`.

mod common;

use serde_json::json;
use stateloom::constants;
use stateloom::types::{Context, TransformError};

fn assert_invalid(plan: serde_json::Value) {
    let (engine, _) = common::capturing_engine();
    let check = engine.validate_plan(&plan).expect("meta-schema compiles");
    assert!(!check.valid, "expected rejection of {plan}");
    assert!(!check.errors.is_empty(), "rejections carry diagnostics");
}

#[test]
fn the_toggle_plan_is_valid() {
    let (engine, _) = common::capturing_engine();
    let check = engine.validate_plan(&common::toggle_plan()).expect("compiles");
    assert!(check.valid, "diagnostics: {:?}", check.errors);
    assert!(check.errors.is_empty());
}

#[test]
fn bundled_meta_schema_is_exposed_and_parses() {
    let parsed: serde_json::Value =
        serde_json::from_str(constants::PLAN_SCHEMA_JSON).expect("exposed text parses");
    assert_eq!(&parsed, constants::plan_schema());
    assert_eq!(
        parsed["$schema"],
        json!("https://json-schema.org/draft/2020-12/schema")
    );
}

#[test]
fn when_is_required_and_non_empty() {
    assert_invalid(json!({}));
    assert_invalid(json!({"when": []}));
}

#[test]
fn root_object_is_closed() {
    assert_invalid(json!({"when": [{"if": {}, "then": {"ops": []}}], "extra": 1}));
}

#[test]
fn branches_require_if_and_then() {
    assert_invalid(json!({"when": [{"then": {"ops": []}}]}));
    assert_invalid(json!({"when": [{"if": {}}]}));
    assert_invalid(json!({"when": [{"if": {}, "then": {"ops": []}, "elif": {}}]}));
}

#[test]
fn variable_specs_take_exactly_one_of_get_or_value() {
    assert_invalid(json!({
        "variables": {"x": {"get": "event.a", "value": 1}},
        "when": [{"if": {}, "then": {"ops": []}}]
    }));
    assert_invalid(json!({
        "variables": {"x": {}},
        "when": [{"if": {}, "then": {"ops": []}}]
    }));

    let (engine, _) = common::capturing_engine();
    for variant in [json!({"get": "event.a"}), json!({"value": null})] {
        let plan = json!({
            "variables": {"x": variant},
            "when": [{"if": {}, "then": {"ops": []}}]
        });
        assert!(engine.validate_plan(&plan).expect("compiles").valid);
    }
}

#[test]
fn operation_shapes_are_conditional_on_op() {
    // remove forbids value and requires path.
    assert_invalid(json!({
        "when": [{"if": {}, "then": {"ops": [{"op": "remove", "path": "/a", "value": 1}]}}]
    }));
    assert_invalid(json!({
        "when": [{"if": {}, "then": {"ops": [{"op": "remove"}]}}]
    }));
    // add/replace/test/set require both path and value.
    for op in ["add", "replace", "test", "set"] {
        assert_invalid(json!({
            "when": [{"if": {}, "then": {"ops": [{"op": op, "path": "/a"}]}}]
        }));
        assert_invalid(json!({
            "when": [{"if": {}, "then": {"ops": [{"op": op, "value": 1}]}}]
        }));
    }
    // An explicit null value satisfies the requirement.
    let (engine, _) = common::capturing_engine();
    let plan = json!({
        "when": [{"if": {}, "then": {"ops": [{"op": "add", "path": "/a", "value": null}]}}]
    });
    assert!(engine.validate_plan(&plan).expect("compiles").valid);
}

#[test]
fn unknown_ops_and_test_kinds_are_rejected() {
    assert_invalid(json!({
        "when": [{"if": {}, "then": {"ops": [{"op": "move", "path": "/a", "value": 1}]}}]
    }));
    assert_invalid(json!({
        "when": [{"if": {}, "then": {"ops": [{"op": "test", "path": "/a", "value": 1, "testKind": "shallow"}]}}]
    }));

    let (engine, _) = common::capturing_engine();
    for kind in ["equality", "deepEqual"] {
        let plan = json!({
            "when": [{"if": {}, "then": {"ops": [{"op": "test", "path": "/a", "value": 1, "testKind": kind}]}}]
        });
        assert!(engine.validate_plan(&plan).expect("compiles").valid);
    }
}

#[test]
fn value_spec_objects_take_exactly_one_of_value_from_or_literal() {
    assert_invalid(json!({
        "when": [{"if": {}, "then": {"ops": [
            {"op": "add", "path": "/a", "value": {"valueFrom": "event.a", "literal": 1}}
        ]}}]
    }));
    assert_invalid(json!({
        "when": [{"if": {}, "then": {"ops": [
            {"op": "add", "path": "/a", "value": {"someOtherKey": 1}}
        ]}}]
    }));

    let (engine, _) = common::capturing_engine();
    let plan = json!({
        "when": [{"if": {}, "then": {"ops": [
            {"op": "add", "path": "/a", "value": {"literal": {"valueFrom": "kept verbatim"}}},
            {"op": "add", "path": "/b", "value": [1, 2, {"nested": true}]}
        ]}}]
    });
    assert!(engine.validate_plan(&plan).expect("compiles").valid);
}

#[test]
fn transform_rejects_invalid_plans_before_touching_state() {
    let (engine, _) = common::capturing_engine();
    let mut ctx = Context::new(json!({}), json!({"untouched": true}));

    let err = engine
        .transform(&json!({"when": []}), &mut ctx)
        .expect_err("invalid plan");

    assert_eq!(ctx.state, json!({"untouched": true}));
    match err {
        TransformError::InvalidPlan { errors } => assert!(!errors.is_empty()),
        other => panic!("unexpected error: {other}"),
    }
}
