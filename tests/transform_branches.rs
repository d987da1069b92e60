//! Branch selection: ordered evaluation, `else` arms, exclusivity, and the
//! no-match no-op.

mod common;

use serde_json::json;
use stateloom::types::Context;

#[test]
fn else_arm_runs_when_if_fails() {
    let (engine, _) = common::capturing_engine();
    let plan = json!({
        "when": [{
            "if": false,
            "then": {"ops": [{"op": "add", "path": "/x", "value": 1}]},
            "else": {"ops": [{"op": "add", "path": "/y", "value": 2}]}
        }]
    });
    let mut ctx = Context::new(json!({}), json!({}));

    let report = engine.transform(&plan, &mut ctx).expect("transform");

    assert_eq!(ctx.state, json!({"y": 2}));
    assert_eq!(report.branch, Some(0));
    assert_eq!(report.ops.len(), 1);
    assert_eq!(report.ops[0].path, "/y");
}

#[test]
fn no_match_without_else_is_a_clean_noop() {
    let (engine, facts) = common::capturing_engine();
    let plan = json!({
        "when": [{
            "if": false,
            "then": {"ops": [{"op": "add", "path": "/x", "value": 1}]}
        }]
    });
    let mut ctx = Context::new(json!({}), json!({"kept": true}));

    let report = engine.transform(&plan, &mut ctx).expect("no-op transform");

    assert_eq!(ctx.state, json!({"kept": true}));
    assert_eq!(report.branch, None);
    assert!(report.ops.is_empty());
    let events = facts.events.lock().unwrap();
    assert!(events
        .iter()
        .any(|(_, event, _, fields)| event == "select" && fields["matched"] == json!(false)));
}

#[test]
fn first_matching_branch_wins() {
    let (engine, _) = common::capturing_engine();
    let plan = json!({
        "when": [
            {
                "if": {},
                "then": {"ops": [{"op": "add", "path": "/first", "value": true}]}
            },
            {
                "if": {},
                "then": {"ops": [{"op": "add", "path": "/second", "value": true}]}
            }
        ]
    });
    let mut ctx = Context::new(json!({}), json!({}));

    let report = engine.transform(&plan, &mut ctx).expect("transform");

    assert_eq!(ctx.state, json!({"first": true}));
    assert_eq!(report.branch, Some(0));
}

#[test]
fn selection_skips_past_non_matching_branches() {
    let (engine, _) = common::capturing_engine();
    let plan = json!({
        "when": [
            {
                "if": {"properties": {"event": {"properties": {"kind": {"const": "a"}}, "required": ["kind"]}}},
                "then": {"ops": [{"op": "add", "path": "/took", "value": "a"}]}
            },
            {
                "if": {"properties": {"event": {"properties": {"kind": {"const": "b"}}, "required": ["kind"]}}},
                "then": {"ops": [{"op": "add", "path": "/took", "value": "b"}]}
            }
        ]
    });
    let mut ctx = Context::new(json!({"kind": "b"}), json!({}));

    let report = engine.transform(&plan, &mut ctx).expect("transform");

    assert_eq!(ctx.state, json!({"took": "b"}));
    assert_eq!(report.branch, Some(1));
}

#[test]
fn empty_ops_action_succeeds_with_an_empty_patch() {
    let (engine, _) = common::capturing_engine();
    let plan = json!({
        "when": [{"if": {}, "then": {"ops": []}}]
    });
    let mut ctx = Context::new(json!({}), json!({"a": 1}));

    let report = engine.transform(&plan, &mut ctx).expect("transform");

    assert_eq!(ctx.state, json!({"a": 1}));
    assert_eq!(report.branch, Some(0));
    assert!(report.ops.is_empty());
}
