//! Transform stage: drives the end-to-end pipeline.
//!
//! `VALIDATE → VARS_TOP → PRECONDS_TOP → SELECT → VARS_BRANCH →
//! PRECONDS_BRANCH → PREPARE → SNAPSHOT → MAP_SET → APPLY → DONE | FAIL`.
//! Transitions only move forward; on failure of an atomic plan the state is
//! restored from the snapshot before the error surfaces.
//!
//! Side-effects:
//! - Emits facts per stage, per-op `apply.result` rows, and a summary row.
//! - Mutates `ctx.state` in place (parent auto-creation and patch
//!   application), or restores it wholesale on atomic rollback.

use std::time::Instant;

use log::Level;
use serde_json::{json, Value};

use crate::adapters::CompiledPredicate;
use crate::logging::audit::{new_run_id, AuditCtx, AuditMode, StageLogger};
use crate::logging::{now_iso, AuditSink, FactsEmitter};
use crate::resolve;
use crate::types::ids::{op_id, plan_id};
use crate::types::{
    Action, Context, Plan, PreconditionScope, TransformError, TransformReport, Violation,
};

use super::errors::{error_id_for, exit_code_for, id_str, ErrorId};

mod set_map;

pub(crate) fn run<E: FactsEmitter, A: AuditSink>(
    api: &super::Stateloom<E, A>,
    plan_doc: &Value,
    ctx: &mut Context,
) -> Result<TransformReport, TransformError> {
    let t0 = Instant::now();
    api.audit.log(Level::Info, "transform: starting");

    let pid = plan_id(plan_doc);
    let tctx = AuditCtx::new(
        &api.facts as &dyn FactsEmitter,
        pid.to_string(),
        new_run_id(),
        now_iso(),
        AuditMode::default(),
    );
    let slog = StageLogger::new(&tctx);

    // VALIDATE: reject before any context access.
    let check = super::validate::check(api, plan_doc)?;
    if !check.valid {
        slog.plan_validate()
            .merge(json!({
                "violations": check.errors.len(),
                "error_id": id_str(ErrorId::E_PLAN_INVALID),
                "exit_code": exit_code_for(ErrorId::E_PLAN_INVALID),
            }))
            .emit_failure();
        api.audit
            .log(Level::Error, "transform: plan rejected by meta-schema (E_PLAN_INVALID)");
        return Err(TransformError::InvalidPlan { errors: check.errors });
    }
    let plan: Plan = serde_json::from_value(plan_doc.clone()).map_err(|e| {
        TransformError::InvalidPlan {
            errors: vec![Violation {
                path: String::new(),
                message: e.to_string(),
            }],
        }
    })?;
    slog.plan_validate()
        .field("atomic", json!(plan.atomic))
        .emit_success();

    // VARS_TOP
    if let Some(vars) = &plan.variables {
        resolve::vars::apply_var_map(vars, ctx);
        slog.vars()
            .merge(json!({"scope": "plan", "count": vars.0.len()}))
            .emit_success();
    }

    // PRECONDS_TOP
    if let Some(schema) = &plan.preconditions {
        evaluate_preconditions(api, &slog, schema, ctx, PreconditionScope::Plan)?;
    }

    // SELECT
    let Some((branch_idx, arm, action)) = select_branch(api, &plan, ctx)? else {
        slog.select().field("matched", json!(false)).emit_success();
        let duration_ms = t0.elapsed().as_millis() as u64;
        slog.apply_result()
            .merge(json!({"matched": false, "ops": 0, "duration_ms": duration_ms}))
            .emit_success();
        api.audit.log(Level::Info, "transform: no branch matched, state untouched");
        return Ok(TransformReport {
            plan_uuid: pid,
            branch: None,
            ops: Vec::new(),
            duration_ms,
        });
    };
    slog.select()
        .merge(json!({"matched": true, "branch": branch_idx, "arm": arm}))
        .emit_success();

    // VARS_BRANCH: merge over the top-level set.
    if let Some(vars) = &action.variables {
        resolve::vars::apply_var_map(vars, ctx);
        slog.vars()
            .merge(json!({"scope": "branch", "count": vars.0.len()}))
            .emit_success();
    }

    // PRECONDS_BRANCH
    if let Some(schema) = &action.preconditions {
        evaluate_preconditions(api, &slog, schema, ctx, PreconditionScope::Branch)?;
    }

    // PREPARE
    let prepared = resolve::prepare_ops(&action.ops, ctx);

    // SNAPSHOT: taken unconditionally; whether rollback will be needed is
    // unknown until application finishes.
    let snapshot = ctx.state.clone();

    // MAP_SET
    let primitives = match set_map::reduce(prepared, &mut ctx.state) {
        Ok(primitives) => primitives,
        Err(err) => return Err(fail(api, &slog, ctx, snapshot, plan.atomic, err, t0)),
    };

    // APPLY
    slog.apply_attempt()
        .field("ops", json!(primitives.len()))
        .emit_success();
    let diags = api.patcher.apply(&mut ctx.state, &primitives);
    let mut failed: Option<(usize, String)> = None;
    for (idx, diag) in diags.iter().enumerate() {
        let op = &primitives[idx];
        let oid = op_id(&pid, op, idx).to_string();
        match diag {
            None => slog
                .apply_result()
                .op(oid)
                .path(op.path.clone())
                .field("op", json!(op.op.as_str()))
                .emit_success(),
            Some(e) => {
                slog.apply_result()
                    .op(oid)
                    .path(op.path.clone())
                    .merge(json!({
                        "op": op.op.as_str(),
                        "error": e.to_string(),
                        "error_id": id_str(ErrorId::E_OP_FAILED),
                        "exit_code": exit_code_for(ErrorId::E_OP_FAILED),
                    }))
                    .emit_failure();
                failed = Some((idx, e.detail.clone()));
            }
        }
    }
    if let Some((idx, detail)) = failed {
        let op = &primitives[idx];
        let err = TransformError::OpFailed {
            op_index: idx,
            op: op.op.as_str(),
            path: op.path.clone(),
            detail,
            rolled_back: plan.atomic,
        };
        return Err(fail(api, &slog, ctx, snapshot, plan.atomic, err, t0));
    }

    // DONE_OK: the snapshot is dropped here.
    let duration_ms = t0.elapsed().as_millis() as u64;
    slog.apply_result()
        .merge(json!({
            "matched": true,
            "branch": branch_idx,
            "ops": primitives.len(),
            "duration_ms": duration_ms,
        }))
        .emit_success();
    api.audit.log(Level::Info, "transform: finished");
    Ok(TransformReport {
        plan_uuid: pid,
        branch: Some(branch_idx),
        ops: primitives,
        duration_ms,
    })
}

/// Ordered branch selection: the first branch whose `if` matches selects its
/// `then`; a non-matching branch with an `else` selects that. Exactly one
/// action runs, or none.
fn select_branch<'p, E: FactsEmitter, A: AuditSink>(
    api: &super::Stateloom<E, A>,
    plan: &'p Plan,
    ctx: &Context,
) -> Result<Option<(usize, &'static str, &'p Action)>, TransformError> {
    let doc = ctx.as_document();
    for (idx, branch) in plan.when.iter().enumerate() {
        let pred = compile_fragment(api, &branch.cond, format!("branch #{idx} if"))?;
        if pred.evaluate(&doc).is_ok() {
            return Ok(Some((idx, "then", &branch.then)));
        }
        if let Some(otherwise) = &branch.otherwise {
            return Ok(Some((idx, "else", otherwise)));
        }
    }
    Ok(None)
}

fn evaluate_preconditions<E: FactsEmitter, A: AuditSink>(
    api: &super::Stateloom<E, A>,
    slog: &StageLogger<'_>,
    schema: &Value,
    ctx: &Context,
    scope: PreconditionScope,
) -> Result<(), TransformError> {
    let pred = compile_fragment(api, schema, format!("{scope} preconditions"))?;
    match pred.evaluate(&ctx.as_document()) {
        Ok(()) => {
            slog.precondition()
                .field("scope", json!(scope.as_str()))
                .emit_success();
            Ok(())
        }
        Err(errors) => {
            slog.precondition()
                .merge(json!({
                    "scope": scope.as_str(),
                    "violations": errors.len(),
                    "error_id": id_str(ErrorId::E_PRECONDITION),
                    "exit_code": exit_code_for(ErrorId::E_PRECONDITION),
                }))
                .emit_failure();
            api.audit
                .log(Level::Warn, "transform: preconditions rejected context (E_PRECONDITION)");
            Err(TransformError::PreconditionFailed { scope, errors })
        }
    }
}

fn compile_fragment<E: FactsEmitter, A: AuditSink>(
    api: &super::Stateloom<E, A>,
    schema: &Value,
    scope: String,
) -> Result<Box<dyn CompiledPredicate>, TransformError> {
    api.predicate
        .compile(schema)
        .map_err(|e| TransformError::SchemaCompile { scope, detail: e.0 })
}

/// Failure tail: restore the snapshot for atomic plans, emit the rollback
/// and summary facts, and hand the error back for propagation.
fn fail<E: FactsEmitter, A: AuditSink>(
    api: &super::Stateloom<E, A>,
    slog: &StageLogger<'_>,
    ctx: &mut Context,
    snapshot: Value,
    atomic: bool,
    err: TransformError,
    t0: Instant,
) -> TransformError {
    if atomic {
        ctx.state = snapshot;
        slog.rollback().field("restored", json!(true)).emit_success();
        slog.rollback_summary()
            .field("errors", json!(0))
            .emit_success();
        api.audit
            .log(Level::Warn, "transform: failure on atomic plan, state restored");
    } else {
        slog.rollback().field("restored", json!(false)).emit_warn();
        api.audit
            .log(Level::Warn, "transform: failure on non-atomic plan, partial effects retained");
    }
    let id = error_id_for(&err);
    slog.apply_result()
        .merge(json!({
            "error": err.to_string(),
            "error_id": id_str(id),
            "exit_code": exit_code_for(id),
            "rolled_back": atomic,
            "duration_ms": t0.elapsed().as_millis() as u64,
        }))
        .emit_failure();
    api.audit.log(Level::Error, "transform: failed");
    err
}
