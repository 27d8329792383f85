//! Assignment and the two control flow builtins.
//!
//! `if$` and `while$` evaluate their procedures in nested states and then reconcile
//! what those states left on the stack with the enclosing state.

use super::{Evaluator, ProcessorState};

use crate::analysis::processor_state::{check_value, describe};
use crate::analysis::Compiler;
use crate::error::AnalysisError;
use crate::gcode::{GCode, ReturnType, Statement, Target};

pub(super) fn skip(_: &mut Evaluator, _: &mut ProcessorState) -> Result<(), AnalysisError> {
    Ok(())
}

/// `value 'name :=`
pub(super) fn assign(evaluator: &mut Evaluator, state: &mut ProcessorState) -> Result<(), AnalysisError> {
    let name = match state.pop(evaluator.vars) {
        GCode::Quote(name) => name,
        other => {
            return Err(AnalysisError::TypeMismatch {
                primitive: ":=".to_string(),
                expected: "quoted variable".to_string(),
                found: describe(&other, evaluator.vars),
            })
        }
    };

    let (target, ty) = match evaluator.compilers.get(&name) {
        Some(Compiler::GlobalInteger(global)) => (Target::Global(global.clone()), ReturnType::Int),
        Some(Compiler::GlobalString(global)) => (Target::Global(global.clone()), ReturnType::String),
        Some(Compiler::EntryInteger) => (Target::EntryLocal(name), ReturnType::Int),
        Some(Compiler::EntryString) => (Target::EntryLocal(name), ReturnType::String),
        Some(_) => return Err(AnalysisError::Unsupported(format!("assignment to '{name}', which is not a variable"))),
        None => return Err(AnalysisError::UnresolvedReference(name)),
    };

    if matches!(target, Target::EntryLocal(_)) {
        evaluator.entry.touch();
    }

    let value = state.pop_typed(evaluator.vars, ty, ":=")?;

    // Values still on the stack must keep reading the old value.
    state.spill_if(evaluator.vars, |code| code.reads(&target));
    state.emit(Statement::Assign(target, value));

    Ok(())
}

/// `condition {then} {else} if$`
///
/// Each branch sees the whole enclosing stack. Afterwards each branch's stack is viewed
/// as if it had drawn as many parameters as the hungrier branch ("full view"). Slots
/// the views agree on are kept; every other slot gets a local, declared before the
/// `if` and assigned at the end of each branch.
pub(super) fn if_then_else(evaluator: &mut Evaluator, state: &mut ProcessorState) -> Result<(), AnalysisError> {
    let otherwise = state.pop_procedure(evaluator.vars, "if$")?;
    let then = state.pop_procedure(evaluator.vars, "if$")?;
    let condition = state.pop_typed(evaluator.vars, ReturnType::Int, "if$")?;

    let mut then_state = state.nested();
    evaluator.evaluate_procedure(&mut then_state, &then, "if$")?;
    let mut else_state = state.nested();
    evaluator.evaluate_procedure(&mut else_state, &otherwise, "if$")?;

    let drawn = then_state.drawn().max(else_state.drawn());
    let then_view = then_state.full_view(evaluator.vars, drawn);
    let else_view = else_state.full_view(evaluator.vars, drawn);

    if then_view.len() != else_view.len() {
        return Err(AnalysisError::UnbalancedBranches { primitive: "if$".to_string() });
    }

    let (_, mut then_code) = then_state.into_parts();
    let (_, mut else_code) = else_state.into_parts();
    let mut merged = vec![];

    for (then_value, else_value) in then_view.into_iter().zip(else_view) {
        if then_value == else_value {
            merged.push(then_value);
            continue;
        }

        if !then_value.is_value() || !else_value.is_value() {
            return Err(AnalysisError::Unsupported("if$ branches that leave different procedures".to_string()));
        }

        let then_type = then_value.ty(evaluator.vars.table());
        let else_type = else_value.ty(evaluator.vars.table());
        let ty = then_type.unify(else_type).ok_or_else(|| AnalysisError::TypeMismatch {
            primitive: "if$".to_string(),
            expected: then_type.to_string(),
            found: else_type.to_string(),
        })?;

        let then_value = check_value(evaluator.vars, then_value, ty, "if$")?;
        let else_value = check_value(evaluator.vars, else_value, ty, "if$")?;

        let local = evaluator.vars.local(ty);
        state.emit(Statement::Declare(local, None));
        then_code.push(Statement::Assign(Target::Local(local), then_value));
        else_code.push(Statement::Assign(Target::Local(local), else_value));
        merged.push(GCode::Local(local));
    }

    state.emit(Statement::If { condition, then: then_code, otherwise: else_code });
    state.replace_stack(merged, drawn);

    Ok(())
}

/// `{condition} {body} while$`
///
/// Every stack value is first moved into its own local, so that the loop can update
/// it. The condition must leave exactly one integer on top of the untouched stack,
/// and the body must keep the depth. Neither may reach below the stack.
pub(super) fn while_loop(evaluator: &mut Evaluator, state: &mut ProcessorState) -> Result<(), AnalysisError> {
    let body = state.pop_procedure(evaluator.vars, "while$")?;
    let condition = state.pop_procedure(evaluator.vars, "while$")?;

    let loop_vars = state.spill_all(evaluator.vars, "while$")?;
    let start = state.stack().to_vec();

    let mut condition_state = state.nested();
    evaluator.evaluate_procedure(&mut condition_state, &condition, "while$")?;
    if condition_state.drawn() > 0 {
        return Err(AnalysisError::Unsupported("a while$ condition that takes values from the caller".to_string()));
    }

    let (mut condition_stack, condition_code) = condition_state.into_parts();
    if condition_stack.len() != start.len() + 1 {
        return Err(AnalysisError::Unsupported("a while$ condition that does not push exactly one value".to_string()));
    }
    let condition_value = match condition_stack.pop() {
        Some(value) => check_value(evaluator.vars, value, ReturnType::Int, "while$")?,
        None => return Err(AnalysisError::Impossible("while$ condition stack shrank".to_string())),
    };
    if condition_stack != start {
        return Err(AnalysisError::Unsupported("a while$ condition that changes the stack".to_string()));
    }

    let mut body_state = state.nested();
    evaluator.evaluate_procedure(&mut body_state, &body, "while$")?;
    if body_state.drawn() > 0 {
        return Err(AnalysisError::Unsupported("a while$ body that takes values from the caller".to_string()));
    }

    let (body_stack, mut body_code) = body_state.into_parts();
    if body_stack.len() != start.len() {
        return Err(AnalysisError::Unsupported("a while$ body that changes the stack depth".to_string()));
    }

    let mut changed = vec![];
    for ((var, old), new) in loop_vars.iter().zip(&start).zip(body_stack) {
        if *old != new {
            let ty = evaluator.vars.table().ty(*var);
            changed.push((*var, check_value(evaluator.vars, new, ty, "while$")?));
        }
    }

    if changed.len() == 1 {
        let (var, value) = changed.remove(0);
        body_code.push(Statement::Assign(Target::Local(var), value));
    } else {
        // The new values may read each other's old values.
        let mut temporaries = vec![];
        for (var, value) in changed {
            let ty = value.ty(evaluator.vars.table());
            let temporary = evaluator.vars.local(ty);
            body_code.push(Statement::Declare(temporary, Some(value)));
            temporaries.push((var, temporary));
        }
        for (var, temporary) in temporaries {
            body_code.push(Statement::Assign(Target::Local(var), GCode::Local(temporary)));
        }
    }

    state.emit(Statement::While { condition_code, condition: condition_value, body: body_code });

    Ok(())
}
