use super::{Evaluator, ProcessorState};

use crate::analysis::processor_state::check_value;
use crate::error::AnalysisError;
use crate::gcode::{BinaryOp, CompareOp, GCode, ReturnType};

pub(super) fn add(evaluator: &mut Evaluator, state: &mut ProcessorState) -> Result<(), AnalysisError> {
    binary(evaluator, state, "+", BinaryOp::Add)
}

pub(super) fn subtract(evaluator: &mut Evaluator, state: &mut ProcessorState) -> Result<(), AnalysisError> {
    binary(evaluator, state, "-", BinaryOp::Subtract)
}

pub(super) fn less(evaluator: &mut Evaluator, state: &mut ProcessorState) -> Result<(), AnalysisError> {
    compare(evaluator, state, "<", CompareOp::Less)
}

pub(super) fn greater(evaluator: &mut Evaluator, state: &mut ProcessorState) -> Result<(), AnalysisError> {
    compare(evaluator, state, ">", CompareOp::Greater)
}

/// `=` compares two integers or two strings. An untyped operand takes the type of the
/// other one.
pub(super) fn equal(evaluator: &mut Evaluator, state: &mut ProcessorState) -> Result<(), AnalysisError> {
    let right = state.pop_typed(evaluator.vars, ReturnType::Generic, "=")?;
    let right_type = right.ty(evaluator.vars.table());
    let left = state.pop_typed(evaluator.vars, right_type, "=")?;

    let left_type = left.ty(evaluator.vars.table());
    let right = check_value(evaluator.vars, right, left_type, "=")?;

    state.push(GCode::Compare(CompareOp::Equal, Box::new(left), Box::new(right)));
    Ok(())
}

fn binary(evaluator: &mut Evaluator, state: &mut ProcessorState, primitive: &str, op: BinaryOp) -> Result<(), AnalysisError> {
    let right = state.pop_typed(evaluator.vars, ReturnType::Int, primitive)?;
    let left = state.pop_typed(evaluator.vars, ReturnType::Int, primitive)?;

    state.push(GCode::Binary(op, Box::new(left), Box::new(right)));
    Ok(())
}

fn compare(evaluator: &mut Evaluator, state: &mut ProcessorState, primitive: &str, op: CompareOp) -> Result<(), AnalysisError> {
    let right = state.pop_typed(evaluator.vars, ReturnType::Int, primitive)?;
    let left = state.pop_typed(evaluator.vars, ReturnType::Int, primitive)?;

    state.push(GCode::Compare(op, Box::new(left), Box::new(right)));
    Ok(())
}
