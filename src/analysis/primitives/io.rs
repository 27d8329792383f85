use super::{pop_args, Evaluator, ProcessorState};

use crate::error::AnalysisError;
use crate::gcode::{GCode, ReturnType, Statement};

pub(super) fn write(evaluator: &mut Evaluator, state: &mut ProcessorState) -> Result<(), AnalysisError> {
    effect(evaluator, state, "write$", &[ReturnType::String], "bibWriter.print")
}

pub(super) fn newline(evaluator: &mut Evaluator, state: &mut ProcessorState) -> Result<(), AnalysisError> {
    effect(evaluator, state, "newline$", &[], "bibWriter.println")
}

pub(super) fn warning(evaluator: &mut Evaluator, state: &mut ProcessorState) -> Result<(), AnalysisError> {
    effect(evaluator, state, "warning$", &[ReturnType::String], "bibProcessor.warning")
}

pub(super) fn preamble(_: &mut Evaluator, state: &mut ProcessorState) -> Result<(), AnalysisError> {
    state.push(GCode::Text("bibDB.preamble".to_string(), ReturnType::String));
    Ok(())
}

/// Output never changes a variable.
fn effect(
    evaluator: &mut Evaluator,
    state: &mut ProcessorState,
    primitive: &str,
    params: &[ReturnType],
    target: &'static str,
) -> Result<(), AnalysisError> {
    let args = pop_args(evaluator, state, primitive, params)?;
    state.emit(Statement::Expression(GCode::effect(target, args)));
    Ok(())
}
