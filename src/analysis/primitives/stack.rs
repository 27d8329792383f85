use super::{Evaluator, ProcessorState};

use crate::error::AnalysisError;

/// Stack values are immutable and free of effects, so a copy is as good as the original.
pub(super) fn duplicate(evaluator: &mut Evaluator, state: &mut ProcessorState) -> Result<(), AnalysisError> {
    let top = state.pop(evaluator.vars);

    state.push(top.clone());
    state.push(top);
    Ok(())
}

/// `pop$`, and `top$`, whose log output is not part of the generated program.
pub(super) fn pop(evaluator: &mut Evaluator, state: &mut ProcessorState) -> Result<(), AnalysisError> {
    state.pop(evaluator.vars);
    Ok(())
}

pub(super) fn swap(evaluator: &mut Evaluator, state: &mut ProcessorState) -> Result<(), AnalysisError> {
    let top = state.pop(evaluator.vars);
    let below = state.pop(evaluator.vars);

    state.push(top);
    state.push(below);
    Ok(())
}

/// `stack$` empties the stack this function built. It never reaches into the caller's.
pub(super) fn clear(_: &mut Evaluator, state: &mut ProcessorState) -> Result<(), AnalysisError> {
    state.clear();
    Ok(())
}
