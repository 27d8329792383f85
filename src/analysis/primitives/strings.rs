use super::{helper_call, runtime_call, Evaluator, ProcessorState};

use crate::error::AnalysisError;
use crate::gcode::{BinaryOp, GCode};
use crate::generate::link;

use crate::gcode::ReturnType::{Int, String as Str};

pub(super) fn concat(evaluator: &mut Evaluator, state: &mut ProcessorState) -> Result<(), AnalysisError> {
    let right = state.pop_typed(evaluator.vars, Str, "*")?;
    let left = state.pop_typed(evaluator.vars, Str, "*")?;

    state.push(GCode::Binary(BinaryOp::Concat, Box::new(left), Box::new(right)));
    Ok(())
}

pub(super) fn add_period(evaluator: &mut Evaluator, state: &mut ProcessorState) -> Result<(), AnalysisError> {
    helper_call(evaluator, state, "add.period$", &[Str], &link::ADD_PERIOD, Str)
}

pub(super) fn change_case(evaluator: &mut Evaluator, state: &mut ProcessorState) -> Result<(), AnalysisError> {
    runtime_call(evaluator, state, "change.case$", &[Str, Str], "bibProcessor.changeCase", Str)
}

pub(super) fn chr_to_int(evaluator: &mut Evaluator, state: &mut ProcessorState) -> Result<(), AnalysisError> {
    helper_call(evaluator, state, "chr.to.int$", &[Str], &link::CHR_TO_INT, Int)
}

pub(super) fn empty(evaluator: &mut Evaluator, state: &mut ProcessorState) -> Result<(), AnalysisError> {
    helper_call(evaluator, state, "empty$", &[Str], &link::IS_EMPTY, Int)
}

pub(super) fn format_name(evaluator: &mut Evaluator, state: &mut ProcessorState) -> Result<(), AnalysisError> {
    helper_call(evaluator, state, "format.name$", &[Str, Int, Str], &link::FORMAT_NAME, Str)
}

pub(super) fn int_to_chr(evaluator: &mut Evaluator, state: &mut ProcessorState) -> Result<(), AnalysisError> {
    helper_call(evaluator, state, "int.to.chr$", &[Int], &link::INT_TO_CHR, Str)
}

pub(super) fn int_to_str(evaluator: &mut Evaluator, state: &mut ProcessorState) -> Result<(), AnalysisError> {
    runtime_call(evaluator, state, "int.to.str$", &[Int], "Integer.toString", Str)
}

pub(super) fn num_names(evaluator: &mut Evaluator, state: &mut ProcessorState) -> Result<(), AnalysisError> {
    helper_call(evaluator, state, "num.names$", &[Str], &link::NUM_NAMES, Int)
}

pub(super) fn purify(evaluator: &mut Evaluator, state: &mut ProcessorState) -> Result<(), AnalysisError> {
    runtime_call(evaluator, state, "purify$", &[Str], "bibProcessor.purify", Str)
}

pub(super) fn quote(_: &mut Evaluator, state: &mut ProcessorState) -> Result<(), AnalysisError> {
    state.push(GCode::Str("\"".to_string()));
    Ok(())
}

pub(super) fn substring(evaluator: &mut Evaluator, state: &mut ProcessorState) -> Result<(), AnalysisError> {
    helper_call(evaluator, state, "substring$", &[Str, Int, Int], &link::SUBSTRING, Str)
}

pub(super) fn text_length(evaluator: &mut Evaluator, state: &mut ProcessorState) -> Result<(), AnalysisError> {
    helper_call(evaluator, state, "text.length$", &[Str], &link::TEXT_LENGTH, Int)
}

pub(super) fn text_prefix(evaluator: &mut Evaluator, state: &mut ProcessorState) -> Result<(), AnalysisError> {
    helper_call(evaluator, state, "text.prefix$", &[Str, Int], &link::TEXT_PREFIX, Str)
}

pub(super) fn width(evaluator: &mut Evaluator, state: &mut ProcessorState) -> Result<(), AnalysisError> {
    runtime_call(evaluator, state, "width$", &[Str], "bibProcessor.width", Int)
}
