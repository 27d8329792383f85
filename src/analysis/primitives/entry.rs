use super::{Evaluator, ProcessorState};

use crate::analysis::processor_state::check_value;
use crate::error::AnalysisError;
use crate::gcode::{CallTarget, GCode, ReturnType, Statement};
use crate::generate::link;

pub(super) fn cite(evaluator: &mut Evaluator, state: &mut ProcessorState) -> Result<(), AnalysisError> {
    evaluator.entry.touch();
    state.push(GCode::Text("entry.key".to_string(), ReturnType::String));
    Ok(())
}

pub(super) fn entry_type(evaluator: &mut Evaluator, state: &mut ProcessorState) -> Result<(), AnalysisError> {
    evaluator.entry.touch();
    state.push(GCode::Text("entry.type".to_string(), ReturnType::String));
    Ok(())
}

/// A direct field read asks the entry. Values that may hold a field read from elsewhere
/// (parameters, merged or spilled locals, results of style functions) are checked at run
/// time, where a missing field is `null`. Anything else is never missing.
pub(super) fn missing(evaluator: &mut Evaluator, state: &mut ProcessorState) -> Result<(), AnalysisError> {
    let value = state.pop(evaluator.vars);
    let value = check_value(evaluator.vars, value, ReturnType::Generic, "missing$")?;

    let may_hold_field = match &value {
        GCode::Local(_) | GCode::Call { target: CallTarget::Function(_), .. } => {
            value.ty(evaluator.vars.table()) != ReturnType::Int
        }
        _ => false,
    };

    match value {
        GCode::Field(name) => {
            evaluator.entry.touch();
            state.push(GCode::call("entry.isMissing", vec![GCode::Str(name)], ReturnType::Int));
        }
        value if may_hold_field => {
            evaluator.links.add_helper(&link::IS_MISSING);
            state.push(GCode::call(link::IS_MISSING.name, vec![value], ReturnType::Int));
        }
        _ => state.push(GCode::Int(0)),
    }

    Ok(())
}

/// Runs the function registered for the type of the current entry.
pub(super) fn call_type(evaluator: &mut Evaluator, state: &mut ProcessorState) -> Result<(), AnalysisError> {
    evaluator.links.add_helper(&link::CALL_TYPE);

    // Any type function may assign any variable.
    state.spill_if(evaluator.vars, GCode::reads_state);

    let entry = evaluator.entry.get();
    state.emit(Statement::Expression(GCode::Call {
        target: CallTarget::Runtime(link::CALL_TYPE.name),
        args: vec![entry],
        ty: ReturnType::Void,
        effect: true,
    }));

    Ok(())
}
