//! One compiler per BST builtin.
//!
//! Each builtin pops its operands from the [`ProcessorState`], checks their types,
//! and either pushes the expression it computes or emits the statement it performs.

mod arithmetic;
mod control;
mod entry;
mod io;
mod stack;
mod strings;

use super::{Evaluator, ProcessorState};

use crate::error::AnalysisError;
use crate::gcode::{GCode, ReturnType};
use crate::generate::Helper;

type Compile = fn(&mut Evaluator<'_>, &mut ProcessorState) -> Result<(), AnalysisError>;

/// A builtin function, e.g. `write$`.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    compile: Compile,
}

impl Builtin {
    pub fn evaluate(&self, evaluator: &mut Evaluator, state: &mut ProcessorState) -> Result<(), AnalysisError> {
        (self.compile)(evaluator, state)
    }
}

impl std::fmt::Debug for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

/// Every builtin BibTeX defines, except the predeclared variables.
pub(super) fn builtins() -> Vec<Builtin> {
    let builtin = |name: &'static str, compile: Compile| Builtin { name, compile };

    vec![
        builtin("+", arithmetic::add),
        builtin("-", arithmetic::subtract),
        builtin("<", arithmetic::less),
        builtin(">", arithmetic::greater),
        builtin("=", arithmetic::equal),
        builtin("*", strings::concat),
        builtin(":=", control::assign),
        builtin("add.period$", strings::add_period),
        builtin("call.type$", entry::call_type),
        builtin("change.case$", strings::change_case),
        builtin("chr.to.int$", strings::chr_to_int),
        builtin("cite$", entry::cite),
        builtin("duplicate$", stack::duplicate),
        builtin("empty$", strings::empty),
        builtin("format.name$", strings::format_name),
        builtin("if$", control::if_then_else),
        builtin("int.to.chr$", strings::int_to_chr),
        builtin("int.to.str$", strings::int_to_str),
        builtin("missing$", entry::missing),
        builtin("newline$", io::newline),
        builtin("num.names$", strings::num_names),
        builtin("pop$", stack::pop),
        builtin("preamble$", io::preamble),
        builtin("purify$", strings::purify),
        builtin("quote$", strings::quote),
        builtin("skip$", control::skip),
        builtin("stack$", stack::clear),
        builtin("substring$", strings::substring),
        builtin("swap$", stack::swap),
        builtin("text.length$", strings::text_length),
        builtin("text.prefix$", strings::text_prefix),
        builtin("top$", stack::pop),
        builtin("type$", entry::entry_type),
        builtin("warning$", io::warning),
        builtin("while$", control::while_loop),
        builtin("width$", strings::width),
        builtin("write$", io::write),
    ]
}

/* Shared Shapes */

/// Pops operands of the given types, returned in push order.
fn pop_args(
    evaluator: &mut Evaluator,
    state: &mut ProcessorState,
    primitive: &str,
    params: &[ReturnType],
) -> Result<Vec<GCode>, AnalysisError> {
    let mut args = vec![];
    for ty in params.iter().rev() {
        args.push(state.pop_typed(evaluator.vars, *ty, primitive)?);
    }
    args.reverse();

    Ok(args)
}

/// A pure call of a runtime method.
fn runtime_call(
    evaluator: &mut Evaluator,
    state: &mut ProcessorState,
    primitive: &str,
    params: &[ReturnType],
    target: &'static str,
    result: ReturnType,
) -> Result<(), AnalysisError> {
    let args = pop_args(evaluator, state, primitive, params)?;
    state.push(GCode::call(target, args, result));
    Ok(())
}

/// A pure call of a helper method, which is linked into the output.
fn helper_call(
    evaluator: &mut Evaluator,
    state: &mut ProcessorState,
    primitive: &str,
    params: &[ReturnType],
    helper: &Helper,
    result: ReturnType,
) -> Result<(), AnalysisError> {
    evaluator.links.add_helper(helper);
    runtime_call(evaluator, state, primitive, params, helper.name, result)
}
