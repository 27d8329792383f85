//! The symbolic machine state that function bodies are evaluated against.

use super::var_manager::VarManager;

use crate::error::AnalysisError;
use crate::gcode::{CodeBlock, GCode, ReturnType, Statement, VarId};

/// A stack of symbolic values, plus the statements emitted so far.
///
/// Popping an empty stack never fails: the value must have come from the caller, so
/// it becomes a parameter. `base` counts the caller values already claimed by
/// enclosing states, and `drawn` the ones this state claimed itself.
#[derive(Debug)]
pub struct ProcessorState {
    stack: Vec<GCode>,
    pub code: CodeBlock,
    base: usize,
    drawn: usize,
}

impl ProcessorState {
    pub fn new() -> Self {
        ProcessorState { stack: vec![], code: CodeBlock::new(), base: 0, drawn: 0 }
    }

    /// A state for a branch or loop of this one. It sees the same stack, emits into
    /// its own block, and draws parameters from below everything this state drew.
    pub fn nested(&self) -> Self {
        ProcessorState { stack: self.stack.clone(), code: CodeBlock::new(), base: self.base + self.drawn, drawn: 0 }
    }

    pub fn stack(&self) -> &[GCode] {
        &self.stack
    }

    pub fn drawn(&self) -> usize {
        self.drawn
    }

    pub fn push(&mut self, code: GCode) {
        self.stack.push(code);
    }

    /// Drops every value this state can see, without drawing parameters.
    pub fn clear(&mut self) {
        self.stack.clear();
    }

    pub fn emit(&mut self, statement: Statement) {
        self.code.push(statement);
    }

    /// Pops the top value, whatever it is.
    pub fn pop(&mut self, vars: &mut VarManager) -> GCode {
        self.pop_as(vars, ReturnType::Generic)
    }

    fn pop_as(&mut self, vars: &mut VarManager, ty: ReturnType) -> GCode {
        match self.stack.pop() {
            Some(code) => code,
            None => {
                let depth = self.base + self.drawn;
                self.drawn += 1;
                GCode::Local(vars.param(depth, ty))
            }
        }
    }

    /// Pops a value that must have type `expected`.
    pub fn pop_typed(&mut self, vars: &mut VarManager, expected: ReturnType, primitive: &str) -> Result<GCode, AnalysisError> {
        let code = self.pop_as(vars, expected);
        check_value(vars, code, expected, primitive)
    }

    /// Pops something that can be run: a brace list or a quoted name.
    pub fn pop_procedure(&mut self, vars: &mut VarManager, primitive: &str) -> Result<GCode, AnalysisError> {
        match self.pop(vars) {
            code @ (GCode::Procedure(_) | GCode::Quote(_)) => Ok(code),
            code => Err(AnalysisError::TypeMismatch {
                primitive: primitive.to_string(),
                expected: "procedure".to_string(),
                found: describe(&code, vars),
            }),
        }
    }

    /// Stores every stack value matching `predicate` in a fresh local, so that it keeps
    /// its current value whatever runs next.
    pub fn spill_if(&mut self, vars: &mut VarManager, predicate: impl Fn(&GCode) -> bool) {
        for slot in &mut self.stack {
            if slot.is_value() && !matches!(slot, GCode::Local(_)) && predicate(slot) {
                let ty = slot.ty(vars.table());
                let local = vars.local(ty);
                let value = std::mem::replace(slot, GCode::Local(local));
                self.code.push(Statement::Declare(local, Some(value)));
            }
        }
    }

    /// Stores every stack value in its own fresh local, returning the locals bottom first.
    pub fn spill_all(&mut self, vars: &mut VarManager, primitive: &str) -> Result<Vec<VarId>, AnalysisError> {
        let mut locals = vec![];

        for slot in &mut self.stack {
            if !slot.is_value() {
                return Err(AnalysisError::Unsupported(format!("{primitive} with a procedure left on the stack")));
            }

            let ty = slot.ty(vars.table());
            let local = vars.local(ty);
            let value = std::mem::replace(slot, GCode::Local(local));
            self.code.push(Statement::Declare(local, Some(value)));
            locals.push(local);
        }

        Ok(locals)
    }

    /// The stack as it would look with `drawn` values taken from below the base: the
    /// parameters this state never reached are added at the bottom.
    pub fn full_view(&self, vars: &mut VarManager, drawn: usize) -> Vec<GCode> {
        let mut view = (self.drawn..drawn)
            .rev()
            .map(|depth| GCode::Local(vars.param(self.base + depth, ReturnType::Generic)))
            .collect::<Vec<_>>();
        view.extend(self.stack.iter().cloned());
        view
    }

    /// Replaces the stack with the merged result of nested states that drew `drawn`
    /// more values from below.
    pub fn replace_stack(&mut self, stack: Vec<GCode>, drawn: usize) {
        self.stack = stack;
        self.drawn += drawn;
    }

    pub fn into_parts(self) -> (Vec<GCode>, CodeBlock) {
        (self.stack, self.code)
    }
}

impl Default for ProcessorState {
    fn default() -> Self {
        ProcessorState::new()
    }
}

/// Checks that `code` is a value that fits `expected`, narrowing untyped variables.
pub fn check_value(vars: &mut VarManager, code: GCode, expected: ReturnType, primitive: &str) -> Result<GCode, AnalysisError> {
    let found = code.ty(vars.table());

    if !code.is_value() || !found.fits(expected) {
        return Err(AnalysisError::TypeMismatch {
            primitive: primitive.to_string(),
            expected: expected.to_string(),
            found: describe(&code, vars),
        });
    }

    if let GCode::Local(id) = code {
        vars.refine(id, expected);
    }

    Ok(code)
}

/// Names the kind of a stack value for error messages.
pub fn describe(code: &GCode, vars: &VarManager) -> String {
    match code {
        GCode::Procedure(_) => "procedure".to_string(),
        GCode::Quote(name) => format!("quoted literal '{name}"),
        code => code.ty(vars.table()).to_string(),
    }
}
