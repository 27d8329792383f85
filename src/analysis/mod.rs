//! Partially evaluates BST function bodies into the intermediate code tree.
//!
//! BST is a stack language, and the stack effect of almost every function is fixed.
//! Instead of running a body, the [`Evaluator`] runs it against a symbolic stack
//! ([`ProcessorState`]) whose values are [`GCode`] expressions. Pure operations push
//! bigger expressions, effects become statements, and values that were never pushed
//! become parameters. Branches and loops are evaluated in nested states and merged.

mod commands;
mod primitives;
mod processor_state;
mod var_manager;

#[cfg(test)]
mod tests;

pub use commands::{read_command, sort_command};
pub use processor_state::ProcessorState;
pub use var_manager::VarManager;

use indexmap::IndexMap;

use crate::ast::{TokenAST, TokenListAST};
use crate::error::AnalysisError;
use crate::gcode::{CallTarget, FunctionSignature, GCode, GFunction, ReturnType, Statement};
use crate::generate::LinkContainer;

use primitives::Builtin;

/// `global.max$`, the longest string a global may hold in BibTeX.
pub const GLOBAL_MAX: i32 = 20000;
/// `entry.max$`, the longest string an entry variable may hold in BibTeX.
pub const ENTRY_MAX: i32 = 250;

/* The Compiler Table */

/// What a bare name means inside a function body.
#[derive(Debug, Clone)]
pub enum Compiler {
    Builtin(Builtin),
    Function(FunctionSignature),
    Field,
    /// A global, by its Groovy name.
    GlobalInteger(String),
    GlobalString(String),
    EntryInteger,
    EntryString,
    Constant(i32),
}

/// Every name known so far, in declaration order.
#[derive(Debug)]
pub struct CompilerTable {
    compilers: IndexMap<String, Compiler>,
}

impl CompilerTable {
    /// A table holding the builtins and the names BibTeX predeclares.
    pub fn new() -> Self {
        let mut compilers = IndexMap::new();

        for builtin in primitives::builtins() {
            compilers.insert(builtin.name.to_string(), Compiler::Builtin(builtin));
        }

        compilers.insert("global.max$".to_string(), Compiler::Constant(GLOBAL_MAX));
        compilers.insert("entry.max$".to_string(), Compiler::Constant(ENTRY_MAX));
        compilers.insert("sort.key$".to_string(), Compiler::EntryString);
        compilers.insert("crossref".to_string(), Compiler::Field);

        CompilerTable { compilers }
    }

    pub fn get(&self, name: &str) -> Option<&Compiler> {
        self.compilers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.compilers.contains_key(name)
    }

    /// Declares a new name. BST has no shadowing, so every name is declared once.
    pub fn declare(&mut self, name: &str, compiler: Compiler) -> Result<(), AnalysisError> {
        if self.compilers.contains_key(name) {
            return Err(AnalysisError::Redefinition(name.to_string()));
        }

        self.compilers.insert(name.to_string(), compiler);
        Ok(())
    }
}

impl Default for CompilerTable {
    fn default() -> Self {
        CompilerTable::new()
    }
}

/// Remembers whether the code being analyzed touched the current entry.
#[derive(Debug, Default)]
pub struct EntryRef {
    used: bool,
}

impl EntryRef {
    /// The current entry, as a value.
    pub fn get(&mut self) -> GCode {
        self.used = true;
        GCode::Entry
    }

    /// Marks the entry as used without producing it.
    pub fn touch(&mut self) {
        self.used = true;
    }

    pub fn is_used(&self) -> bool {
        self.used
    }
}

/* The Evaluator */

/// Evaluates token lists against a [`ProcessorState`].
///
/// The evaluator borrows the tables of the compilation. A new one is made for every
/// function and every command.
pub struct Evaluator<'a> {
    pub compilers: &'a CompilerTable,
    pub vars: &'a mut VarManager,
    pub links: &'a mut LinkContainer,
    pub entry: EntryRef,
}

impl<'a> Evaluator<'a> {
    pub fn new(compilers: &'a CompilerTable, vars: &'a mut VarManager, links: &'a mut LinkContainer) -> Self {
        Evaluator { compilers, vars, links, entry: EntryRef::default() }
    }

    /// Turns the body of `FUNCTION {name}` into a [`GFunction`]. The function is not
    /// optimized or registered here.
    pub fn analyze_function(mut self, name: &str, groovy_name: String, body: &TokenListAST) -> Result<GFunction, AnalysisError> {
        self.vars.reset();
        let mut state = ProcessorState::new();

        self.evaluate_tokens(&mut state, body)?;

        let (mut stack, body) = state.into_parts();
        self.vars.reassign();

        let result = match stack.len() {
            0 => None,
            1 => match stack.pop() {
                Some(result) if !result.is_value() => {
                    return Err(AnalysisError::Unsupported(format!("function {name} returns a procedure")));
                }
                result => result,
            },
            _ => {
                let table = self.vars.table();
                let dump = stack.iter().map(|code| code.render(table)).collect::<Vec<_>>().join(", ");
                return Err(AnalysisError::ComplexFunction { function: name.to_string(), stack: format!("[{dump}]") });
            }
        };

        Ok(GFunction {
            name: name.to_string(),
            groovy_name,
            params: self.vars.params(),
            uses_entry: self.entry.is_used(),
            body,
            result,
            vars: self.vars.take_table(),
        })
    }

    pub fn evaluate_tokens(&mut self, state: &mut ProcessorState, list: &TokenListAST) -> Result<(), AnalysisError> {
        for token in &list.tokens {
            self.evaluate_token(state, token)?;
        }

        Ok(())
    }

    fn evaluate_token(&mut self, state: &mut ProcessorState, token: &TokenAST) -> Result<(), AnalysisError> {
        log::trace!("Evaluating {token}");

        match token {
            TokenAST::Integer(value, _) => state.push(GCode::Int(*value)),
            TokenAST::String(value, _) => state.push(GCode::Str(value.clone())),
            TokenAST::QuotedLiteral(name, _) => state.push(GCode::Quote(name.clone())),
            TokenAST::Block(list) => state.push(GCode::Procedure(list.clone())),
            TokenAST::Literal(name, _) => self.evaluate_literal(state, name)?,
            TokenAST::Field(..) | TokenAST::LocalInteger(..) | TokenAST::LocalString(..) => {
                return Err(AnalysisError::Impossible(format!("{}: '{token}' inside a function body", token.span())));
            }
        }

        Ok(())
    }

    /// Runs whatever `name` refers to.
    pub fn evaluate_literal(&mut self, state: &mut ProcessorState, name: &str) -> Result<(), AnalysisError> {
        let compilers = self.compilers;

        match compilers.get(name) {
            None => return Err(AnalysisError::UnresolvedReference(name.to_string())),
            Some(Compiler::Builtin(builtin)) => builtin.evaluate(self, state)?,
            Some(Compiler::Function(signature)) => self.call_function(state, name, signature)?,
            Some(Compiler::Field) => {
                self.entry.touch();
                state.push(GCode::Field(name.to_string()));
            }
            Some(Compiler::GlobalInteger(global)) => state.push(GCode::Global { name: global.clone(), ty: ReturnType::Int }),
            Some(Compiler::GlobalString(global)) => {
                state.push(GCode::Global { name: global.clone(), ty: ReturnType::String });
            }
            Some(Compiler::EntryInteger) => {
                self.entry.touch();
                state.push(GCode::EntryLocal { name: name.to_string(), ty: ReturnType::Int });
            }
            Some(Compiler::EntryString) => {
                self.entry.touch();
                state.push(GCode::EntryLocal { name: name.to_string(), ty: ReturnType::String });
            }
            Some(Compiler::Constant(value)) => state.push(GCode::Int(*value)),
        }

        Ok(())
    }

    /// Runs a procedure value: a brace list, or a quoted name.
    pub fn evaluate_procedure(&mut self, state: &mut ProcessorState, procedure: &GCode, primitive: &str) -> Result<(), AnalysisError> {
        // Prevent stack overflow by allocating additional stack as required.
        stacker::maybe_grow(32 * 1024, 1024 * 1024, || match procedure {
            GCode::Procedure(list) => self.evaluate_tokens(state, list),
            GCode::Quote(name) => self.evaluate_literal(state, name),
            _ => Err(AnalysisError::TypeMismatch {
                primitive: primitive.to_string(),
                expected: "procedure".to_string(),
                found: processor_state::describe(procedure, self.vars),
            }),
        })
    }

    /// Calls a function of the style, taking its arguments off the stack.
    fn call_function(&mut self, state: &mut ProcessorState, name: &str, signature: &FunctionSignature) -> Result<(), AnalysisError> {
        let mut args = vec![];
        for ty in signature.params.iter().rev() {
            args.push(state.pop_typed(self.vars, *ty, name)?);
        }
        args.reverse();

        if signature.uses_entry {
            args.insert(0, self.entry.get());
        }

        // The callee may assign any global or entry variable.
        state.spill_if(self.vars, GCode::reads_state);

        let call = GCode::Call {
            target: CallTarget::Function(signature.groovy_name.clone()),
            args,
            ty: signature.result,
            effect: true,
        };

        if signature.result == ReturnType::Void {
            state.emit(Statement::Expression(call));
        } else {
            let local = self.vars.local(signature.result);
            state.emit(Statement::Declare(local, Some(call)));
            state.push(GCode::Local(local));
        }

        Ok(())
    }
}
