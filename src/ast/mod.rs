//! Groups the flat token list into top level commands and nested token lists.
//!
//! The result is read only for the rest of the compiler. [`ProgramAST::parse`] replays
//! the commands, in order, as callbacks on a [`CommandHandler`].

mod ast_types;
mod build_ast;
mod build_command_ast;
mod build_token_ast;

#[cfg(test)]
mod tests;

pub use ast_types::*;
pub use build_ast::build_ast;

use crate::error::AnalysisError;
use crate::token::Span;

/// Receives the declarations of a style as [`ProgramAST::parse`] discovers them.
///
/// Every method is called in source order, so an implementor can rely on a name
/// having been declared before any later declaration mentions it.
pub trait CommandHandler {
    /// `ENTRY`. The lists hold fields, entry integers, and entry strings.
    fn add_entry(
        &mut self,
        fields: &TokenListAST,
        integers: &TokenListAST,
        strings: &TokenListAST,
    ) -> Result<(), AnalysisError>;

    /// `FUNCTION`.
    fn add_function(&mut self, name: &str, body: &TokenListAST) -> Result<(), AnalysisError>;

    /// `INTEGERS`.
    fn add_integers(&mut self, names: &TokenListAST) -> Result<(), AnalysisError>;

    /// `STRINGS`.
    fn add_strings(&mut self, names: &TokenListAST) -> Result<(), AnalysisError>;

    /// `MACRO`.
    fn add_macro(&mut self, name: &str, value: &str) -> Result<(), AnalysisError>;

    /// `EXECUTE`, `ITERATE`, or `REVERSE`.
    fn add_command(&mut self, kind: CommandKind, function: &str, span: &Span) -> Result<(), AnalysisError>;

    /// `READ`.
    fn add_read(&mut self) -> Result<(), AnalysisError>;

    /// `SORT`.
    fn add_sort(&mut self) -> Result<(), AnalysisError>;
}

impl ProgramAST {
    /// Feeds every command to the handler, stopping at the first error.
    pub fn parse<H: CommandHandler>(&self, handler: &mut H) -> Result<(), AnalysisError> {
        for command in &self.commands {
            match command {
                CommandAST::Entry { fields, integers, strings, .. } => handler.add_entry(fields, integers, strings)?,
                CommandAST::Function { name, body, .. } => handler.add_function(name, body)?,
                CommandAST::Integers { names, .. } => handler.add_integers(names)?,
                CommandAST::Strings { names, .. } => handler.add_strings(names)?,
                CommandAST::Macro { name, value, .. } => handler.add_macro(name, value)?,
                CommandAST::Run { kind, function, span } => handler.add_command(*kind, function, span)?,
                CommandAST::Read { .. } => handler.add_read()?,
                CommandAST::Sort { .. } => handler.add_sort()?,
            }
        }

        Ok(())
    }
}
