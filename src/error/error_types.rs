//! Defines the types of errors that may occur at any stage during compilation.
//! Also defines simple conversions between strings and errors, and the module errors and the overall [`CompileError`]

use crate::ast::CommandKind;
use crate::token::Span;

use std::fmt::Display;

/* Module Level Errors */

// We do approximately one error type per module.

#[derive(Debug)]
pub enum TokenError {
    /// A problem described by a string.
    Problem(String),
    /// A problem (described as the string) localized at a particular span.
    ProblemAtSpan(String, Span),
}

#[derive(Debug)]
pub struct ASTError(pub String);

/// Everything that can go wrong while partially evaluating a style.
///
/// Unlike the other stages these are structured, since callers (and tests) care about which rule was broken.
#[derive(Debug, PartialEq, Eq)]
pub enum AnalysisError {
    /// A syntax token showed up somewhere the grammar says it never can. Always a bug.
    Impossible(String),
    /// A bare name that is neither a builtin, a variable, nor a previously defined function.
    UnresolvedReference(String),
    /// A function left more than one value on the stack. `stack` is a dump of what was left.
    ComplexFunction { function: String, stack: String },
    /// A top level command targeted a function that does not fit the command.
    CommandContract { command: CommandKind, function: String, violation: ContractViolation },
    /// A primitive popped a value of the wrong kind.
    TypeMismatch { primitive: String, expected: String, found: String },
    /// The two branches of an `if$` leave stacks of different depth.
    UnbalancedBranches { primitive: String },
    /// A name was declared twice.
    Redefinition(String),
    /// Valid BST that has no static translation.
    Unsupported(String),
    /// Anything else, described by a string.
    Problem(String),
}

/// Which part of the command contract a function broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractViolation {
    /// The function leaves a value on the stack.
    ReturnValue,
    /// The function consumes values it was never given.
    Arguments,
    /// The function reads the current entry, but there is none.
    EntryUsage,
}

#[derive(Debug)]
pub struct GenerateError(pub String);

/* String Conversions. */

impl From<String> for TokenError {
    fn from(value: String) -> Self {
        TokenError::Problem(value)
    }
}

impl From<&str> for TokenError {
    fn from(value: &str) -> Self {
        value.to_string().into()
    }
}

impl From<String> for ASTError {
    fn from(value: String) -> Self {
        ASTError(value)
    }
}

impl From<&str> for ASTError {
    fn from(value: &str) -> Self {
        value.to_string().into()
    }
}

impl From<String> for AnalysisError {
    fn from(value: String) -> Self {
        AnalysisError::Problem(value)
    }
}

impl From<&str> for AnalysisError {
    fn from(value: &str) -> Self {
        value.to_string().into()
    }
}

impl From<String> for GenerateError {
    fn from(value: String) -> Self {
        GenerateError(value)
    }
}

impl From<&str> for GenerateError {
    fn from(value: &str) -> Self {
        value.to_string().into()
    }
}

impl From<std::io::Error> for GenerateError {
    fn from(value: std::io::Error) -> Self {
        GenerateError(format!("Could not write output: {value}"))
    }
}

impl Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            CommandKind::Execute => "EXECUTE",
            CommandKind::Iterate => "ITERATE",
            CommandKind::Reverse => "REVERSE",
        })
    }
}

impl Display for ContractViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ContractViolation::ReturnValue => "must not leave a value on the stack",
            ContractViolation::Arguments => "must not take arguments from the stack",
            ContractViolation::EntryUsage => "must not use the current entry",
        })
    }
}

/* Project Level Error */

#[derive(Debug)]
pub enum CompileError {
    /// An error associated with the compilation process itself, not any one step.
    Direct(String),
    TokenError(TokenError),
    ASTError(ASTError),
    AnalysisError(AnalysisError),
    GenerateError(GenerateError),
}

impl From<&str> for CompileError {
    fn from(value: &str) -> Self {
        CompileError::Direct(value.to_string())
    }
}

impl From<String> for CompileError {
    fn from(value: String) -> Self {
        CompileError::Direct(value)
    }
}

impl From<TokenError> for CompileError {
    fn from(value: TokenError) -> Self {
        CompileError::TokenError(value)
    }
}

impl From<ASTError> for CompileError {
    fn from(value: ASTError) -> Self {
        CompileError::ASTError(value)
    }
}

impl From<AnalysisError> for CompileError {
    fn from(value: AnalysisError) -> Self {
        CompileError::AnalysisError(value)
    }
}

impl From<GenerateError> for CompileError {
    fn from(value: GenerateError) -> Self {
        CompileError::GenerateError(value)
    }
}

impl Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&super::pretty_error_message(self))
    }
}

impl std::error::Error for CompileError {}
