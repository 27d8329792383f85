//! Handles the display of pretty messages for errors.

use super::{ASTError, AnalysisError, CompileError, GenerateError, TokenError};

/* Public */

pub fn pretty_error_message(err: &CompileError) -> String {
    match err {
        CompileError::Direct(msg) => format!("Error occurred during compilation:\n    {msg}"),
        CompileError::TokenError(TokenError::Problem(msg)) => {
            format!("Error occurred during tokenization:\n    {msg}")
        }
        CompileError::TokenError(TokenError::ProblemAtSpan(msg, span)) => {
            format!("Error occurred during tokenization at {span}:\n    {msg}")
        }
        CompileError::ASTError(ASTError(msg)) => {
            format!("Error occurred during ast construction:\n    {msg}")
        }
        CompileError::AnalysisError(err) => {
            format!("Error occurred during analysis:\n    {}", analysis_error_message(err))
        }
        CompileError::GenerateError(GenerateError(msg)) => {
            format!("Error occurred during code generation:\n    {msg}")
        }
    }
}

/* Private Helpers */

fn analysis_error_message(err: &AnalysisError) -> String {
    match err {
        AnalysisError::Impossible(msg) => format!("Internal error: {msg}"),
        AnalysisError::UnresolvedReference(name) => format!("Unknown function or variable '{name}'"),
        AnalysisError::ComplexFunction { function, stack } => {
            format!("Function '{function}' is too complex: it leaves several values on the stack\n    stack: {stack}")
        }
        AnalysisError::CommandContract { command, function, violation } => {
            format!("{command} {{{function}}}: the function {violation}")
        }
        AnalysisError::TypeMismatch { primitive, expected, found } => {
            format!("{primitive} expected {expected}, found {found}")
        }
        AnalysisError::UnbalancedBranches { primitive } => {
            format!("The branches of {primitive} leave a different number of values on the stack")
        }
        AnalysisError::Redefinition(name) => format!("'{name}' is already defined"),
        AnalysisError::Unsupported(msg) => format!("Unsupported construct: {msg}"),
        AnalysisError::Problem(msg) => msg.clone(),
    }
}
