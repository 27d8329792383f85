//! Translates the commands that run functions into statements of `run()`.

use super::{Evaluator, ProcessorState};

use crate::ast::CommandKind;
use crate::error::{AnalysisError, ContractViolation};
use crate::gcode::{GCode, Statement};

impl Evaluator<'_> {
    /// Evaluates `EXECUTE {function}`, `ITERATE {function}`, or `REVERSE {function}`.
    ///
    /// The function runs as if it were the whole body of a function, and must neither
    /// take nor leave stack values. Only `ITERATE` and `REVERSE` have a current entry.
    pub fn evaluate_command(mut self, kind: CommandKind, function: &str) -> Result<Vec<Statement>, AnalysisError> {
        self.vars.reset();
        let mut state = ProcessorState::new();

        self.evaluate_literal(&mut state, function)?;

        let violation = if !state.stack().is_empty() {
            Some(ContractViolation::ReturnValue)
        } else if !self.vars.is_empty() {
            Some(ContractViolation::Arguments)
        } else if kind == CommandKind::Execute && self.entry.is_used() {
            Some(ContractViolation::EntryUsage)
        } else {
            None
        };

        if let Some(violation) = violation {
            return Err(AnalysisError::CommandContract { command: kind, function: function.to_string(), violation });
        }

        let (_, code) = state.into_parts();

        Ok(match kind {
            CommandKind::Execute => code.statements,
            CommandKind::Iterate => vec![Statement::ForEntries { reverse: false, body: code }],
            CommandKind::Reverse => vec![Statement::ForEntries { reverse: true, body: code }],
        })
    }
}

/// `SORT`
pub fn sort_command() -> Statement {
    Statement::Expression(GCode::effect("bibDB.sort", vec![]))
}

/// `READ`. The runtime reads the database before the style runs.
pub fn read_command() -> Statement {
    Statement::Comment("READ".to_string())
}
