//! This module handles construction of an AST from a list of tokens.

use super::build_command_ast::build_command_ast;
use super::ProgramAST;

use crate::error::ASTError;
use crate::token::{Punctuation as Punc, Span, Token, TokenBody as TB};

/* Functions that build AST Nodes */

pub fn build_ast(tokens: &[Token]) -> Result<ProgramAST, ASTError> {
    let mut cursor = TokenCursor::new(tokens);
    let mut commands = vec![];

    while !cursor.is_empty() {
        commands.push(build_command_ast(&mut cursor)?);
    }

    Ok(ProgramAST { commands })
}

/* Cursor over the token list */

/// A position in the token list. Builders take tokens off the front as they recognize them.
pub(super) struct TokenCursor<'a> {
    tokens: &'a [Token],
    index: usize,
}

impl<'a> TokenCursor<'a> {
    pub(super) fn new(tokens: &'a [Token]) -> Self {
        TokenCursor { tokens, index: 0 }
    }

    pub(super) fn is_empty(&self) -> bool {
        self.index >= self.tokens.len()
    }

    pub(super) fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.index);
        self.index += 1;
        token
    }

    /// The span of the last token, for errors at the end of input.
    pub(super) fn last_span(&self) -> Option<&'a Span> {
        self.tokens.last().map(|token| &token.span)
    }

    /// Takes a `{` off the front, returning its span.
    pub(super) fn expect_left_brace(&mut self, context: &str) -> Result<&'a Span, ASTError> {
        match self.next() {
            Some(Token { body: TB::Punctuation(Punc::LeftCurlyBrace), span }) => Ok(span),
            Some(Token { body, span }) => Err(format!("{span}: Expected '{{' {context}, found {body}").into()),
            None => Err(self.out_of_input(&format!("'{{' {context}"))),
        }
    }

    /// Builds the error for input that ends while `expected` is still wanted.
    pub(super) fn out_of_input(&self, expected: &str) -> ASTError {
        match self.last_span() {
            Some(span) => format!("{span}: Expected {expected}, found end of input").into(),
            None => format!("Expected {expected}, found end of input").into(),
        }
    }
}
