//! This module handles building [`TokenListASTs`](TokenListAST) out of brace delimited token runs.

use super::build_ast::TokenCursor;
use super::{TokenAST, TokenListAST};

use crate::error::ASTError;
use crate::token::{Punctuation as Punc, Span, Token, TokenBody as TB};

/* Public (to ast) Functions that Construct Token Lists */

/// Builds a function body: a brace delimited list whose elements may be literals of any
/// kind, or further nested lists.
///
/// Expects the opening brace at the front of the cursor.
pub(super) fn build_body_list(cursor: &mut TokenCursor) -> Result<TokenListAST, ASTError> {
    let open = cursor.expect_left_brace("to start a function body")?;

    build_body_list_contents(cursor, open)
}

/// Builds a list that may only contain names, e.g. the argument of `INTEGERS`. The
/// `make` function decides which kind of name token each name becomes.
pub(super) fn build_name_list(
    cursor: &mut TokenCursor,
    context: &str,
    make: fn(String, Span) -> TokenAST,
) -> Result<TokenListAST, ASTError> {
    let open = cursor.expect_left_brace(context)?;
    let mut tokens = vec![];

    loop {
        match cursor.next() {
            Some(Token { body: TB::Punctuation(Punc::RightCurlyBrace), span }) => {
                return Ok(TokenListAST { tokens, span: Span::combine(open, span) });
            }
            Some(Token { body: TB::Identifier(name), span }) => tokens.push(make(name.clone(), span.clone())),
            Some(Token { body, span }) => return Err(format!("{span}: Expected a name {context}, found {body}").into()),
            None => return Err(cursor.out_of_input(&format!("'}}' {context}"))),
        }
    }
}

/// Builds a list that must hold exactly one name, e.g. the argument of `EXECUTE`.
pub(super) fn build_single_name(cursor: &mut TokenCursor, context: &str) -> Result<(String, Span), ASTError> {
    let list = build_name_list(cursor, context, TokenAST::Literal)?;

    match &list.tokens[..] {
        [TokenAST::Literal(name, _)] => Ok((name.clone(), list.span.clone())),
        _ => Err(format!("{}: Expected exactly one name {context}", list.span).into()),
    }
}

/// Builds a list that must hold exactly one string literal, e.g. the value of a `MACRO`.
pub(super) fn build_single_string(cursor: &mut TokenCursor, context: &str) -> Result<(String, Span), ASTError> {
    let open = cursor.expect_left_brace(context)?;

    let value = match cursor.next() {
        Some(Token { body: TB::StringLiteral(value), .. }) => value.clone(),
        Some(Token { body, span }) => return Err(format!("{span}: Expected a string {context}, found {body}").into()),
        None => return Err(cursor.out_of_input(&format!("a string {context}"))),
    };

    match cursor.next() {
        Some(Token { body: TB::Punctuation(Punc::RightCurlyBrace), span }) => Ok((value, Span::combine(open, span))),
        Some(Token { body, span }) => Err(format!("{span}: Expected '}}' {context}, found {body}").into()),
        None => Err(cursor.out_of_input(&format!("'}}' {context}"))),
    }
}

/* Private Helpers */

fn build_body_list_contents(cursor: &mut TokenCursor, open: &Span) -> Result<TokenListAST, ASTError> {
    // Prevent stack overflow by allocating additional stack as required.
    stacker::maybe_grow(32 * 1024, 1024 * 1024, || {
        let mut tokens = vec![];

        loop {
            let token = match cursor.next() {
                Some(Token { body: TB::Punctuation(Punc::RightCurlyBrace), span }) => {
                    return Ok(TokenListAST { tokens, span: Span::combine(open, span) });
                }
                Some(Token { body: TB::Punctuation(Punc::LeftCurlyBrace), span }) => {
                    TokenAST::Block(build_body_list_contents(cursor, span)?)
                }
                Some(Token { body: TB::Identifier(name), span }) => TokenAST::Literal(name.clone(), span.clone()),
                Some(Token { body: TB::QuotedIdentifier(name), span }) => {
                    TokenAST::QuotedLiteral(name.clone(), span.clone())
                }
                Some(Token { body: TB::StringLiteral(value), span }) => TokenAST::String(value.clone(), span.clone()),
                Some(Token { body: TB::IntegerLiteral(value), span }) => TokenAST::Integer(*value, span.clone()),
                None => return Err(cursor.out_of_input("'}' to close a block")),
            };

            tokens.push(token);
        }
    })
}
