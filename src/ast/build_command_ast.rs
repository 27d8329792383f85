//! This module handles construction of [`CommandASTs`](CommandAST) from tokens.

use super::build_ast::TokenCursor;
use super::build_token_ast::{build_body_list, build_name_list, build_single_name, build_single_string};
use super::{CommandAST, CommandKind, TokenAST};

use crate::error::ASTError;
use crate::token::{Span, Token, TokenBody as TB};

/* Public (to ast) Command Construction */

pub(super) fn build_command_ast(cursor: &mut TokenCursor) -> Result<CommandAST, ASTError> {
    let (keyword, keyword_span) = match cursor.next() {
        Some(Token { body: TB::Identifier(keyword), span }) => (keyword.as_str(), span),
        Some(Token { body, span }) => return Err(format!("{span}: Expected a command, found {body}").into()),
        None => return Err(cursor.out_of_input("a command")),
    };

    match keyword {
        "entry" => build_entry_command(cursor, keyword_span),
        "function" => build_function_command(cursor, keyword_span),
        "integers" => {
            let names = build_name_list(cursor, "in INTEGERS", TokenAST::Literal)?;
            let span = Span::combine(keyword_span, &names.span);
            Ok(CommandAST::Integers { names, span })
        }
        "strings" => {
            let names = build_name_list(cursor, "in STRINGS", TokenAST::Literal)?;
            let span = Span::combine(keyword_span, &names.span);
            Ok(CommandAST::Strings { names, span })
        }
        "macro" => {
            let (name, _) = build_single_name(cursor, "as the MACRO name")?;
            let (value, value_span) = build_single_string(cursor, "as the MACRO value")?;
            Ok(CommandAST::Macro { name, value, span: Span::combine(keyword_span, &value_span) })
        }
        "execute" => build_run_command(cursor, keyword_span, CommandKind::Execute),
        "iterate" => build_run_command(cursor, keyword_span, CommandKind::Iterate),
        "reverse" => build_run_command(cursor, keyword_span, CommandKind::Reverse),
        "read" => Ok(CommandAST::Read { span: keyword_span.clone() }),
        "sort" => Ok(CommandAST::Sort { span: keyword_span.clone() }),
        _ => Err(format!("{keyword_span}: Unknown command '{keyword}'").into()),
    }
}

/* Functions that Construct Specific Commands */

fn build_entry_command(cursor: &mut TokenCursor, keyword_span: &Span) -> Result<CommandAST, ASTError> {
    let fields = build_name_list(cursor, "in the ENTRY fields", TokenAST::Field)?;
    let integers = build_name_list(cursor, "in the ENTRY integers", TokenAST::LocalInteger)?;
    let strings = build_name_list(cursor, "in the ENTRY strings", TokenAST::LocalString)?;

    let span = Span::combine(keyword_span, &strings.span);

    Ok(CommandAST::Entry { fields, integers, strings, span })
}

fn build_function_command(cursor: &mut TokenCursor, keyword_span: &Span) -> Result<CommandAST, ASTError> {
    let (name, _) = build_single_name(cursor, "as the FUNCTION name")?;
    let body = build_body_list(cursor)?;

    let span = Span::combine(keyword_span, &body.span);

    Ok(CommandAST::Function { name, body, span })
}

fn build_run_command(cursor: &mut TokenCursor, keyword_span: &Span, kind: CommandKind) -> Result<CommandAST, ASTError> {
    let (function, name_span) = build_single_name(cursor, &format!("as the {kind} target"))?;

    Ok(CommandAST::Run { kind, function, span: Span::combine(keyword_span, &name_span) })
}
