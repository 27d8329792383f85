//! This module defines the AST types and simple methods on those types.

use crate::token::Span;

/* AST Definitions */

/// Represents the abstract syntax tree of a whole style file.
///
/// A style is nothing more than a sequence of top level commands. Order matters: BST
/// requires names to be declared before they are used, so consumers walk the
/// commands front to back (see [`ProgramAST::parse`](super::ProgramAST::parse)).
#[derive(Debug)]
pub struct ProgramAST {
    /// The commands in the file, in source order.
    pub commands: Vec<CommandAST>,
}

/// A top level command of a BST program.
///
/// Each command keyword takes a fixed number of brace delimited arguments. The lists
/// that only hold names have already been checked to hold only names.
#[derive(Debug)]
pub enum CommandAST {
    /// `ENTRY {fields} {integers} {strings}`. Declares the fields read from the
    /// database and the per entry variables. The token lists hold [`TokenAST::Field`],
    /// [`TokenAST::LocalInteger`], and [`TokenAST::LocalString`] respectively.
    Entry { fields: TokenListAST, integers: TokenListAST, strings: TokenListAST, span: Span },
    /// `FUNCTION {name} {body}`.
    Function { name: String, body: TokenListAST, span: Span },
    /// `INTEGERS {names}`. Global integer variables.
    Integers { names: TokenListAST, span: Span },
    /// `STRINGS {names}`. Global string variables.
    Strings { names: TokenListAST, span: Span },
    /// `MACRO {name} {"value"}`. A string abbreviation made available to the database.
    Macro { name: String, value: String, span: Span },
    /// `EXECUTE {fn}`, `ITERATE {fn}`, or `REVERSE {fn}`.
    Run { kind: CommandKind, function: String, span: Span },
    /// `READ`. Loads the database.
    Read { span: Span },
    /// `SORT`. Sorts the entries by `sort.key$`.
    Sort { span: Span },
}

impl CommandAST {
    /// Retrieves the span, regardless of which enum variant is present.
    pub fn span(&self) -> &Span {
        match self {
            CommandAST::Entry { span, .. }
            | CommandAST::Function { span, .. }
            | CommandAST::Integers { span, .. }
            | CommandAST::Strings { span, .. }
            | CommandAST::Macro { span, .. }
            | CommandAST::Run { span, .. }
            | CommandAST::Read { span }
            | CommandAST::Sort { span } => span,
        }
    }
}

/// The commands that run a function from the top level of a style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Runs the function once, with no current entry.
    Execute,
    /// Runs the function once per entry, in database order.
    Iterate,
    /// Runs the function once per entry, in reverse database order.
    Reverse,
}

/// A brace delimited list of tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenListAST {
    pub tokens: Vec<TokenAST>,
    /// Spans the braces as well as the contents.
    pub span: Span,
}

/// A single token of a BST program, after the lexical tokens have been grouped.
///
/// Function bodies only ever contain `Block`, `Integer`, `String`, `QuotedLiteral`,
/// and `Literal`. The remaining variants only appear in the lists of an `ENTRY`
/// command, where the position of the list decides what a name means.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenAST {
    /// A nested `{ ... }` list. Inside a function body this is a procedure value.
    Block(TokenListAST),
    /// `#12`
    Integer(i32, Span),
    /// `"text"`
    String(String, Span),
    /// `'name`, a reference to a function or variable without running it.
    QuotedLiteral(String, Span),
    /// A bare name, which runs or reads whatever it names.
    Literal(String, Span),
    /// A database field declared by `ENTRY`.
    Field(String, Span),
    /// A per entry integer declared by `ENTRY`.
    LocalInteger(String, Span),
    /// A per entry string declared by `ENTRY`.
    LocalString(String, Span),
}

impl TokenAST {
    /// Retrieves the span, regardless of which enum variant is present.
    pub fn span(&self) -> &Span {
        match self {
            TokenAST::Block(list) => &list.span,
            TokenAST::Integer(_, span)
            | TokenAST::String(_, span)
            | TokenAST::QuotedLiteral(_, span)
            | TokenAST::Literal(_, span)
            | TokenAST::Field(_, span)
            | TokenAST::LocalInteger(_, span)
            | TokenAST::LocalString(_, span) => span,
        }
    }

    /// Retrieves the name held by a name-like token.
    pub fn name(&self) -> Option<&str> {
        match self {
            TokenAST::QuotedLiteral(name, _)
            | TokenAST::Literal(name, _)
            | TokenAST::Field(name, _)
            | TokenAST::LocalInteger(name, _)
            | TokenAST::LocalString(name, _) => Some(name),
            TokenAST::Block(_) | TokenAST::Integer(..) | TokenAST::String(..) => None,
        }
    }
}

impl std::fmt::Display for TokenAST {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenAST::Block(list) => {
                f.write_str("{")?;
                for token in &list.tokens {
                    write!(f, " {token}")?;
                }
                f.write_str(" }")
            }
            TokenAST::Integer(num, _) => write!(f, "#{num}"),
            TokenAST::String(string, _) => write!(f, "\"{string}\""),
            TokenAST::QuotedLiteral(name, _) => write!(f, "'{name}"),
            TokenAST::Literal(name, _)
            | TokenAST::Field(name, _)
            | TokenAST::LocalInteger(name, _)
            | TokenAST::LocalString(name, _) => f.write_str(name),
        }
    }
}
