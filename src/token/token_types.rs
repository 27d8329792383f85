//! Defines data structures related to [`Tokens`](Token)

use std::cmp::{max, min};
use std::fmt::Display;
use std::sync::Arc;

/// Represents a single token in a BST program.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Represents the primary information of the token - its type, and any info
    /// related to that type.
    pub body: TokenBody,

    /// Represents the span of the token, i.e. where in the source file it came from.
    pub span: Span,
}

/// Describes the information of the token, without any metadata (spans, etc.)
///
/// BST has very little lexical structure: braces group things, and everything
/// else is a literal of some kind.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenBody {
    /// A bare name. Commands (`FUNCTION`), builtins (`write$`), and user names
    /// (`format.names`) are all identifiers. BST names are case insensitive, so
    /// the string is stored lower cased.
    Identifier(String),

    /// A name preceded by a single quote, e.g. `'skip$`. The quote is not part of
    /// the string. Lower cased, like identifiers.
    QuotedIdentifier(String),

    /// A string literal. BST strings have no escapes, so this is exactly the text
    /// between the double quotes.
    StringLiteral(String),

    /// An integer literal, written `#12` or `#-3` in the source.
    IntegerLiteral(i32),

    /// A curly brace.
    Punctuation(Punctuation),
}

/// A piece of punctuation in a BST program. Each is a single character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punctuation {
    LeftCurlyBrace,
    RightCurlyBrace,
}

impl TryFrom<char> for Punctuation {
    type Error = (); // Likely ignored by algorithm.

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '{' => Ok(Punctuation::LeftCurlyBrace),
            '}' => Ok(Punctuation::RightCurlyBrace),
            _ => Err(()),
        }
    }
}

impl Display for Punctuation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Punctuation::LeftCurlyBrace => "{",
            Punctuation::RightCurlyBrace => "}",
        })
    }
}

impl Display for TokenBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenBody::Identifier(name) => f.write_str(name),
            TokenBody::QuotedIdentifier(name) => write!(f, "'{name}"),
            TokenBody::StringLiteral(string) => write!(f, "\"{string}\""),
            TokenBody::IntegerLiteral(num) => write!(f, "#{num}"),
            TokenBody::Punctuation(punct) => write!(f, "{punct}"),
        }
    }
}

/* Spans */

/// A `Span` descibes a contigous group of characters, in a specific source file (or
/// pseudo source file).
///
/// The span is given as a half open interval, though it may be represented differently
/// in error messages.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    /// Path of the program input, or a fake path like `<input>` for string input.
    /// Shared between every span of a file.
    pub source: Arc<str>,
    /// The line the span starts on (1 based).
    pub start_line: usize,
    /// The line the span ends on (1 based).
    pub end_line: usize,
    /// The column the span starts on (1 based).
    pub start_col: usize,
    /// The column the span ends on (1 based).
    pub end_col: usize,
}

impl Span {
    /// Given two spans, returns a new span that includes both.
    pub fn combine(a: &Span, b: &Span) -> Span {
        assert!(*a.pseudo_path() == *b.pseudo_path());

        Span {
            source: a.source.clone(),
            start_line: min(a.start_line, b.start_line),
            end_line: max(a.end_line, b.end_line),
            start_col: min(a.start_col, b.start_col),
            end_col: max(a.end_col, b.end_col),
        }
    }

    /// Given a nonempty slice of Spans, returns a new Span that includes them all.
    pub fn combine_all(spans: &[Span]) -> Span {
        assert!(!spans.is_empty());

        let mut final_span = spans[0].clone();

        for span in &spans[1..] {
            final_span = Span::combine(&final_span, span);
        }

        final_span
    }

    /// Returns the path to the held file, or the fake path in the case of string input.
    pub fn pseudo_path(&self) -> &str {
        &self.source
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format!("{}:{}:{}", self.pseudo_path(), self.start_line, self.start_col))
    }
}
