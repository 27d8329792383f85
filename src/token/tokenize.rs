//! Provides the tokenization algorithm.

use super::token_types::{Punctuation, Span, Token, TokenBody};

use crate::error::TokenError;

use std::sync::Arc;

/* The Algorithm. */

/// Tokenizes input, converting a string to a list of tokens.
///
/// Accepts input as a string, and a pseudo path for book-keeping (spans).
pub fn tokenize(input: &str, path: &str) -> Result<Vec<Token>, TokenError> {
    let mut tokens: Vec<Token> = vec![];

    let mut iter = add_span_info(input, Arc::from(path)).peekable();
    while let Some((ch, span)) = iter.peek() {
        if *ch == '%' {
            skip_comment(&mut iter);
        } else if *ch == '\"' {
            let (token, span) = take_string_literal(&mut iter)?;
            tokens.push(Token { body: token, span });
        } else if *ch == '#' {
            let (token, span) = take_integer_literal(&mut iter)?;
            tokens.push(Token { body: token, span });
        } else if *ch == '\'' {
            let (token, span) = take_quoted_identifier(&mut iter)?;
            tokens.push(Token { body: token, span });
        } else if let Ok(punct) = Punctuation::try_from(*ch) {
            let (_, span) = iter.next().expect("Known to exist.");
            tokens.push(Token { body: TokenBody::Punctuation(punct), span });
        } else if ch.is_whitespace() {
            iter.next().expect("Known");
        } else if is_identifier_char(*ch) {
            let (name, span) = take_name(&mut iter)?;
            tokens.push(Token { body: TokenBody::Identifier(name), span });
        } else {
            return Err(TokenError::ProblemAtSpan(format!("Cannot start token with '{}'.", *ch), span.clone()));
        }
    }

    Ok(tokens)
}

/// Collects the comment lines at the very top of a style file.
///
/// Styles conventionally open with a block of `%` comments describing the style, which is worth
/// carrying over into generated code. Blank lines inside the block are kept; the first line of code
/// ends it.
pub fn leading_comments(input: &str) -> Vec<String> {
    let mut comments = vec![];

    for line in input.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            if !comments.is_empty() {
                comments.push(String::new());
            }
        } else if let Some(text) = trimmed.strip_prefix('%') {
            let text = text.trim_start_matches('%');
            comments.push(text.strip_prefix(' ').unwrap_or(text).trim_end().to_string());
        } else {
            break;
        }
    }

    while comments.last().is_some_and(String::is_empty) {
        comments.pop();
    }

    comments
}

/* Consruction and Manipulation of the (char, Span) iterator. */

/// Attaches span information to an input string.
///
/// Given a input string (and a source), produces an iterator which yields the
/// characters of the string, along with the span representing those characters.
/// During the tokenization process, these spans are combined to produce the spans
/// for the tokens.
fn add_span_info(input: &str, source: Arc<str>) -> impl std::iter::Iterator<Item = (char, Span)> + '_ {
    let mut line_num = 1;
    let mut col_num = 1;

    input.chars().map(move |ch| {
        let ret_val = (
            ch,
            Span {
                source: source.clone(),
                start_line: line_num,
                end_line: line_num,
                start_col: col_num,
                end_col: col_num + 1,
            },
        );

        col_num += 1;

        if ch == '\n' {
            line_num += 1;
            col_num = 1;
        }

        ret_val
    })
}

/// Discards everything up to and including the next newline.
fn skip_comment(iter: &mut impl std::iter::Iterator<Item = (char, Span)>) {
    for (ch, _) in iter.by_ref() {
        if ch == '\n' {
            break;
        }
    }
}

/// Given an iterator from `tokenize()`, extracts a string literal token.
///
/// BST has no escapes inside strings; a double quote always ends the literal.
///
/// Caller should be sure that a string literal appears at the front of the iterator,
/// for instance by peeking for a double quote.
fn take_string_literal(
    iter: &mut impl std::iter::Iterator<Item = (char, Span)>,
) -> Result<(TokenBody, Span), TokenError> {
    let mut spans = vec![];
    let (first, first_span) = iter.next().ok_or("Expected character, found nothing")?;
    spans.push(first_span.clone());

    if first != '\"' {
        return Err("Expected character '\"'.".into());
    }

    let mut string = String::new();

    for (ch, ch_span) in iter {
        spans.push(ch_span);

        if ch == '\"' {
            return Ok((TokenBody::StringLiteral(string), Span::combine_all(&spans)));
        }

        string.push(ch);
    }

    Err(TokenError::ProblemAtSpan("Expected character '\"'. String literal does not terminate.".to_string(), first_span))
}

/// Given an iterator from `tokenize()`, extracts an integer literal token.
///
/// The literal is a `#`, an optional sign, and at least one digit.
fn take_integer_literal(
    iter: &mut std::iter::Peekable<impl std::iter::Iterator<Item = (char, Span)>>,
) -> Result<(TokenBody, Span), TokenError> {
    let (first, first_span) = iter.next().ok_or("Expected character, found nothing")?;
    if first != '#' {
        return Err("Expected character '#'.".into());
    }

    let (digits, span) = take_name(iter)
        .map_err(|_| TokenError::ProblemAtSpan("Expected digits after '#'.".to_string(), first_span.clone()))?;

    let value = digits.parse::<i32>().map_err(|_| {
        TokenError::ProblemAtSpan(format!("Bad integer literal '#{digits}'."), Span::combine(&first_span, &span))
    })?;

    Ok((TokenBody::IntegerLiteral(value), Span::combine(&first_span, &span)))
}

/// Given an iterator from `tokenize()`, extracts a quoted identifier (`'name`).
fn take_quoted_identifier(
    iter: &mut std::iter::Peekable<impl std::iter::Iterator<Item = (char, Span)>>,
) -> Result<(TokenBody, Span), TokenError> {
    let (first, first_span) = iter.next().ok_or("Expected character, found nothing")?;
    if first != '\'' {
        return Err("Expected character '\''.".into());
    }

    let (name, span) = take_name(iter)
        .map_err(|_| TokenError::ProblemAtSpan("Expected a name after '\''.".to_string(), first_span.clone()))?;

    Ok((TokenBody::QuotedIdentifier(name), Span::combine(&first_span, &span)))
}

/// Given an iterator from `tokenize()`, extracts a run of identifier characters, lower cased.
///
/// Caller should be sure that an identifier character appears at the front of the
/// iterator, for example by peeking the iterator.
fn take_name(
    iter: &mut std::iter::Peekable<impl std::iter::Iterator<Item = (char, Span)>>,
) -> Result<(String, Span), TokenError> {
    if !matches!(iter.peek(), Some((ch, _)) if is_identifier_char(*ch)) {
        return Err("Expected Identifier character.".into());
    }

    let mut string = String::new();
    let mut span: Option<Span> = None;
    while let Some((ch, _)) = iter.peek() {
        if is_identifier_char(*ch) {
            let (ch, ch_span) = iter.next().expect("Known to exist");

            string.extend(ch.to_lowercase());
            span = match span {
                Some(old) => Some(Span::combine(&old, &ch_span)),
                None => Some(ch_span),
            }
        } else {
            break;
        }
    }

    Ok((string, span.expect("Known to exist")))
}

/* Helpers that classify certain kinds of characters. */

/// Helper function that determines if a character might be part of a name.
///
/// BST is permissive here: operators like `:=` and `+` are ordinary names, and so
/// are dotted words like `format.names` or `sort.key$`.
fn is_identifier_char(ch: char) -> bool {
    !ch.is_whitespace() && !matches!(ch, '{' | '}' | '%' | '"' | '#' | '\'')
}
