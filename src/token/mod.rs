//! Turns BST source text into a flat list of [`Tokens`](Token).

mod token_types;
mod tokenize;


pub use token_types::{Punctuation, Span, Token, TokenBody};
pub use tokenize::{leading_comments, tokenize};
