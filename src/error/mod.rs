//! Error types for every stage of compilation, and their user facing messages.

mod error_types;
mod pretty_messages;

pub use error_types::*;
pub use pretty_messages::pretty_error_message;
